//! Fast hash map and hash set type aliases.
//!
//! The tag catalog index and the hierarchy's path lookup are keyed by short
//! strings and paths, which is where the Fx hash algorithm from `rustc-hash`
//! does well. None of these tables are exposed to untrusted input.
//!
//! # Examples
//!
//! ```
//! use sbz_core::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
//!
//! let mut map: FxHashMap<String, u32> = fx_hash_map();
//! map.insert("drum".to_owned(), 0);
//!
//! let set: FxHashSet<&str> = fx_hash_set();
//! assert!(set.is_empty());
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashMap`].
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new empty [`FxHashSet`].
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_map_operations() {
        let mut map: FxHashMap<&str, i32> = fx_hash_map();
        map.insert("drum", 1);
        map.insert("loop", 2);
        assert_eq!(map.get("drum"), Some(&1));
        assert_eq!(map.get("pad"), None);
    }

    #[test]
    fn test_fx_hash_set_operations() {
        let mut set: FxHashSet<&str> = fx_hash_set();
        assert!(set.insert("drum"));
        assert!(!set.insert("drum"));
        assert!(set.contains("drum"));
    }
}
