//! Tag identifiers and definitions.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::color::TagColor;

/// Name given to a tag whose requested name is blank.
pub const UNNAMED_TAG: &str = "Unnamed";

/// A handle to a tag registered in a [`TagCatalog`](crate::TagCatalog).
///
/// Handles stay valid across renames and color edits, so file metadata
/// observes those edits without being touched. A handle is only meaningful
/// for the catalog that issued it.
///
/// # Examples
///
/// ```
/// use sbz_core::TagId;
///
/// let id = TagId::new(3);
/// assert_eq!(id.as_u32(), 3);
/// assert_eq!(id.index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagId(pub u32);

impl TagId {
    /// Creates a tag ID from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the inner u32 value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the slot index of this tag in its catalog.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TagId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A user-defined tag: a display name and a color.
///
/// Two definitions are equal when their names match case-insensitively;
/// the color does not take part in identity.
///
/// Cloning a definition gives the working copy used while editing. The copy
/// is handed back through [`TagCatalog::apply_edit`](crate::TagCatalog::apply_edit)
/// on confirm, or simply dropped on cancel.
///
/// # Examples
///
/// ```
/// use sbz_core::{TagColor, TagDefinition};
///
/// let a = TagDefinition::new("Drum", TagColor::WHITE);
/// let b = TagDefinition::new("  drum ", TagColor::rgb(255, 0, 0));
/// assert_eq!(a, b);
/// assert_eq!(b.name, "drum");
///
/// let blank = TagDefinition::new("   ", TagColor::WHITE);
/// assert_eq!(blank.name, "Unnamed");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDefinition {
    /// Display name. Never empty once normalized.
    pub name: String,

    /// Display color.
    #[serde(default)]
    pub color: TagColor,
}

impl TagDefinition {
    /// Creates a definition with a normalized name.
    #[must_use]
    pub fn new(name: impl AsRef<str>, color: TagColor) -> Self {
        Self {
            name: normalize_name(name.as_ref()),
            color,
        }
    }

    /// Returns the case-folded name used for identity.
    #[must_use]
    pub fn key(&self) -> String {
        name_key(&self.name)
    }

    /// Returns `true` if the name contains `text`, ignoring case.
    ///
    /// Empty `text` matches every tag.
    #[must_use]
    pub fn contains_text(&self, text: &str) -> bool {
        self.key().contains(&name_key(text))
    }

    /// Copies name and color from `other` into `self`.
    pub fn copy_from(&mut self, other: &Self) {
        self.name.clone_from(&other.name);
        self.color = other.color;
    }
}

impl PartialEq for TagDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TagDefinition {}

impl Hash for TagDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Trims `name`, substituting [`UNNAMED_TAG`] when nothing is left.
#[must_use]
pub(crate) fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNNAMED_TAG.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Returns the lookup key for a tag name: trimmed and lowercased.
#[must_use]
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{FxHashSet, fx_hash_set};

    #[test]
    fn test_equality_ignores_case_and_color() {
        let a = TagDefinition::new("Loop", TagColor::WHITE);
        let b = TagDefinition::new("LOOP", TagColor::rgb(1, 2, 3));
        let c = TagDefinition::new("Loops", TagColor::WHITE);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set: FxHashSet<TagDefinition> = fx_hash_set();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_contains_text() {
        let tag = TagDefinition::new("Snare Roll", TagColor::WHITE);
        assert!(tag.contains_text("snare"));
        assert!(tag.contains_text("E R"));
        assert!(tag.contains_text(""));
        assert!(!tag.contains_text("kick"));
    }

    #[test]
    fn test_working_copy_edit() {
        let mut original = TagDefinition::new("pad", TagColor::WHITE);
        let mut copy = original.clone();
        copy.name = "Pads".to_owned();
        copy.color = TagColor::rgb(0, 0, 0xff);

        assert_eq!(original.name, "pad");
        original.copy_from(&copy);
        assert_eq!(original.name, "Pads");
        assert_eq!(original.color, TagColor::rgb(0, 0, 0xff));
    }

    #[test]
    fn test_deserialize_missing_color_defaults_to_white() {
        let tag: TagDefinition = serde_json::from_str(r#"{"name":"fx"}"#).unwrap();
        assert_eq!(tag.color, TagColor::WHITE);
    }
}
