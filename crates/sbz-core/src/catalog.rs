//! The tag catalog: every tag definition known to the library.
//!
//! Tags live in an arena of slots indexed by [`TagId`], with a side index
//! from the case-folded name to the slot. File metadata stores only the
//! handles, so a rename or color change made here is seen by every file
//! carrying the tag without touching any sidecar.
//!
//! The catalog is persisted as a JSON array of `{ "name", "color" }`
//! objects in registration order.
//!
//! # Examples
//!
//! ```
//! use sbz_core::TagCatalog;
//!
//! let mut catalog = TagCatalog::new();
//! let drum = catalog.get_or_create("Drum");
//! assert_eq!(catalog.get_or_create("  drum "), drum);
//! assert_eq!(catalog.find_by_name("DRUM"), Some(drum));
//! assert_eq!(catalog.len(), 1);
//! ```

use std::fs;
use std::io;

use camino::Utf8Path;
use tracing::{debug, info, warn};

use crate::error::CatalogError;
use crate::hash::{FxHashMap, fx_hash_map};
use crate::persist;
use crate::types::{TAG_SEPARATOR, TagColor, TagDefinition, TagId, name_key, normalize_name};

/// The registry of tag definitions.
#[derive(Debug, Clone, Default)]
pub struct TagCatalog {
    /// Definitions in registration order. Removed tags leave a `None` so
    /// that the remaining handles stay valid.
    slots: Vec<Option<TagDefinition>>,

    /// Case-folded name to handle.
    index: FxHashMap<String, TagId>,
}

impl TagCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: fx_hash_map(),
        }
    }

    /// Builds a catalog from stored definitions.
    ///
    /// Blank names become [`UNNAMED_TAG`](crate::UNNAMED_TAG) and repeated
    /// or unstorable names are skipped, each with a warning.
    #[must_use]
    pub fn from_definitions(definitions: impl IntoIterator<Item = TagDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            if definition.name.trim().is_empty() {
                warn!(replacement = crate::UNNAMED_TAG, "Tag with blank name in catalog");
            }
            let definition = TagDefinition::new(&definition.name, definition.color);
            match catalog.add(definition) {
                Ok(_) => {}
                Err(CatalogError::Duplicate(name)) => {
                    warn!(tag = %name, "Skipping duplicate tag in catalog");
                }
                Err(e) => warn!(error = %e, "Skipping tag in catalog"),
            }
        }
        catalog
    }

    /// Returns the number of registered tags.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no tags are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns how many handles were ever issued, removed tags included.
    ///
    /// Only registration changes this, so it tells whether tags were
    /// created between two points even if others were removed meanwhile.
    #[inline]
    #[must_use]
    pub fn issued(&self) -> usize {
        self.slots.len()
    }

    /// Looks up a tag by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<TagId> {
        self.index.get(&name_key(name)).copied()
    }

    /// Returns the definition behind a handle.
    #[must_use]
    pub fn get(&self, id: TagId) -> Option<&TagDefinition> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Returns the display name behind a handle.
    #[must_use]
    pub fn name(&self, id: TagId) -> Option<&str> {
        self.get(id).map(|t| t.name.as_str())
    }

    /// Returns the tag named `name`, registering it with the default color
    /// if it does not exist yet.
    ///
    /// The name is trimmed, and a blank name maps to
    /// [`UNNAMED_TAG`](crate::UNNAMED_TAG). This never fails, which makes
    /// it suitable for resolving names read back from sidecar records.
    pub fn get_or_create(&mut self, name: &str) -> TagId {
        let name = normalize_name(name);
        if let Some(id) = self.find_by_name(&name) {
            return id;
        }
        let id = self.insert(TagDefinition {
            name,
            color: TagColor::default(),
        });
        info!(tag = %self.name(id).unwrap_or_default(), "Created tag");
        id
    }

    /// Like [`get_or_create`](Self::get_or_create), but rejects names that
    /// could not be stored in a sidecar record.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidName`] if the name contains `,`.
    pub fn get_or_create_checked(&mut self, name: &str) -> Result<TagId, CatalogError> {
        validate_name(name)?;
        Ok(self.get_or_create(name))
    }

    /// Registers a new tag.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Duplicate`] if a tag with the same name exists
    /// - [`CatalogError::InvalidName`] if the name contains `,`
    ///
    /// The catalog is unchanged on error.
    pub fn add(&mut self, tag: TagDefinition) -> Result<TagId, CatalogError> {
        let tag = TagDefinition::new(&tag.name, tag.color);
        validate_name(&tag.name)?;
        if self.find_by_name(&tag.name).is_some() {
            return Err(CatalogError::Duplicate(tag.name));
        }
        let id = self.insert(tag);
        debug!(tag = %self.name(id).unwrap_or_default(), id = id.as_u32(), "Registered tag");
        Ok(id)
    }

    /// Renames a tag. Changing only the case of the name is allowed.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::UnknownTag`] if the handle is not registered
    /// - [`CatalogError::InvalidName`] if the name contains `,`
    /// - [`CatalogError::Duplicate`] if another tag already has the name
    pub fn rename(&mut self, id: TagId, name: &str) -> Result<(), CatalogError> {
        let name = normalize_name(name);
        validate_name(&name)?;
        let old_key = self.get(id).ok_or(CatalogError::UnknownTag(id))?.key();
        let new_key = name_key(&name);

        if self.index.get(&new_key).is_some_and(|other| *other != id) {
            return Err(CatalogError::Duplicate(name));
        }

        self.index.remove(&old_key);
        self.index.insert(new_key, id);
        if let Some(tag) = self.slots.get_mut(id.index()).and_then(Option::as_mut) {
            info!(from = %tag.name, to = %name, "Renamed tag");
            tag.name = name;
        }
        Ok(())
    }

    /// Changes the color of a tag.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownTag`] if the handle is not registered.
    pub fn set_color(&mut self, id: TagId, color: TagColor) -> Result<(), CatalogError> {
        let tag = self
            .slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(CatalogError::UnknownTag(id))?;
        tag.color = color;
        Ok(())
    }

    /// Commits a working copy obtained by cloning the definition of `id`.
    ///
    /// # Errors
    ///
    /// Same as [`rename`](Self::rename). Nothing changes on error.
    pub fn apply_edit(&mut self, id: TagId, edited: &TagDefinition) -> Result<(), CatalogError> {
        self.rename(id, &edited.name)?;
        self.set_color(id, edited.color)
    }

    /// Unregisters a tag.
    ///
    /// `references` is the number of files that still carry the tag. The
    /// catalog does not track assignments itself, so the caller counts
    /// them; removal is refused while the count is non-zero.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::UnknownTag`] if the handle is not registered
    /// - [`CatalogError::InUse`] if `references` is non-zero
    pub fn remove(&mut self, id: TagId, references: usize) -> Result<TagDefinition, CatalogError> {
        let tag = self.get(id).ok_or(CatalogError::UnknownTag(id))?;
        if references > 0 {
            return Err(CatalogError::InUse {
                name: tag.name.clone(),
                references,
            });
        }

        let key = tag.key();
        self.index.remove(&key);
        let removed = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(CatalogError::UnknownTag(id))?;
        info!(tag = %removed.name, "Removed tag");
        Ok(removed)
    }

    /// Iterates over all tags in registration order.
    pub fn all(&self) -> impl Iterator<Item = (TagId, &TagDefinition)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            let id = TagId(u32::try_from(i).ok()?);
            slot.as_ref().map(|tag| (id, tag))
        })
    }

    /// Returns the tags whose name contains `text`, ignoring case.
    ///
    /// Blank text returns every tag.
    #[must_use]
    pub fn search(&self, text: &str) -> Vec<TagId> {
        self.all()
            .filter(|(_, tag)| tag.contains_text(text))
            .map(|(id, _)| id)
            .collect()
    }

    /// Loads the catalog file. A missing file yields an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] or [`CatalogError::Parse`] if the file
    /// exists but cannot be read.
    pub fn load(path: &Utf8Path) -> Result<Self, CatalogError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path, "No tag catalog, starting empty");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(CatalogError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let definitions: Vec<TagDefinition> =
            serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::from_definitions(definitions);
        info!(path = %path, tags = catalog.len(), "Loaded tag catalog");
        Ok(catalog)
    }

    /// Writes the catalog file, replacing it atomically.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Utf8Path) -> Result<(), CatalogError> {
        let io_error = |source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        };

        let definitions: Vec<&TagDefinition> = self.all().map(|(_, tag)| tag).collect();
        let mut json = serde_json::to_string_pretty(&definitions).map_err(|source| {
            CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        json.push('\n');

        persist::ensure_parent_dir(path).map_err(io_error)?;
        persist::write_atomic(path, json.as_bytes()).map_err(io_error)?;
        debug!(path = %path, tags = definitions.len(), "Saved tag catalog");
        Ok(())
    }

    fn insert(&mut self, tag: TagDefinition) -> TagId {
        let id = TagId(u32::try_from(self.slots.len()).unwrap_or(u32::MAX));
        self.index.insert(tag.key(), id);
        self.slots.push(Some(tag));
        id
    }
}

/// Rejects names that would split when written to a sidecar record.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidName`] if the name contains `,`.
pub fn validate_name(name: &str) -> Result<(), CatalogError> {
    if name.contains(TAG_SEPARATOR) {
        return Err(CatalogError::invalid_name(
            name,
            format!("tag names cannot contain '{TAG_SEPARATOR}'"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_get_or_create_folds_case_and_whitespace() {
        let mut catalog = TagCatalog::new();
        let a = catalog.get_or_create("Kick");
        let b = catalog.get_or_create("  KICK\t");
        let c = catalog.get_or_create("kick");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.name(a), Some("Kick"));
    }

    #[test]
    fn test_blank_name_becomes_unnamed() {
        let mut catalog = TagCatalog::new();
        let id = catalog.get_or_create("   ");
        assert_eq!(catalog.name(id), Some(crate::UNNAMED_TAG));
        assert_eq!(catalog.get_or_create(""), id);
    }

    #[test]
    fn test_add_duplicate_does_not_mutate() {
        let mut catalog = TagCatalog::new();
        catalog
            .add(TagDefinition::new("loop", TagColor::rgb(1, 2, 3)))
            .unwrap();

        let result = catalog.add(TagDefinition::new("LOOP", TagColor::WHITE));
        assert!(matches!(result, Err(CatalogError::Duplicate(_))));
        assert_eq!(catalog.len(), 1);
        let (_, tag) = catalog.all().next().unwrap();
        assert_eq!(tag.color, TagColor::rgb(1, 2, 3));
    }

    #[test]
    fn test_add_rejects_separator() {
        let mut catalog = TagCatalog::new();
        let result = catalog.add(TagDefinition::new("drum,loop", TagColor::WHITE));
        assert!(matches!(result, Err(CatalogError::InvalidName { .. })));
        assert!(catalog.get_or_create_checked("a,b").is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_all_in_registration_order() {
        let mut catalog = TagCatalog::new();
        for name in ["zeta", "alpha", "mid"] {
            catalog.get_or_create(name);
        }
        let names: Vec<_> = catalog.all().map(|(_, t)| t.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_rename() {
        let mut catalog = TagCatalog::new();
        let drum = catalog.get_or_create("drum");
        let bass = catalog.get_or_create("bass");

        catalog.rename(drum, "Drums").unwrap();
        assert_eq!(catalog.find_by_name("drums"), Some(drum));
        assert!(catalog.find_by_name("drum").is_none());

        catalog.rename(drum, "DRUMS").unwrap();
        assert_eq!(catalog.name(drum), Some("DRUMS"));

        assert!(matches!(
            catalog.rename(drum, "Bass"),
            Err(CatalogError::Duplicate(_))
        ));
        assert_eq!(catalog.name(drum), Some("DRUMS"));
        assert_eq!(catalog.find_by_name("bass"), Some(bass));
    }

    #[test]
    fn test_apply_edit_and_cancel() {
        let mut catalog = TagCatalog::new();
        let pad = catalog.get_or_create("pad");

        let mut working = catalog.get(pad).unwrap().clone();
        working.name = "Pads".to_owned();
        drop(working);
        assert_eq!(catalog.name(pad), Some("pad"));

        let mut working = catalog.get(pad).unwrap().clone();
        working.name = "Pads".to_owned();
        working.color = TagColor::rgb(0x20, 0x40, 0x60);
        catalog.apply_edit(pad, &working).unwrap();
        assert_eq!(catalog.get(pad).unwrap().color, TagColor::rgb(0x20, 0x40, 0x60));
        assert_eq!(catalog.name(pad), Some("Pads"));
    }

    #[test]
    fn test_remove_fails_while_in_use() {
        let mut catalog = TagCatalog::new();
        let fx = catalog.get_or_create("fx");
        let vox = catalog.get_or_create("vox");

        assert!(matches!(
            catalog.remove(fx, 2),
            Err(CatalogError::InUse { references: 2, .. })
        ));
        assert_eq!(catalog.len(), 2);

        let removed = catalog.remove(fx, 0).unwrap();
        assert_eq!(removed.name, "fx");
        assert!(catalog.get(fx).is_none());
        assert_eq!(catalog.name(vox), Some("vox"));
        assert!(matches!(catalog.remove(fx, 0), Err(CatalogError::UnknownTag(_))));

        let again = catalog.get_or_create("fx");
        assert_ne!(again, fx);
    }

    #[test]
    fn test_issued_counts_removed_tags() {
        let mut catalog = TagCatalog::new();
        let fx = catalog.get_or_create("fx");
        assert_eq!(catalog.issued(), 1);

        catalog.remove(fx, 0).unwrap();
        catalog.get_or_create("vox");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.issued(), 2);

        catalog.get_or_create("VOX");
        assert_eq!(catalog.issued(), 2);
    }

    #[test]
    fn test_search() {
        let mut catalog = TagCatalog::new();
        let kick = catalog.get_or_create("Kick");
        let hat = catalog.get_or_create("Hi Hat");
        let open = catalog.get_or_create("Open Hat");

        assert_eq!(catalog.search("hat"), vec![hat, open]);
        assert_eq!(catalog.search("KI"), vec![kick]);
        assert_eq!(catalog.search("").len(), 3);
        assert!(catalog.search("snare").is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("data").join("tags.json")).unwrap();

        let mut catalog = TagCatalog::new();
        catalog
            .add(TagDefinition::new("drum", TagColor::rgb(0xff, 0, 0)))
            .unwrap();
        catalog.get_or_create("loop");
        catalog.save(&path).unwrap();

        let loaded = TagCatalog::load(&path).unwrap();
        let tags: Vec<_> = loaded.all().map(|(_, t)| (t.name.clone(), t.color)).collect();
        assert_eq!(
            tags,
            vec![
                ("drum".to_owned(), TagColor::rgb(0xff, 0, 0)),
                ("loop".to_owned(), TagColor::WHITE),
            ]
        );
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("tags.json")).unwrap();
        assert!(TagCatalog::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_repairs_blank_and_duplicate_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("tags.json")).unwrap();
        fs::write(
            &path,
            r##"[{"name":"  ","color":"#000000"},{"name":"Drum"},{"name":"drum","color":"#ff0000"}]"##,
        )
        .unwrap();

        let catalog = TagCatalog::load(&path).unwrap();
        let names: Vec<_> = catalog.all().map(|(_, t)| t.name.as_str()).collect();
        assert_eq!(names, ["Unnamed", "Drum"]);
        let drum = catalog.find_by_name("drum").unwrap();
        assert_eq!(catalog.get(drum).unwrap().color, TagColor::WHITE);
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("tags.json")).unwrap();
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            TagCatalog::load(&path),
            Err(CatalogError::Parse { .. })
        ));
    }
}
