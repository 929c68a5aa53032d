//! Per-file tag sets and their sidecar records.
//!
//! Every audio file may have a sidecar next to it named
//! `<original-filename>.sbzm`. The sidecar holds one line: the names of the
//! file's tags joined with `,`, without escaping. Anything after the first
//! line is ignored.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use smallvec::SmallVec;
use tracing::debug;

use super::tag::TagId;
use crate::catalog::TagCatalog;
use crate::error::MetadataError;
use crate::persist;

/// Extension appended to an audio file name to form its sidecar name.
pub const SIDECAR_EXTENSION: &str = "sbzm";

/// Separator between tag names in a sidecar record.
pub const TAG_SEPARATOR: char = ',';

/// The tag set of one file. Most files carry only a handful of tags.
pub type TagSet = SmallVec<[TagId; 4]>;

/// Returns the sidecar path for an audio file.
///
/// # Examples
///
/// ```
/// use sbz_core::sidecar_path;
/// use camino::Utf8Path;
///
/// let path = sidecar_path(Utf8Path::new("/samples/kick.wav"));
/// assert_eq!(path.as_str(), "/samples/kick.wav.sbzm");
/// ```
#[must_use]
pub fn sidecar_path(sound_path: &Utf8Path) -> Utf8PathBuf {
    let mut path = sound_path.as_str().to_owned();
    path.push('.');
    path.push_str(SIDECAR_EXTENSION);
    Utf8PathBuf::from(path)
}

/// The set of tags assigned to one audio file.
///
/// The set never holds the same tag twice. Order is the order in which tags
/// were first added, which is also the order they are written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundMetadata {
    sound_path: Utf8PathBuf,
    tags: TagSet,
}

impl SoundMetadata {
    /// Creates empty metadata for the given audio file.
    #[must_use]
    pub fn new(sound_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            sound_path: sound_path.into(),
            tags: SmallVec::new(),
        }
    }

    /// Returns the audio file this metadata belongs to.
    #[inline]
    #[must_use]
    pub fn sound_path(&self) -> &Utf8Path {
        &self.sound_path
    }

    /// Returns the path of the sidecar record.
    #[must_use]
    pub fn sidecar_path(&self) -> Utf8PathBuf {
        sidecar_path(&self.sound_path)
    }

    /// Returns the assigned tags.
    #[inline]
    #[must_use]
    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// Returns `true` if `tag` is assigned.
    #[inline]
    #[must_use]
    pub fn has_tag(&self, tag: TagId) -> bool {
        self.tags.contains(&tag)
    }

    /// Returns `true` if no tags are assigned.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Replaces the tag set wholesale. Repeated tags collapse.
    pub fn set_tags(&mut self, tags: impl IntoIterator<Item = TagId>) {
        self.tags.clear();
        for tag in tags {
            self.add_tag(tag);
        }
    }

    /// Adds `tag`. Returns `false` if it was already assigned.
    pub fn add_tag(&mut self, tag: TagId) -> bool {
        if self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Removes `tag`. Returns `false` if it was not assigned.
    pub fn remove_tag(&mut self, tag: TagId) -> bool {
        match self.tags.iter().position(|t| *t == tag) {
            Some(index) => {
                self.tags.remove(index);
                true
            }
            None => false,
        }
    }

    /// Loads the sidecar record, replacing the current tag set.
    ///
    /// Every name in the record is resolved through
    /// [`TagCatalog::get_or_create`], so unknown names register new tags.
    /// Returns `Ok(false)` when there is no sidecar, leaving the set empty.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Read`] if the sidecar exists but cannot be
    /// read.
    pub fn load(&mut self, catalog: &mut TagCatalog) -> Result<bool, MetadataError> {
        self.tags.clear();

        let path = self.sidecar_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(source) => return Err(MetadataError::Read { path, source }),
        };

        let line = contents.lines().next().unwrap_or_default();
        self.parse_record(line, catalog);
        debug!(path = %path, tags = self.tags.len(), "Loaded sidecar");
        Ok(true)
    }

    /// Writes the current tag set to the sidecar record.
    ///
    /// The write is all-or-nothing: on failure the previous record stays.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Write`] if the record cannot be written.
    pub fn save(&self, catalog: &TagCatalog) -> Result<(), MetadataError> {
        let path = self.sidecar_path();
        let mut record = self.format_record(catalog);
        record.push('\n');

        persist::write_atomic(&path, record.as_bytes())
            .map_err(|source| MetadataError::Write { path: path.clone(), source })?;
        debug!(path = %path, tags = self.tags.len(), "Saved sidecar");
        Ok(())
    }

    /// Returns the record line for the current tag set, without a newline.
    ///
    /// Tags no longer present in the catalog are left out.
    #[must_use]
    pub fn format_record(&self, catalog: &TagCatalog) -> String {
        let mut record = String::new();
        for name in self.tags.iter().filter_map(|id| catalog.name(*id)) {
            if !record.is_empty() {
                record.push(TAG_SEPARATOR);
            }
            record.push_str(name);
        }
        record
    }

    /// Resolves every name of a record line and adds it to the set.
    ///
    /// Segments that are blank after trimming are skipped, so an empty line
    /// reads back as an empty set.
    fn parse_record(&mut self, line: &str, catalog: &mut TagCatalog) {
        for segment in line.split(TAG_SEPARATOR) {
            if segment.trim().is_empty() {
                continue;
            }
            let tag = catalog.get_or_create(segment);
            self.add_tag(tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sound_in(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_missing_sidecar_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = TagCatalog::new();
        let mut metadata = SoundMetadata::new(sound_in(&dir, "kick.wav"));

        assert!(!metadata.load(&mut catalog).unwrap());
        assert!(metadata.is_empty());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_save_then_load_returns_same_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = TagCatalog::new();
        let drum = catalog.get_or_create("drum");
        let dark = catalog.get_or_create("Dark");

        let mut metadata = SoundMetadata::new(sound_in(&dir, "kick.wav"));
        metadata.set_tags([drum, dark]);
        metadata.save(&catalog).unwrap();

        let record = fs::read_to_string(metadata.sidecar_path()).unwrap();
        assert_eq!(record, "drum,Dark\n");

        let mut reloaded = SoundMetadata::new(sound_in(&dir, "kick.wav"));
        assert!(reloaded.load(&mut catalog).unwrap());
        assert_eq!(reloaded.tags(), &[drum, dark]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_empty_set_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = TagCatalog::new();
        let metadata = SoundMetadata::new(sound_in(&dir, "pad.ogg"));
        metadata.save(&catalog).unwrap();

        let mut reloaded = SoundMetadata::new(sound_in(&dir, "pad.ogg"));
        assert!(reloaded.load(&mut catalog).unwrap());
        assert!(reloaded.is_empty());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_coerces_and_dedupes_names() {
        let dir = tempfile::tempdir().unwrap();
        let sound = sound_in(&dir, "snare.mp3");
        fs::write(sidecar_path(&sound), " Drum ,drum,DRUM,loop\nignored,line\n").unwrap();

        let mut catalog = TagCatalog::new();
        let mut metadata = SoundMetadata::new(sound);
        metadata.load(&mut catalog).unwrap();

        assert_eq!(metadata.tags().len(), 2);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.name(metadata.tags()[0]), Some("Drum"));
        assert!(catalog.find_by_name("ignored").is_none());
    }

    #[test]
    fn test_add_and_remove_are_idempotent() {
        let mut catalog = TagCatalog::new();
        let drum = catalog.get_or_create("drum");
        let mut metadata = SoundMetadata::new("kick.wav");

        assert!(!metadata.remove_tag(drum));
        assert!(metadata.add_tag(drum));
        assert!(!metadata.add_tag(drum));
        assert_eq!(metadata.tags(), &[drum]);
        assert!(metadata.remove_tag(drum));
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_set_tags_dedupes() {
        let mut metadata = SoundMetadata::new("kick.wav");
        metadata.set_tags([TagId(1), TagId(0), TagId(1)]);
        assert_eq!(metadata.tags(), &[TagId(1), TagId(0)]);
    }

    #[test]
    fn test_failed_save_leaves_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let sound = Utf8PathBuf::try_from(dir.path().join("gone").join("kick.wav")).unwrap();
        let catalog = TagCatalog::new();

        let result = SoundMetadata::new(sound).save(&catalog);
        assert!(matches!(result, Err(MetadataError::Write { .. })));
    }
}
