//! Audio files discovered during a scan.

use camino::{Utf8Path, Utf8PathBuf};

use super::metadata::SoundMetadata;

/// One audio file found under a scan root.
///
/// `relative_path` is the file's containing directory relative to the scan
/// root; it is empty for files directly inside the root. The hierarchy is
/// built from its segments.
///
/// # Examples
///
/// ```
/// use sbz_core::ScannedFile;
/// use camino::Utf8Path;
///
/// let file = ScannedFile::new(Utf8Path::new("/samples"), "/samples/x/y/1.wav".into());
/// assert_eq!(file.name, "1.wav");
/// assert_eq!(file.relative_path.as_str(), "x/y");
/// assert_eq!(file.segments().collect::<Vec<_>>(), ["x", "y"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Absolute path of the audio file.
    pub full_path: Utf8PathBuf,

    /// File name including its extension.
    pub name: String,

    /// Containing directory relative to the scan root.
    pub relative_path: Utf8PathBuf,

    /// Tags assigned to the file.
    pub metadata: SoundMetadata,
}

impl ScannedFile {
    /// Creates a scanned file with empty metadata.
    ///
    /// If `full_path` does not lie under `scan_root`, the whole parent
    /// directory is used as the relative path.
    #[must_use]
    pub fn new(scan_root: &Utf8Path, full_path: Utf8PathBuf) -> Self {
        let name = full_path.file_name().unwrap_or_default().to_owned();
        let parent = full_path.parent().unwrap_or_else(|| Utf8Path::new(""));
        let relative_path = parent
            .strip_prefix(scan_root)
            .unwrap_or(parent)
            .to_path_buf();
        let metadata = SoundMetadata::new(full_path.clone());

        Self {
            full_path,
            name,
            relative_path,
            metadata,
        }
    }

    /// Returns the directory segments of `relative_path`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.relative_path
            .components()
            .filter_map(|c| match c {
                camino::Utf8Component::Normal(segment) => Some(segment),
                _ => None,
            })
    }
}
