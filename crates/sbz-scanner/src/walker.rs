//! Directory traversal for sound files.
//!
//! [`DirectoryWalker`] does the two kinds of listing a scan needs:
//!
//! - [`collect_directories`](DirectoryWalker::collect_directories) walks a
//!   whole root for directories only, using the `ignore` crate. This is the
//!   eager seeding phase.
//! - [`list_audio_files`](DirectoryWalker::list_audio_files) lists the
//!   audio files directly inside one directory. This is the per-step work.
//!
//! Both produce name-sorted output so that scan order, and therefore the
//! hierarchy, is deterministic.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use sbz_core::ScanConfig;
use tracing::{debug, warn};

use crate::error::ScanError;

/// File extensions recognized as audio. Matching is case-sensitive.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg"];

/// Returns the text after the last `.` of a file name.
///
/// Returns `None` when the name has no `.` or ends with one.
///
/// # Examples
///
/// ```
/// use sbz_scanner::extension;
///
/// assert_eq!(extension("kick.wav"), Some("wav"));
/// assert_eq!(extension("take.2.final.mp3"), Some("mp3"));
/// assert_eq!(extension("README"), None);
/// assert_eq!(extension("trailing."), None);
/// ```
#[must_use]
pub fn extension(name: &str) -> Option<&str> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() { None } else { Some(ext) }
}

/// Returns `true` if the file name has one of the [`AUDIO_EXTENSIONS`].
#[must_use]
pub fn is_audio_file(name: &str) -> bool {
    extension(name).is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext))
}

/// Result of walking one root for directories.
#[derive(Debug, Default)]
pub struct DirectoryListing {
    /// Directories in depth-first pre-order, starting with the root.
    pub directories: Vec<Utf8PathBuf>,
    /// Entries that could not be walked. Their subtrees are missing from
    /// `directories`.
    pub errors: Vec<ScanError>,
}

/// Lists directories and audio files under the scan roots.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use sbz_core::ScanConfig;
/// use sbz_scanner::DirectoryWalker;
///
/// let walker = DirectoryWalker::new(&ScanConfig::default());
/// let listing = walker.collect_directories(Utf8Path::new("/samples"));
/// for dir in &listing.directories {
///     let files = walker.list_audio_files(dir)?;
///     println!("{dir}: {} sounds", files.len());
/// }
/// # Ok::<(), sbz_scanner::ScanError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryWalker {
    include_hidden: bool,
    follow_links: bool,
}

impl DirectoryWalker {
    /// Creates a walker from the scan settings.
    #[must_use]
    pub const fn new(config: &ScanConfig) -> Self {
        Self {
            include_hidden: config.include_hidden,
            follow_links: config.follow_links,
        }
    }

    /// Walks `root` for directories, root first, children sorted by name.
    ///
    /// Errors are collected rather than returned: an unreadable directory
    /// only loses its own subtree.
    pub fn collect_directories(&self, root: &Utf8Path) -> DirectoryListing {
        let mut listing = DirectoryListing::default();

        for result in self.build_walker(root) {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %root, error = %e, "Skipping unreadable directory");
                    listing.errors.push(ScanError::Walk(e));
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                continue;
            }

            match Utf8Path::from_path(entry.path()) {
                Some(path) => listing.directories.push(path.to_path_buf()),
                None => {
                    warn!(path = %entry.path().display(), "Skipping non-UTF-8 directory");
                    listing
                        .errors
                        .push(ScanError::NonUtf8Path(entry.path().to_path_buf()));
                }
            }
        }

        debug!(root = %root, directories = listing.directories.len(), "Collected directories");
        listing
    }

    /// Lists the audio files directly inside `dir`, sorted by file name.
    ///
    /// Entries that vanish or cannot be inspected while listing are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ReadDir`] if the directory cannot be opened.
    pub fn list_audio_files(&self, dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, ScanError> {
        let entries = fs::read_dir(dir).map_err(|e| ScanError::read_dir(dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let Ok(entry) = entry else {
                continue;
            };
            let Ok(name) = entry.file_name().into_string() else {
                debug!(dir = %dir, "Skipping non-UTF-8 file name");
                continue;
            };
            if !self.include_hidden && name.starts_with('.') {
                continue;
            }
            if !is_audio_file(&name) {
                continue;
            }

            let path = dir.join(&name);
            if path.is_file() {
                files.push(path);
            }
        }

        files.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    fn build_walker(&self, root: &Utf8Path) -> ignore::Walk {
        WalkBuilder::new(root)
            // Sound libraries are not source trees; ignore files don't apply.
            .standard_filters(false)
            .hidden(!self.include_hidden)
            .follow_links(self.follow_links)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| entry.file_type().is_some_and(|ft| ft.is_dir()))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("a.b.c"), Some("c"));
        assert_eq!(extension(".wav"), Some("wav"));
        assert_eq!(extension("noext"), None);
    }

    #[test]
    fn test_is_audio_file_is_case_sensitive() {
        assert!(is_audio_file("kick.wav"));
        assert!(is_audio_file("loop.mp3"));
        assert!(is_audio_file("pad.ogg"));
        assert!(!is_audio_file("kick.WAV"));
        assert!(!is_audio_file("kick.flac"));
        assert!(!is_audio_file("kick.wav.sbzm"));
    }

    #[test]
    fn test_collect_directories_pre_order() {
        let (_guard, root) = temp_root();
        for dir in ["b/z", "a/y", "a/x", ".hidden"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("a").join("file.wav"), b"").unwrap();

        let walker = DirectoryWalker::default();
        let listing = walker.collect_directories(&root);
        let relative: Vec<_> = listing
            .directories
            .iter()
            .map(|d| d.strip_prefix(&root).unwrap().as_str().to_owned())
            .collect();

        assert_eq!(relative, ["", "a", "a/x", "a/y", "b", "b/z"]);
        assert!(listing.errors.is_empty());
    }

    #[test]
    fn test_collect_directories_includes_hidden_when_asked() {
        let (_guard, root) = temp_root();
        fs::create_dir_all(root.join(".hidden")).unwrap();

        let config = ScanConfig {
            include_hidden: true,
            ..ScanConfig::default()
        };
        let listing = DirectoryWalker::new(&config).collect_directories(&root);
        assert_eq!(listing.directories.len(), 2);
    }

    #[test]
    fn test_collect_directories_missing_root() {
        let (_guard, root) = temp_root();
        let listing = DirectoryWalker::default().collect_directories(&root.join("missing"));
        assert!(listing.directories.is_empty());
        assert_eq!(listing.errors.len(), 1);
    }

    #[test]
    fn test_list_audio_files() {
        let (_guard, root) = temp_root();
        for name in ["c.ogg", "a.wav", "b.mp3", "notes.txt", "a.wav.sbzm", ".hidden.wav"] {
            fs::write(root.join(name), b"").unwrap();
        }
        fs::create_dir(root.join("dir.wav")).unwrap();

        let files = DirectoryWalker::default().list_audio_files(&root).unwrap();
        let names: Vec<_> = files.iter().filter_map(|f| f.file_name()).collect();
        assert_eq!(names, ["a.wav", "b.mp3", "c.ogg"]);
    }

    #[test]
    fn test_list_audio_files_missing_dir() {
        let (_guard, root) = temp_root();
        let result = DirectoryWalker::default().list_audio_files(&root.join("gone"));
        assert!(matches!(result, Err(ScanError::ReadDir { .. })));
    }
}
