//! All-or-nothing file writes.
//!
//! Sidecar records, the tag catalog, and the configuration file are written
//! through [`write_atomic`]: the new contents go to a temporary sibling file
//! which is then renamed over the target. A failed write leaves the previous
//! file untouched.

use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};

/// Suffix appended to the target file name for the temporary copy.
const TEMP_SUFFIX: &str = ".tmp";

/// Writes `contents` to `path`, replacing any existing file atomically.
///
/// # Errors
///
/// Returns the underlying I/O error if the temporary file cannot be written
/// or renamed. The temporary file is removed on failure.
pub fn write_atomic(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(path);

    let result = (|| -> io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })
}

/// Creates the parent directory of `path` if it does not exist yet.
///
/// # Errors
///
/// Returns the underlying I/O error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn temp_path_for(path: &Utf8Path) -> Utf8PathBuf {
    let mut temp = path.as_str().to_owned();
    temp.push_str(TEMP_SUFFIX);
    Utf8PathBuf::from(temp)
}
