//! Error types for the sbz-scanner crate.
//!
//! - [`ScanError`] - directory enumeration failures during a scan
//! - [`LibraryError`] - failures of the [`Library`](crate::Library) operations

use camino::Utf8PathBuf;
use sbz_core::{CatalogError, ConfigError, MetadataError};

/// Errors that can occur while walking scan roots.
///
/// # Error Recovery Strategy
///
/// None of these stop a scan. The directory (or entry) involved is skipped,
/// a warning is logged, and the scan continues with the next queued
/// directory. There is no retry.
///
/// # Examples
///
/// ```
/// use sbz_scanner::ScanError;
///
/// let err = ScanError::read_dir("/samples/locked", std::io::Error::other("denied"));
/// assert!(err.is_recoverable());
/// assert_eq!(err.path().map(|p| p.as_str()), Some("/samples/locked"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The directory walker reported an error while seeding.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// A queued directory could not be listed.
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        /// The directory that couldn't be listed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl ScanError {
    /// Creates a new [`ScanError::ReadDir`] error.
    #[inline]
    pub fn read_dir(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::ReadDir {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if scanning can continue past this error.
    ///
    /// Every scan error is local to one directory, so this is always `true`.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Walk(_) | Self::ReadDir { .. } | Self::NonUtf8Path(_)
        )
    }

    /// Returns the directory associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::ReadDir { path, .. } => Some(path),
            Self::Walk(_) | Self::NonUtf8Path(_) => None,
        }
    }
}

/// Errors returned by [`Library`](crate::Library) operations.
///
/// A failed operation leaves the library as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// The file is not part of the current hierarchy.
    #[error("not a scanned sound: {0}")]
    UnknownFile(Utf8PathBuf),

    /// A tag catalog operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Reading or writing a sidecar record failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// The search roots were rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LibraryError {
    /// Returns `true` if the error was caused by the request rather than
    /// by the filesystem.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::UnknownFile(_) => true,
            Self::Catalog(e) => e.is_user_error(),
            Self::Metadata(_) => false,
            Self::Config(e) => !matches!(e, ConfigError::Io(_)),
        }
    }
}
