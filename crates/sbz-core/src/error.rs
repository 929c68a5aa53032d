//! Error types for the sbz-core crate.
//!
//! - [`ConfigError`] - configuration loading and root validation
//! - [`CatalogError`] - tag registration, renaming, removal, and catalog persistence
//! - [`MetadataError`] - sidecar record reads and writes

use camino::Utf8PathBuf;

use crate::types::TagId;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use sbz_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/some/path"));
/// assert!(error.to_string().contains("/some/path"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The provided path is invalid or malformed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// A required directory does not exist.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// The search root is already configured.
    #[error("search root already configured: {0}")]
    DuplicateRoot(Utf8PathBuf),

    /// One search root lies inside another.
    #[error("search root '{root}' overlaps configured root '{other}'")]
    NestedRoot {
        /// The rejected root.
        root: Utf8PathBuf,
        /// The configured root it contains or is contained by.
        other: Utf8PathBuf,
    },

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading or writing configuration.
    #[error("failed to access configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by the [`TagCatalog`](crate::TagCatalog).
///
/// None of these leave the catalog partially modified: a failing call
/// returns before any mutation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A tag with the same (case-insensitive) name is already registered.
    #[error("tag '{0}' already exists")]
    Duplicate(String),

    /// The tag name cannot be stored in a sidecar record.
    #[error("invalid tag name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The color is not in `#rrggbb` or `#rrggbbaa` notation.
    #[error("invalid tag color '{0}'")]
    InvalidColor(String),

    /// No tag is registered under this identifier.
    #[error("unknown tag id {}", _0.as_u32())]
    UnknownTag(TagId),

    /// No tag is registered under this name.
    #[error("unknown tag '{0}'")]
    UnknownName(String),

    /// The tag is still assigned to one or more files.
    #[error("tag '{name}' is still assigned to {references} file(s)")]
    InUse {
        /// Name of the tag.
        name: String,
        /// Number of files still carrying the tag.
        references: usize,
    },

    /// Reading or writing the catalog file failed.
    #[error("failed to access tag catalog {path}: {source}")]
    Io {
        /// The catalog file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid JSON.
    #[error("failed to parse tag catalog {path}: {source}")]
    Parse {
        /// The catalog file path.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    /// Creates a new [`CatalogError::InvalidName`] error.
    #[inline]
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error came from user input rather than storage.
    #[inline]
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Duplicate(_)
                | Self::InvalidName { .. }
                | Self::InvalidColor(_)
                | Self::UnknownTag(_)
                | Self::UnknownName(_)
                | Self::InUse { .. }
        )
    }
}

/// Errors that can occur while reading or writing a sidecar record.
///
/// A missing sidecar is not an error; it means the file has no tags yet.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The sidecar exists but could not be read.
    #[error("failed to read sidecar {path}: {source}")]
    Read {
        /// The sidecar path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The sidecar could not be written. The previous record is left intact.
    #[error("failed to write sidecar {path}: {source}")]
    Write {
        /// The sidecar path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl MetadataError {
    /// Returns the sidecar path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_display() {
        let error = ConfigError::InvalidPath {
            path: Utf8PathBuf::from("/invalid/path"),
            reason: "not absolute".to_owned(),
        };
        let msg = error.to_string();
        assert!(msg.contains("/invalid/path"));
        assert!(msg.contains("not absolute"));
    }

    #[test]
    fn test_duplicate_root_display() {
        let error = ConfigError::DuplicateRoot(Utf8PathBuf::from("/samples"));
        assert!(error.to_string().contains("/samples"));
    }

    #[test]
    fn test_catalog_error_classification() {
        assert!(CatalogError::Duplicate("drum".to_owned()).is_user_error());
        assert!(CatalogError::invalid_name("a,b", "contains ','").is_user_error());

        let io = CatalogError::Io {
            path: Utf8PathBuf::from("tags.json"),
            source: std::io::Error::other("disk full"),
        };
        assert!(!io.is_user_error());
        assert!(io.to_string().contains("tags.json"));
    }

    #[test]
    fn test_in_use_display() {
        let error = CatalogError::InUse {
            name: "drum".to_owned(),
            references: 3,
        };
        assert_eq!(error.to_string(), "tag 'drum' is still assigned to 3 file(s)");
    }

    #[test]
    fn test_metadata_error_path() {
        let error = MetadataError::Write {
            path: Utf8PathBuf::from("/s/kick.wav.sbzm"),
            source: std::io::Error::other("read-only"),
        };
        assert_eq!(error.path().as_str(), "/s/kick.wav.sbzm");
    }
}
