//! Core types, errors, and persistence for the sbz sound browser.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`TagCatalog`] - the set of known tag definitions, keyed by case-insensitive name
//! - [`SoundMetadata`] - per-file tag assignment backed by a `.sbzm` sidecar record
//! - [`ScannedFile`] - one audio file discovered under a scan root
//! - Configuration structures ([`Config`] and its sections)
//! - Error types for consistent error handling
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod hash;
pub mod persist;
pub mod types;

pub use catalog::TagCatalog;
pub use config::{ColorScheme, Config, LibraryConfig, OpenConfig, ScanConfig, TuiConfig};
pub use error::{CatalogError, ConfigError, MetadataError};
pub use hash::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
pub use types::{
    SIDECAR_EXTENSION, ScannedFile, SoundMetadata, TAG_SEPARATOR, TagColor, TagDefinition, TagId,
    TagSet, UNNAMED_TAG, sidecar_path,
};
