//! Domain types for the sbz sound browser.
//!
//! # Module Organization
//!
//! - [`color`] - RGBA tag colors and their hex notation
//! - [`tag`] - Tag identifiers and definitions
//! - [`metadata`] - Per-file tag sets and the sidecar record format
//! - [`file`] - Audio files discovered during a scan
//!
//! All public types are re-exported at the crate root:
//!
//! ```
//! use sbz_core::{ScannedFile, SoundMetadata, TagColor, TagDefinition, TagId};
//! ```

mod color;
mod file;
mod metadata;
mod tag;

pub use color::TagColor;
pub use file::ScannedFile;
pub use metadata::{SIDECAR_EXTENSION, SoundMetadata, TAG_SEPARATOR, TagSet, sidecar_path};
pub use tag::{TagDefinition, TagId, UNNAMED_TAG};
pub(crate) use tag::{name_key, normalize_name};
