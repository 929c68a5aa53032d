//! Incremental sound scanning and tag filtering for sbz.
//!
//! The scan is split into two phases. Seeding walks every configured root
//! for directories only and fills a [`ScanQueue`]. Stepping then drains the
//! queue a few directories at a time under a time budget, so a caller with
//! its own event loop (the TUI) stays responsive on large or slow trees.
//!
//! When the queue is drained the flat list of [`ScannedFile`]s is turned
//! into a [`Hierarchy`], and a [`TagFilter`] decides which nodes are
//! visible. Filter changes re-run only the evaluation, not the scan.
//!
//! [`Library`] ties these together with the tag catalog.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use sbz_core::{Config, TagCatalog};
//! use sbz_scanner::Library;
//!
//! let mut config = Config::default();
//! config.scan.add_root(Utf8Path::new("/samples"))?;
//!
//! let mut library = Library::new(config.scan, TagCatalog::new(), None);
//! library.start_scan();
//! while library.step_scan().in_progress {}
//!
//! println!("{}", library.tree().render_text(true));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`ScannedFile`]: sbz_core::ScannedFile

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod filter;
pub mod hierarchy;
pub mod library;
pub mod processor;
pub mod queue;
pub mod stats;
pub mod walker;

pub use error::{LibraryError, ScanError};
pub use filter::TagFilter;
pub use hierarchy::{Hierarchy, Node, NodeId, NodeKind, ROOT_LABEL, Row};
pub use library::{Library, StepOutcome};
pub use processor::{ScanProcessor, StepResult};
pub use queue::{ScanQueue, ScanTask};
pub use stats::{ScanStats, StatsSnapshot};
pub use walker::{AUDIO_EXTENSIONS, DirectoryWalker, extension, is_audio_file};
