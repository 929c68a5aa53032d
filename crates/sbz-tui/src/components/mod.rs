//! UI components for the TUI.
//!
//! # Component Types
//!
//! - **Widgets** (`Widget` trait): `HeaderBar`, `StatusBar`, `DetailPane`
//! - **Stateful Widgets** (`StatefulWidget` trait): `TreeView`, `TagList`
//! - **Overlays**: `HelpPanel`, `TextInput`, `ScanOverlay`

mod detail_pane;
mod header;
mod help;
mod scan_overlay;
mod status_bar;
mod tag_list;
mod text_input;
mod tree_view;

pub use detail_pane::DetailPane;
pub use header::HeaderBar;
pub use help::HelpPanel;
pub use scan_overlay::ScanOverlay;
pub use status_bar::StatusBar;
pub use tag_list::{TagList, TagMarks};
pub use text_input::TextInput;
pub use tree_view::{TreeView, row_text};
