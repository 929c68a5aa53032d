//! Terminal sound browser for sbz using Ratatui.
//!
//! The browser owns a [`Library`](sbz_scanner::Library) and drives its
//! incremental scan from the tick timer, one time-boxed step per tick, so
//! the interface stays responsive on large sample collections.
//!
//! # Architecture
//!
//! ```text
//! crates/sbz-tui/src/
//!   lib.rs            # Public API exports and the event loop
//!   app.rs            # Application state and lifecycle
//!   event.rs          # Event types (Key, Mouse, Paste, Tick, Render)
//!   tui.rs            # Terminal wrapper with async event streaming
//!   action.rs         # User actions (commands from key bindings)
//!   launcher.rs       # Open command
//!   ui.rs             # Main layout rendering orchestration
//!   theme.rs          # Color scheme and styling constants
//!   error.rs          # TUI-specific error types
//!   components/
//!     tree_view.rs    # TreeView for the visible hierarchy
//!     tag_list.rs     # TagList for the four tag panels
//!     detail_pane.rs  # DetailPane for the selected sound
//!     header.rs       # HeaderBar component
//!     status_bar.rs   # StatusBar component
//!     help.rs         # HelpPanel modal overlay
//!     text_input.rs   # Search and tag name input
//!     scan_overlay.rs # Scan progress overlay
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use camino::Utf8Path;
//! use sbz_core::Config;
//! use sbz_scanner::Library;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_default(Utf8Path::new("config.json"))?;
//! let library = Library::open(&config)?;
//! sbz_tui::run(config, library).await?;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod action;
pub mod app;
pub mod components;
pub mod error;
pub mod event;
pub mod launcher;
pub mod theme;
pub mod tui;
pub mod ui;

use std::time::Duration;

use sbz_core::Config;
use sbz_scanner::Library;
use tracing::info;

pub use action::{Action, InputPurpose};
pub use app::{App, AppMode, Focus, ListState, StatusMessage, TreeRow};
pub use error::TuiError;
pub use event::Event;
pub use launcher::Launcher;
pub use theme::Theme;
pub use tui::Tui;

/// Runs the browser until the user quits.
///
/// The first scan starts immediately if roots are configured; the tree
/// appears when it completes.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn to, or
/// restored. Library failures during the session are shown in the status
/// bar instead.
pub async fn run(config: Config, library: Library) -> Result<(), TuiError> {
    let mut tui = Tui::new(Duration::from_millis(config.tui.tick_rate_ms))?
        .with_frame_rate(config.tui.frame_rate);
    let theme = Theme::from_scheme(config.tui.color_scheme);

    let mut app = App::new(config, library);
    info!(roots = app.library().roots().len(), "Starting initial scan");
    app.start();

    tui.enter()?;

    info!("Entering main event loop");
    let result = run_event_loop(&mut tui, &mut app, &theme).await;

    tui.exit()?;
    result
}

async fn run_event_loop(tui: &mut Tui, app: &mut App, theme: &Theme) -> Result<(), TuiError> {
    tui.draw(|frame| ui::render(app, frame, theme))?;

    loop {
        let Some(event) = tui.next_event().await else {
            return Err(TuiError::ChannelClosed);
        };

        let action = match event {
            Event::Key(key) => app.handle_key(key),
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::Paste(text) => app.handle_paste(&text),
            Event::Resize { .. } => Action::Render,
            Event::Tick => {
                app.tick();
                Action::None
            }
            Event::Render => {
                tui.draw(|frame| ui::render(app, frame, theme))?;
                Action::None
            }
            Event::FocusGained | Event::FocusLost => Action::None,
        };

        let render = action.needs_render();
        app.update(action);

        if app.should_quit {
            info!("Quit requested");
            return Ok(());
        }

        // Input is drawn right away; the render timer covers scan progress.
        if render {
            tui.draw(|frame| ui::render(app, frame, theme))?;
        }
    }
}
