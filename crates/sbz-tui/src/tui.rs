//! Terminal wrapper with async event streaming.
//!
//! [`Tui`] owns the Ratatui terminal and a background task that merges
//! crossterm input with the tick and render timers into one channel:
//!
//! ```text
//! EventStream ──┐
//! tick timer ───┼──► select! ──► mpsc::Sender<Event> ──► Tui::next_event
//! render timer ─┘
//! ```
//!
//! Ticks and renders run on separate intervals so the scan rate and the
//! frame rate can be tuned independently.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    EventStream, KeyEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use crate::error::TuiError;
use crate::event::Event;

/// Capacity of the event channel.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Terminal wrapper with async event streaming.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    task: Option<JoinHandle<()>>,
    cancellation_token: CancellationToken,
    /// Interval between ticks.
    tick_delay: Duration,
    /// Interval between renders.
    render_delay: Duration,
    entered: bool,
}

impl Tui {
    /// Creates a terminal wrapper ticking every `tick_delay`.
    ///
    /// The terminal is not entered yet; call [`enter()`](Self::enter) to
    /// switch to raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new(tick_delay: Duration) -> Result<Self, TuiError> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        debug!(tick_ms = tick_delay.as_millis(), "Created TUI");

        Ok(Self {
            terminal,
            event_rx,
            event_tx,
            task: None,
            cancellation_token: CancellationToken::new(),
            tick_delay: nonzero(tick_delay),
            render_delay: Duration::from_millis(1000 / 30),
            entered: false,
        })
    }

    /// Sets the number of frames rendered per second.
    #[must_use]
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.render_delay = nonzero(Duration::from_secs(1) / fps.max(1));
        self
    }

    /// Returns a sender for injecting events into the loop.
    #[must_use]
    pub fn event_sender(&self) -> mpsc::Sender<Event> {
        self.event_tx.clone()
    }

    /// Enters raw mode and the alternate screen and starts the event task.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal mode cannot be changed.
    pub fn enter(&mut self) -> Result<(), TuiError> {
        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        io::stdout().execute(EnableMouseCapture)?;
        io::stdout().execute(EnableBracketedPaste)?;

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        self.entered = true;

        self.start_event_loop();
        debug!("Terminal entered");
        Ok(())
    }

    /// Stops the event task and restores the terminal.
    ///
    /// Does nothing if the terminal was not entered.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal mode cannot be restored.
    pub fn exit(&mut self) -> Result<(), TuiError> {
        if !self.entered {
            return Ok(());
        }
        self.stop_event_loop();

        self.terminal.show_cursor()?;
        io::stdout().execute(DisableBracketedPaste)?;
        io::stdout().execute(DisableMouseCapture)?;
        io::stdout().execute(LeaveAlternateScreen)?;
        disable_raw_mode()?;
        self.entered = false;

        debug!("Terminal exited");
        Ok(())
    }

    /// Draws one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    pub fn draw<F>(&mut self, f: F) -> Result<(), TuiError>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }

    /// Waits for the next event. Returns `None` once the channel closes.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    fn start_event_loop(&mut self) {
        // A fresh token, so the loop can be restarted after `exit`.
        self.cancellation_token = CancellationToken::new();
        let tick_delay = self.tick_delay;
        let render_delay = self.render_delay;
        let event_tx = self.event_tx.clone();
        let cancellation_token = self.cancellation_token.clone();

        debug!(
            tick_ms = tick_delay.as_millis(),
            render_ms = render_delay.as_millis(),
            "Starting event loop"
        );

        let task = tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_delay);
            let mut render_interval = tokio::time::interval(render_delay);
            tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            render_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    () = cancellation_token.cancelled() => break,
                    _ = tick_interval.tick() => Some(Event::Tick),
                    _ = render_interval.tick() => Some(Event::Render),
                    event = Self::read_crossterm_event(&mut reader) => event,
                };

                if let Some(event) = event {
                    trace!(?event, "Sending event");
                    if event_tx.send(event).await.is_err() {
                        error!("Event channel closed");
                        break;
                    }
                }
            }

            debug!("Event loop ended");
        });

        self.task = Some(task);
    }

    fn stop_event_loop(&mut self) {
        self.cancellation_token.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    async fn read_crossterm_event(reader: &mut EventStream) -> Option<Event> {
        use futures_util::StreamExt;

        match reader.next().await {
            Some(Ok(event)) => convert_event(event),
            Some(Err(e)) => {
                warn!(error = %e, "Error reading terminal event");
                None
            }
            None => None,
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            error!(error = %e, "Failed to restore terminal on drop");
        }
    }
}

/// Converts a crossterm event, dropping key releases and repeats.
fn convert_event(event: crossterm::event::Event) -> Option<Event> {
    use crossterm::event::Event as CrosstermEvent;

    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Key(_) => None,
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(width, height) => Some(Event::Resize { width, height }),
        CrosstermEvent::Paste(text) => Some(Event::Paste(text)),
        CrosstermEvent::FocusGained => Some(Event::FocusGained),
        CrosstermEvent::FocusLost => Some(Event::FocusLost),
    }
}

fn nonzero(delay: Duration) -> Duration {
    delay.max(Duration::from_millis(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn test_key_release_is_dropped() {
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(convert_event(crossterm::event::Event::Key(release)), None);

        let press = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(matches!(
            convert_event(crossterm::event::Event::Key(press)),
            Some(Event::Key(_))
        ));
    }

    #[test]
    fn test_resize_and_paste() {
        assert_eq!(
            convert_event(crossterm::event::Event::Resize(120, 40)),
            Some(Event::Resize {
                width: 120,
                height: 40
            })
        );
        assert_eq!(
            convert_event(crossterm::event::Event::Paste("drum".to_owned())),
            Some(Event::Paste("drum".to_owned()))
        );
    }

    #[test]
    fn test_nonzero_delay() {
        assert_eq!(nonzero(Duration::ZERO), Duration::from_millis(1));
        assert_eq!(nonzero(Duration::from_millis(50)), Duration::from_millis(50));
    }
}
