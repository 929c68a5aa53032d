//! TUI-specific error types.

use thiserror::Error;

/// Errors that can occur in the TUI.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TuiError {
    /// Terminal initialization or operation failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Event channel was closed unexpectedly.
    #[error("event channel closed unexpectedly")]
    ChannelClosed,

    /// A library operation failed.
    #[error(transparent)]
    Library(#[from] sbz_scanner::LibraryError),

    /// The open command could not be started.
    #[error("failed to launch {program}: {source}")]
    Launch {
        /// Program that was launched.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TuiError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a new [`TuiError::Launch`] error.
    #[must_use]
    pub fn launch(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Launch {
            program: program.into(),
            source,
        }
    }

    /// Returns `true` if the browser can keep running after this error.
    ///
    /// Library and launch failures are reported in the status bar; terminal
    /// failures end the session.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Library(_) | Self::Launch { .. } | Self::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = TuiError::config("open command is blank");
        assert!(matches!(err, TuiError::Config(_)));
        assert_eq!(err.to_string(), "configuration error: open command is blank");
    }

    #[test]
    fn test_launch_error_display() {
        let err = TuiError::launch("mpv", std::io::Error::other("not found"));
        assert_eq!(err.to_string(), "failed to launch mpv: not found");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(!TuiError::ChannelClosed.is_recoverable());
        assert!(!TuiError::Terminal(std::io::Error::other("gone")).is_recoverable());
        assert!(TuiError::launch("mpv", std::io::Error::other("x")).is_recoverable());
        let unknown = sbz_scanner::LibraryError::UnknownFile("/a.wav".into());
        assert!(TuiError::from(unknown).is_recoverable());
    }
}
