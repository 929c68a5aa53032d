//! Launching the configured open command on sounds.
//!
//! The command runs detached with its standard streams closed so it
//! cannot draw over the terminal UI.

use std::process::{Command, Stdio};

use camino::{Utf8Path, Utf8PathBuf};
use sbz_core::OpenConfig;
use tracing::info;

use crate::error::TuiError;

/// A resolved open command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    program: String,
    args: Vec<String>,
    allow_multiple: bool,
}

impl Launcher {
    /// Resolves the open command. Returns `None` when it is blank.
    #[must_use]
    pub fn from_config(config: &OpenConfig) -> Option<Self> {
        let (program, args) = config.program_and_args()?;
        Some(Self {
            program: program.to_owned(),
            args: args.into_iter().map(str::to_owned).collect(),
            allow_multiple: config.allow_multiple,
        })
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Builds the invocations needed to open `paths`: one for all of them
    /// when several files may be passed at once, otherwise one per file.
    #[must_use]
    pub fn commands(&self, paths: &[Utf8PathBuf]) -> Vec<Command> {
        if paths.is_empty() {
            return Vec::new();
        }
        if self.allow_multiple {
            return vec![self.command(paths)];
        }
        paths
            .iter()
            .map(|p| self.command(std::slice::from_ref(p)))
            .collect()
    }

    /// Starts the program on `paths` without waiting for it.
    ///
    /// Returns the number of processes started.
    ///
    /// # Errors
    ///
    /// Returns [`TuiError::Launch`] if a process cannot be spawned.
    /// Processes started before the failure keep running.
    pub fn open(&self, paths: &[Utf8PathBuf]) -> Result<usize, TuiError> {
        let mut started = 0;
        for mut command in self.commands(paths) {
            command
                .spawn()
                .map_err(|e| TuiError::launch(&self.program, e))?;
            started += 1;
        }
        info!(program = %self.program, files = paths.len(), started, "Opened sounds");
        Ok(started)
    }

    fn command(&self, paths: &[Utf8PathBuf]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .args(paths.iter().map(Utf8PathBuf::as_path).map(Utf8Path::as_std_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = paths.first().and_then(|p| p.parent()) {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(command: &str, allow_multiple: bool) -> OpenConfig {
        OpenConfig {
            command: command.to_owned(),
            allow_multiple,
        }
    }

    fn args_of(command: &Command) -> Vec<String> {
        command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_blank_command_disables() {
        assert!(Launcher::from_config(&config("   ", false)).is_none());
    }

    #[test]
    fn test_single_file_per_invocation() {
        let launcher = Launcher::from_config(&config("mpv --no-video", false)).unwrap();
        let paths = [Utf8PathBuf::from("/s/a.wav"), Utf8PathBuf::from("/s/b.wav")];
        let commands = launcher.commands(&paths);

        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].get_program(), "mpv");
        assert_eq!(args_of(&commands[0]), ["--no-video", "/s/a.wav"]);
        assert_eq!(args_of(&commands[1]), ["--no-video", "/s/b.wav"]);
    }

    #[test]
    fn test_multiple_files_in_one_invocation() {
        let launcher = Launcher::from_config(&config("play", true)).unwrap();
        let paths = [Utf8PathBuf::from("/s/a.wav"), Utf8PathBuf::from("/s/b.wav")];
        let commands = launcher.commands(&paths);

        assert_eq!(commands.len(), 1);
        assert_eq!(args_of(&commands[0]), ["/s/a.wav", "/s/b.wav"]);
    }

    #[test]
    fn test_missing_program_fails_to_launch() {
        let launcher =
            Launcher::from_config(&config("sbz-definitely-not-a-program", false)).unwrap();
        let err = launcher.open(&[Utf8PathBuf::from("/s/a.wav")]).unwrap_err();
        assert!(matches!(err, TuiError::Launch { .. }));
        assert_eq!(launcher.open(&[]).unwrap(), 0);
    }
}
