//! Configuration structures for sbz.
//!
//! - [`ScanConfig`] - Search roots and scan pacing
//! - [`LibraryConfig`] - Where the tag catalog lives
//! - [`OpenConfig`] - External program used to open sound files
//! - [`TuiConfig`] - Terminal UI settings (tick rate, colors)
//! - [`Config`] - Root configuration combining all settings
//!
//! The configuration is a JSON file, by default
//! `<config_dir>/sbz/config.json`. Every section and field is optional in
//! the file; missing values take their defaults.

use std::fs;
use std::io;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::persist;

/// Directory name used under the platform config and data directories.
pub const APP_DIR_NAME: &str = "sbz";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// File name of the tag catalog inside the data directory.
pub const CATALOG_FILE_NAME: &str = "tags.json";

/// Color scheme for the TUI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ColorScheme {
    /// Automatically detect based on terminal settings.
    #[default]
    Auto,
    /// Light color scheme (dark text on light background).
    Light,
    /// Dark color scheme (light text on dark background).
    Dark,
}

/// Configuration for the scanner.
///
/// # Examples
///
/// ```
/// use sbz_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert!(config.roots.is_empty());
/// assert_eq!(config.budget_ms, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Absolute directories searched for sounds, in scan order.
    pub roots: Vec<Utf8PathBuf>,

    /// Time budget of one scan step in milliseconds.
    ///
    /// A step always finishes the directory it is working on, so zero
    /// means exactly one directory per step.
    pub budget_ms: u64,

    /// Whether hidden directories and files are scanned.
    pub include_hidden: bool,

    /// Whether symbolic links to directories are followed.
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            budget_ms: 100,
            include_hidden: false,
            follow_links: false,
        }
    }
}

impl ScanConfig {
    /// Returns the step budget as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }

    /// Validates `path` and appends it to the search roots.
    ///
    /// The path is canonicalized first, so relative input and symlinked
    /// spellings of an existing root are caught as duplicates. Returns the
    /// canonical path that was stored.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingDirectory`] if the path is not an existing directory
    /// - [`ConfigError::InvalidPath`] if the canonical path is not UTF-8
    /// - [`ConfigError::DuplicateRoot`] if the root is already configured
    /// - [`ConfigError::NestedRoot`] if the root contains, or lies inside,
    ///   a configured root
    pub fn add_root(&mut self, path: &Utf8Path) -> Result<Utf8PathBuf, ConfigError> {
        let root = validate_root(path)?;
        check_overlap(&self.roots, &root)?;
        info!(root = %root, "Added search root");
        self.roots.push(root.clone());
        Ok(root)
    }

    /// Removes a search root. Returns `false` if it was not configured.
    ///
    /// Both the stored spelling and the canonical form of `path` are tried,
    /// so a root whose directory has since vanished can still be removed.
    pub fn remove_root(&mut self, path: &Utf8Path) -> bool {
        let canonical = path
            .canonicalize_utf8()
            .unwrap_or_else(|_| path.to_path_buf());
        let before = self.roots.len();
        self.roots.retain(|r| r != path && *r != canonical);
        let removed = self.roots.len() != before;
        if removed {
            info!(root = %path, "Removed search root");
        }
        removed
    }

    /// Replaces the search roots with `paths`, validating each one.
    ///
    /// Nothing changes if any path is rejected.
    ///
    /// # Errors
    ///
    /// Same as [`add_root`](Self::add_root).
    pub fn set_roots<'a>(
        &mut self,
        paths: impl IntoIterator<Item = &'a Utf8Path>,
    ) -> Result<(), ConfigError> {
        let mut staged = Self {
            roots: Vec::new(),
            ..self.clone()
        };
        for path in paths {
            staged.add_root(path)?;
        }
        self.roots = staged.roots;
        Ok(())
    }
}

/// Rejects `root` if it equals, contains, or lies inside one of `roots`.
///
/// Nested roots would be scanned once, under whichever root is queued
/// first, so the other root's subtree would be missing from the tree.
fn check_overlap(roots: &[Utf8PathBuf], root: &Utf8Path) -> Result<(), ConfigError> {
    for other in roots {
        if other == root {
            return Err(ConfigError::DuplicateRoot(root.to_path_buf()));
        }
        if root.starts_with(other) || other.starts_with(root) {
            return Err(ConfigError::NestedRoot {
                root: root.to_path_buf(),
                other: other.clone(),
            });
        }
    }
    Ok(())
}

/// Canonicalizes a search root and checks that it is a directory.
///
/// # Errors
///
/// See [`ScanConfig::add_root`].
pub fn validate_root(path: &Utf8Path) -> Result<Utf8PathBuf, ConfigError> {
    let canonical = match path.as_std_path().canonicalize() {
        Ok(p) => p,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingDirectory(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::InvalidPath {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    let canonical = Utf8PathBuf::try_from(canonical).map_err(|e| ConfigError::InvalidPath {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !canonical.is_dir() {
        return Err(ConfigError::MissingDirectory(canonical));
    }
    Ok(canonical)
}

/// Where the tag catalog is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Explicit catalog file. `None` uses `tags.json` in the data directory.
    pub catalog_path: Option<Utf8PathBuf>,
}

impl LibraryConfig {
    /// Returns the catalog file to use, if one can be determined.
    #[must_use]
    pub fn resolve_catalog_path(&self) -> Option<Utf8PathBuf> {
        self.catalog_path
            .clone()
            .or_else(|| Config::data_dir().map(|dir| dir.join(CATALOG_FILE_NAME)))
    }
}

/// External program used to open sound files.
///
/// The command is split on whitespace; the selected file paths are appended
/// as extra arguments. A blank command disables opening.
///
/// # Examples
///
/// ```
/// use sbz_core::OpenConfig;
///
/// let config = OpenConfig { command: "mpv --no-video".to_owned(), allow_multiple: false };
/// assert!(config.is_enabled());
/// assert_eq!(config.program_and_args(), Some(("mpv", vec!["--no-video"])));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenConfig {
    /// Program and leading arguments.
    pub command: String,

    /// Whether several files may be passed in one invocation.
    pub allow_multiple: bool,
}

impl OpenConfig {
    /// Returns `true` if an open command is configured.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.command.trim().is_empty()
    }

    /// Splits the command into the program and its leading arguments.
    #[must_use]
    pub fn program_and_args(&self) -> Option<(&str, Vec<&str>)> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next()?;
        Some((program, parts.collect()))
    }
}

/// Configuration for the terminal user interface.
///
/// # Examples
///
/// ```
/// use sbz_core::{TuiConfig, ColorScheme};
///
/// let config = TuiConfig::default();
/// assert_eq!(config.tick_rate_ms, 50);
/// assert_eq!(config.color_scheme, ColorScheme::Auto);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Interval between ticks in milliseconds. Each tick runs one scan step.
    pub tick_rate_ms: u64,

    /// Frames rendered per second.
    pub frame_rate: u32,

    /// Color scheme for the interface.
    pub color_scheme: ColorScheme,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            frame_rate: 30,
            color_scheme: ColorScheme::Auto,
        }
    }
}

/// Root configuration for sbz.
///
/// # Examples
///
/// ```
/// use sbz_core::Config;
///
/// let config = Config::default();
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// let parsed: Config = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, parsed);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scanner configuration.
    pub scan: ScanConfig,

    /// Tag catalog location.
    pub library: LibraryConfig,

    /// Open command.
    pub open: OpenConfig,

    /// Terminal UI configuration.
    pub tui: TuiConfig,
}

impl Config {
    /// Returns the default configuration file path.
    #[must_use]
    pub fn default_path() -> Option<Utf8PathBuf> {
        let dir = Utf8PathBuf::try_from(dirs::config_dir()?).ok()?;
        Some(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Returns the directory holding the tag catalog and log files.
    #[must_use]
    pub fn data_dir() -> Option<Utf8PathBuf> {
        let dir = Utf8PathBuf::try_from(dirs::data_local_dir()?).ok()?;
        Some(dir.join(APP_DIR_NAME))
    }

    /// Reads and validates the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds invalid values.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!(path = %path, roots = config.scan.roots.len(), "Loaded configuration");
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path, "No configuration file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Writes the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Utf8Path) -> Result<(), ConfigError> {
        persist::ensure_parent_dir(path)?;
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        persist::write_atomic(path, json.as_bytes())?;
        info!(path = %path, "Saved configuration");
        Ok(())
    }

    /// Checks option values that serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tui.tick_rate_ms == 0 {
            return Err(invalid_option("tui.tick_rate_ms", "must be greater than zero"));
        }
        if self.tui.frame_rate == 0 {
            return Err(invalid_option("tui.frame_rate", "must be greater than zero"));
        }
        for (i, root) in self.scan.roots.iter().enumerate() {
            if !root.is_absolute() {
                return Err(ConfigError::InvalidPath {
                    path: root.clone(),
                    reason: "search roots must be absolute".to_owned(),
                });
            }
            check_overlap(&self.scan.roots[..i], root)?;
        }
        Ok(())
    }
}

fn invalid_option(option: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidOption {
        option: option.to_owned(),
        reason: reason.to_owned(),
    }
}
