//! CLI entry point for the sbz sound browser.
//!
//! Scans sample directories for audio files, reads their `.sbzm` tag
//! sidecars, and filters the collection by tag.
//!
//! # Usage
//!
//! ```bash
//! sbz [OPTIONS] <COMMAND>
//!
//! # Add a search root (saved to the configuration)
//! sbz roots add ~/samples
//!
//! # Print every sound tagged "drum" but not "loop"
//! sbz scan --include drum --exclude loop
//!
//! # Tag a sound
//! sbz assign ~/samples/kick.wav drum acoustic
//!
//! # Interactive browser
//! sbz browse
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::fs::{self, File};
use std::io::Write;
use std::sync::Mutex;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use sbz_core::{CatalogError, Config, SoundMetadata, TagCatalog, TagColor, TagDefinition, TagId};
use sbz_scanner::{Library, StatsSnapshot, TagFilter, is_audio_file};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the log file written while the browser owns the terminal.
const LOG_FILE_NAME: &str = "sbz.log";

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Tag-based browser for audio sample collections.
///
/// Tags live next to each sound in a `<file>.sbzm` sidecar; tag names and
/// colors are kept in a catalog in the data directory.
#[derive(Parser)]
#[command(name = "sbz", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Configuration file.
    ///
    /// Defaults to `sbz/config.json` in the user configuration directory.
    #[arg(long, global = true, env = "SBZ_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Tag catalog file (overrides the configuration).
    #[arg(long, global = true, env = "SBZ_CATALOG")]
    catalog: Option<Utf8PathBuf>,

    /// Search root to scan instead of the configured ones. Repeatable.
    #[arg(short, long = "root", global = true)]
    roots: Vec<Utf8PathBuf>,

    /// Time budget of one scan step in milliseconds.
    #[arg(long, global = true, env = "SBZ_BUDGET_MS")]
    budget_ms: Option<u64>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true, env = "SBZ_NO_COLOR")]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan the search roots and print the sounds that pass the filter.
    Scan {
        /// Only show sounds carrying this tag. Repeatable.
        #[arg(short, long)]
        include: Vec<String>,

        /// Hide sounds carrying this tag. Repeatable.
        #[arg(short = 'x', long)]
        exclude: Vec<String>,

        /// Print a JSON report instead of a tree.
        #[arg(long)]
        json: bool,
    },

    /// Start the interactive browser.
    Browse,

    /// Manage the tag catalog.
    Tags {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Replace the tags of a sound. No tags clears them.
    Assign {
        /// The sound file.
        file: Utf8PathBuf,

        /// Tag names.
        tags: Vec<String>,
    },

    /// Show the tags of a sound.
    Show {
        /// The sound file.
        file: Utf8PathBuf,
    },

    /// Manage the configured search roots.
    Roots {
        #[command(subcommand)]
        command: RootCommands,
    },
}

/// Tag catalog subcommands.
#[derive(Subcommand)]
enum TagCommands {
    /// List every tag with its color.
    List {
        /// Scan the roots and show how many sounds carry each tag.
        #[arg(short, long)]
        usage: bool,
    },

    /// Register a new tag.
    Create {
        /// Tag name.
        name: String,

        /// Color as `#rrggbb` or `#rrggbbaa`. Defaults to white.
        #[arg(short, long)]
        color: Option<TagColor>,
    },

    /// Rename or recolor a tag.
    Edit {
        /// Current tag name.
        name: String,

        /// New name.
        #[arg(short = 'n', long = "name")]
        rename: Option<String>,

        /// New color.
        #[arg(short, long)]
        color: Option<TagColor>,
    },

    /// Remove a tag that no sound carries.
    Remove {
        /// Tag name.
        name: String,
    },
}

/// Search root subcommands.
#[derive(Subcommand)]
enum RootCommands {
    /// List the configured roots.
    List,

    /// Add a directory.
    Add {
        /// Directory to add.
        dir: Utf8PathBuf,
    },

    /// Remove a directory.
    Remove {
        /// Directory to remove.
        dir: Utf8PathBuf,
    },
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Where log output goes.
enum LogSink {
    /// Standard error.
    Terminal,
    /// A file, used while the browser owns the terminal.
    File(File),
    /// Nowhere.
    Off,
}

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool, sink: LogSink) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},mio=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    let (terminal_layer, file_layer) = match sink {
        LogSink::Terminal => (
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(use_ansi)
                    .with_writer(std::io::stderr),
            ),
            None,
        ),
        LogSink::File(file) => (
            None,
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            ),
        ),
        LogSink::Off => (None, None),
    };

    tracing_subscriber::registry()
        .with(terminal_layer)
        .with(file_layer)
        .with(filter)
        .init();
}

/// Opens the browser log file in the data directory.
fn open_log_file() -> Option<File> {
    let dir = Config::data_dir()?;
    fs::create_dir_all(&dir).ok()?;
    File::options()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
        .ok()
}

/// Returns the configuration file path from `--config` or the default.
fn config_path(cli: &Cli) -> color_eyre::Result<Utf8PathBuf> {
    cli.config
        .clone()
        .or_else(Config::default_path)
        .ok_or_else(|| eyre!("No configuration directory available; pass --config"))
}

/// Loads the configuration and applies the command-line overrides.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let path = config_path(cli)?;
    let mut config = Config::load_or_default(&path)
        .wrap_err_with(|| format!("Failed to load configuration {path}"))?;

    if let Some(catalog) = &cli.catalog {
        config.library.catalog_path = Some(catalog.clone());
    }
    if !cli.roots.is_empty() {
        config.scan.set_roots(cli.roots.iter().map(Utf8PathBuf::as_path))?;
    }
    if let Some(budget_ms) = cli.budget_ms {
        config.scan.budget_ms = budget_ms;
    }
    config.validate()?;
    Ok(config)
}

/// Opens the library, failing if there is nothing to scan.
fn open_scannable(config: &Config) -> color_eyre::Result<Library> {
    if config.scan.roots.is_empty() {
        return Err(eyre!(
            "No search roots configured; add one with `sbz roots add <dir>` or pass --root"
        ));
    }
    Ok(Library::open(config)?)
}

fn load_catalog(config: &Config) -> color_eyre::Result<TagCatalog> {
    Ok(match config.library.resolve_catalog_path() {
        Some(path) => TagCatalog::load(&path)?,
        None => TagCatalog::new(),
    })
}

fn find_tag(catalog: &TagCatalog, name: &str) -> Result<TagId, CatalogError> {
    catalog
        .find_by_name(name)
        .ok_or_else(|| CatalogError::UnknownName(name.to_owned()))
}

/// Resolves tag names, failing on the first unknown one.
fn resolve_tags(catalog: &TagCatalog, names: &[String]) -> Result<Vec<TagId>, CatalogError> {
    names.iter().map(|name| find_tag(catalog, name)).collect()
}

/// Canonicalizes a sound path and checks that it names an audio file.
fn sound_path(file: &Utf8Path) -> color_eyre::Result<Utf8PathBuf> {
    let path = file
        .canonicalize_utf8()
        .wrap_err_with(|| format!("Cannot access {file}"))?;
    let is_sound = path.is_file() && path.file_name().is_some_and(is_audio_file);
    if !is_sound {
        return Err(eyre!("Not a sound file (wav, mp3, ogg): {path}"));
    }
    Ok(path)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs a full scan and prints the filtered result.
fn run_scan(
    config: &Config,
    include: &[String],
    exclude: &[String],
    json: bool,
) -> color_eyre::Result<()> {
    let mut library = open_scannable(config)?;
    info!(roots = config.scan.roots.len(), "Starting scan");
    let stats = library.scan_to_completion();

    let filter = TagFilter::new(
        resolve_tags(library.catalog(), include)?,
        resolve_tags(library.catalog(), exclude)?,
    );
    let visible = library.set_filter(filter);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut handle, &ScanReport::new(&library, stats))?;
        writeln!(handle)?;
    } else {
        write!(handle, "{}", library.tree().render_text(true))?;
        writeln!(handle)?;
        write_summary(&mut handle, &stats, visible)?;
    }

    if stats.directories_failed > 0 || stats.sidecars_failed > 0 {
        warn!(
            directories = stats.directories_failed,
            sidecars = stats.sidecars_failed,
            "Some entries could not be read"
        );
    }
    Ok(())
}

/// Runs the interactive browser.
async fn run_browse(config: Config) -> color_eyre::Result<()> {
    let library = Library::open(&config)?;
    info!(roots = config.scan.roots.len(), "Starting browser");

    // Handle SIGTERM for graceful shutdown on Unix
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            result = sbz_tui::run(config, library) => {
                result.map_err(|e| eyre!("Browser error: {}", e))?;
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        sbz_tui::run(config, library)
            .await
            .map_err(|e| eyre!("Browser error: {}", e))?;
    }

    Ok(())
}

fn run_tags(config: &Config, command: &TagCommands) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    match command {
        TagCommands::List { usage } => {
            let mut library = if *usage {
                open_scannable(config)?
            } else {
                Library::open(config)?
            };
            if *usage {
                library.scan_to_completion();
            }
            write_tags(&mut handle, &library, *usage)?;
        }
        TagCommands::Create { name, color } => {
            let mut library = Library::open(config)?;
            let id = library.create_tag(TagDefinition::new(name, color.unwrap_or_default()))?;
            let tag = library.catalog().get(id).ok_or(CatalogError::UnknownTag(id))?;
            writeln!(handle, "Created tag '{}' ({})", tag.name, tag.color)?;
        }
        TagCommands::Edit {
            name,
            rename,
            color,
        } => {
            let mut library = Library::open(config)?;
            // Only scanned files get their sidecars rewritten on rename.
            if rename.is_some() && !config.scan.roots.is_empty() {
                library.scan_to_completion();
            }
            let id = find_tag(library.catalog(), name)?;
            let mut working = library
                .catalog()
                .get(id)
                .cloned()
                .ok_or(CatalogError::UnknownTag(id))?;
            if let Some(rename) = rename {
                working.name.clone_from(rename);
            }
            if let Some(color) = color {
                working.color = *color;
            }
            library.edit_tag(id, &working)?;
            writeln!(handle, "Updated tag '{}' ({})", working.name, working.color)?;
        }
        TagCommands::Remove { name } => {
            // Usage counts come from a full scan.
            let mut library = open_scannable(config)?;
            library.scan_to_completion();
            let id = find_tag(library.catalog(), name)?;
            let removed = library.delete_tag(id)?;
            writeln!(handle, "Removed tag '{}'", removed.name)?;
        }
    }
    Ok(())
}

fn run_assign(config: &Config, file: &Utf8Path, names: &[String]) -> color_eyre::Result<()> {
    let path = sound_path(file)?;
    let catalog = load_catalog(config)?;
    let tags = resolve_tags(&catalog, names)
        .wrap_err("Create missing tags with `sbz tags create <name>`")?;

    let mut metadata = SoundMetadata::new(path.clone());
    metadata.set_tags(tags);
    metadata.save(&catalog)?;
    info!(path = %path, tags = metadata.tags().len(), "Assigned tags");

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if metadata.is_empty() {
        writeln!(handle, "Cleared tags of {path}")?;
    } else {
        writeln!(handle, "{path}: {}", metadata.format_record(&catalog))?;
    }
    Ok(())
}

fn run_show(config: &Config, file: &Utf8Path) -> color_eyre::Result<()> {
    let path = sound_path(file)?;
    let mut catalog = load_catalog(config)?;
    let mut metadata = SoundMetadata::new(path.clone());
    let has_sidecar = metadata.load(&mut catalog)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{path}")?;
    if !has_sidecar {
        writeln!(handle, "  (no sidecar)")?;
    }
    for tag in metadata.tags().iter().filter_map(|t| catalog.get(*t)) {
        writeln!(handle, "  {}  {}", tag.color, tag.name)?;
    }
    Ok(())
}

fn run_roots(cli: &Cli, command: &RootCommands) -> color_eyre::Result<()> {
    // Root edits apply to the configuration file, not to --root overrides.
    let path = config_path(cli)?;
    let mut config = Config::load_or_default(&path)
        .wrap_err_with(|| format!("Failed to load configuration {path}"))?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    match command {
        RootCommands::List => {
            for root in &config.scan.roots {
                writeln!(handle, "{root}")?;
            }
        }
        RootCommands::Add { dir } => {
            let root = config.scan.add_root(dir)?;
            config.save(&path)?;
            writeln!(handle, "Added {root}")?;
        }
        RootCommands::Remove { dir } => {
            if !config.scan.remove_root(dir) {
                return Err(eyre!("Not a configured root: {dir}"));
            }
            config.save(&path)?;
            writeln!(handle, "Removed {dir}")?;
        }
    }
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// JSON output of `sbz scan --json`.
#[derive(Serialize)]
struct ScanReport<'a> {
    roots: &'a [Utf8PathBuf],
    stats: StatsSnapshot,
    visible: usize,
    sounds: Vec<SoundReport<'a>>,
}

#[derive(Serialize)]
struct SoundReport<'a> {
    path: &'a Utf8Path,
    directory: &'a Utf8Path,
    tags: Vec<&'a str>,
}

impl<'a> ScanReport<'a> {
    /// Collects the sounds that pass the active filter.
    fn new(library: &'a Library, stats: StatsSnapshot) -> Self {
        let tree = library.tree();
        let catalog = library.catalog();
        let sounds = tree
            .files()
            .iter()
            .filter(|f| {
                tree.node_for_path(&f.full_path)
                    .is_some_and(|id| tree.is_visible(id))
            })
            .map(|f| SoundReport {
                path: &f.full_path,
                directory: &f.relative_path,
                tags: f
                    .metadata
                    .tags()
                    .iter()
                    .filter_map(|t| catalog.name(*t))
                    .collect(),
            })
            .collect();

        Self {
            roots: library.roots(),
            stats,
            visible: library.visible_file_count(),
            sounds,
        }
    }
}

fn write_summary(
    out: &mut impl Write,
    stats: &StatsSnapshot,
    visible: usize,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{visible} of {} sounds shown, {} directories scanned in {} steps",
        stats.files_found, stats.directories_scanned, stats.steps
    )?;
    if stats.directories_failed > 0 {
        writeln!(out, "{} directories could not be read", stats.directories_failed)?;
    }
    if stats.sidecars_failed > 0 {
        writeln!(out, "{} sidecars could not be read", stats.sidecars_failed)?;
    }
    Ok(())
}

fn write_tags(out: &mut impl Write, library: &Library, usage: bool) -> std::io::Result<()> {
    for (id, tag) in library.catalog().all() {
        if usage {
            writeln!(out, "{}  {:>5}  {}", tag.color, library.tag_usage(id), tag.name)?;
        } else {
            writeln!(out, "{}  {}", tag.color, tag.name)?;
        }
    }
    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // The browser owns the terminal, so its logs go to a file.
    let sink = match cli.command {
        Commands::Browse => open_log_file().map_or(LogSink::Off, LogSink::File),
        _ => LogSink::Terminal,
    };
    init_tracing(cli.verbose, cli.no_color, sink);

    match &cli.command {
        Commands::Scan {
            include,
            exclude,
            json,
        } => run_scan(&build_config(&cli)?, include, exclude, *json),
        Commands::Browse => run_browse(build_config(&cli)?).await,
        Commands::Tags { command } => run_tags(&build_config(&cli)?, command),
        Commands::Assign { file, tags } => run_assign(&build_config(&cli)?, file, tags),
        Commands::Show { file } => run_show(&build_config(&cli)?, file),
        Commands::Roots { command } => run_roots(&cli, command),
    }
}
