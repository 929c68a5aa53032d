//! The incremental scan processor.
//!
//! [`ScanProcessor`] owns the [`ScanQueue`] and the files found so far. It
//! does nothing on its own: the caller invokes [`step`](ScanProcessor::step)
//! repeatedly, and each call processes queued directories until the time
//! budget is spent. The budget is checked between directories, so a step
//! always finishes at least one directory and may overrun the budget by the
//! time that directory takes.
//!
//! Results are only handed out once the queue is fully drained.

use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use sbz_core::{ScanConfig, ScannedFile, TagCatalog};
use tracing::{debug, info, warn};

use crate::queue::{ScanQueue, ScanTask};
use crate::stats::{ScanStats, StatsSnapshot};
use crate::walker::DirectoryWalker;

/// What a call to [`ScanProcessor::step`] did.
#[derive(Debug)]
pub enum StepResult {
    /// No scan is running.
    Idle,
    /// Directories remain queued.
    Pending,
    /// The queue drained during this step. Holds every file found, in scan
    /// order.
    Finished(Vec<ScannedFile>),
}

impl StepResult {
    /// Returns `true` if the scan still has queued directories.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Drains a [`ScanQueue`] across time-boxed steps.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use sbz_core::{ScanConfig, TagCatalog};
/// use sbz_scanner::{ScanProcessor, StepResult};
///
/// let mut processor = ScanProcessor::new(&ScanConfig::default())
///     .with_budget(Duration::from_millis(10));
/// let mut catalog = TagCatalog::new();
///
/// processor.start(&["/samples".into()]);
/// let files = loop {
///     match processor.step(&mut catalog) {
///         StepResult::Finished(files) => break files,
///         StepResult::Pending => {}
///         StepResult::Idle => break Vec::new(),
///     }
/// };
/// println!("found {} sounds", files.len());
/// ```
#[derive(Debug)]
pub struct ScanProcessor {
    walker: DirectoryWalker,
    queue: ScanQueue,
    results: Vec<ScannedFile>,
    budget: Duration,
    in_progress: bool,
    stats: ScanStats,
}

impl ScanProcessor {
    /// Creates an idle processor using the scan settings.
    #[must_use]
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            walker: DirectoryWalker::new(config),
            queue: ScanQueue::new(),
            results: Vec::new(),
            budget: config.budget(),
            in_progress: false,
            stats: ScanStats::new(),
        }
    }

    /// Overrides the per-step time budget.
    #[must_use]
    pub const fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Changes the per-step time budget, effective from the next step.
    pub fn set_budget(&mut self, budget: Duration) {
        self.budget = budget;
    }

    /// Returns the per-step time budget.
    #[inline]
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Returns `true` between [`start`](Self::start) and the step that
    /// drains the queue.
    #[inline]
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Returns the number of directories still queued.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns the files found so far by the running scan.
    #[inline]
    #[must_use]
    pub fn scanned(&self) -> &[ScannedFile] {
        &self.results
    }

    /// Returns the counters of the current (or last) scan.
    #[must_use]
    pub const fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Starts a new scan of `roots`.
    ///
    /// Any scan in progress is abandoned along with its partial results.
    /// The directory walk of every root completes before this returns.
    pub fn start(&mut self, roots: &[Utf8PathBuf]) {
        if self.in_progress {
            info!(pending = self.queue.len(), "Restarting scan in progress");
        }
        self.reset();

        let report = self
            .queue
            .seed(&self.walker, roots.iter().map(Utf8PathBuf::as_path));
        self.stats.add_queued(report.queued);
        self.stats.add_failed(report.failed);
        self.in_progress = true;
        info!(roots = roots.len(), directories = report.queued, "Scan started");
    }

    /// Abandons the current scan, if any.
    pub fn cancel(&mut self) {
        if self.in_progress {
            info!(pending = self.queue.len(), "Scan cancelled");
        }
        self.reset();
    }

    /// Processes queued directories until the queue is empty or the budget
    /// has elapsed.
    ///
    /// Sidecar names are resolved through `catalog`, which may register
    /// new tags.
    pub fn step(&mut self, catalog: &mut TagCatalog) -> StepResult {
        if !self.in_progress {
            return StepResult::Idle;
        }

        let started = Instant::now();
        self.stats.increment_steps();

        let mut processed = 0_usize;
        while let Some(task) = self.queue.pop() {
            self.process_directory(&task, catalog);
            processed += 1;
            if started.elapsed() >= self.budget {
                break;
            }
        }

        debug!(
            processed,
            pending = self.queue.len(),
            elapsed_us = started.elapsed().as_micros(),
            "Scan step"
        );

        if !self.queue.is_empty() {
            return StepResult::Pending;
        }

        self.in_progress = false;
        let files = std::mem::take(&mut self.results);
        let stats = self.stats.snapshot();
        info!(
            files = files.len(),
            directories = stats.directories_scanned,
            failed = stats.directories_failed,
            steps = stats.steps,
            "Scan completed"
        );
        StepResult::Finished(files)
    }

    fn process_directory(&mut self, task: &ScanTask, catalog: &mut TagCatalog) {
        let paths = match self.walker.list_audio_files(&task.directory) {
            Ok(paths) => paths,
            Err(e) => {
                warn!(directory = %task.directory, error = %e, "Skipping directory");
                self.stats.add_failed(1);
                return;
            }
        };
        self.stats.increment_scanned();

        for path in paths {
            let mut file = ScannedFile::new(&task.scan_root, path);
            match file.metadata.load(catalog) {
                Ok(true) => self.stats.increment_sidecars(),
                Ok(false) => {}
                Err(e) => {
                    warn!(path = %file.full_path, error = %e, "Failed to read sidecar");
                    self.stats.increment_sidecar_errors();
                }
            }
            self.stats.increment_files();
            self.results.push(file);
        }
    }

    fn reset(&mut self) {
        self.queue.clear();
        self.results.clear();
        self.stats.reset();
        self.in_progress = false;
    }
}
