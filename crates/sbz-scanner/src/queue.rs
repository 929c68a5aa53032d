//! The queue of directories still to be scanned.

use std::collections::VecDeque;

use camino::{Utf8Path, Utf8PathBuf};
use sbz_core::{FxHashSet, fx_hash_set};
use tracing::{debug, info};

use crate::walker::DirectoryWalker;

/// One directory waiting to be scanned, and the root it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTask {
    /// The configured root the directory belongs to.
    pub scan_root: Utf8PathBuf,
    /// The directory to list.
    pub directory: Utf8PathBuf,
}

impl ScanTask {
    /// Creates a task.
    #[must_use]
    pub fn new(scan_root: impl Into<Utf8PathBuf>, directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            scan_root: scan_root.into(),
            directory: directory.into(),
        }
    }
}

/// FIFO queue of [`ScanTask`]s.
///
/// A directory is accepted at most once per scan, even after it has been
/// popped, so overlapping roots do not scan the same directory twice.
/// [`clear`](Self::clear) starts a new scan.
///
/// # Examples
///
/// ```
/// use sbz_scanner::{ScanQueue, ScanTask};
///
/// let mut queue = ScanQueue::new();
/// assert!(queue.push(ScanTask::new("/s", "/s")));
/// assert!(queue.push(ScanTask::new("/s", "/s/drums")));
/// assert!(!queue.push(ScanTask::new("/t", "/s/drums")));
///
/// assert_eq!(queue.pop().map(|t| t.directory), Some("/s".into()));
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ScanQueue {
    tasks: VecDeque<ScanTask>,
    seen: FxHashSet<Utf8PathBuf>,
}

/// What [`ScanQueue::seed`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Directories added to the queue.
    pub queued: usize,
    /// Directories or entries that could not be walked.
    pub failed: usize,
}

impl ScanQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
            seen: fx_hash_set(),
        }
    }

    /// Appends a task. Returns `false` if its directory was already queued
    /// during this scan.
    pub fn push(&mut self, task: ScanTask) -> bool {
        if !self.seen.insert(task.directory.clone()) {
            debug!(directory = %task.directory, "Directory already queued");
            return false;
        }
        self.tasks.push_back(task);
        true
    }

    /// Takes the next task.
    pub fn pop(&mut self) -> Option<ScanTask> {
        self.tasks.pop_front()
    }

    /// Returns the number of pending tasks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if no tasks are pending.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drops all pending tasks and forgets which directories were seen.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.seen.clear();
    }

    /// Queues every directory under `roots`.
    ///
    /// For each root, the root itself is queued first, followed by all of
    /// its subdirectories in depth-first pre-order. The whole directory
    /// walk finishes before this returns.
    pub fn seed<'a>(
        &mut self,
        walker: &DirectoryWalker,
        roots: impl IntoIterator<Item = &'a Utf8Path>,
    ) -> SeedReport {
        let mut report = SeedReport::default();

        for root in roots {
            let listing = walker.collect_directories(root);
            report.failed += listing.errors.len();
            for directory in listing.directories {
                if self.push(ScanTask::new(root, directory)) {
                    report.queued += 1;
                }
            }
        }

        info!(
            queued = report.queued,
            failed = report.failed,
            "Seeded scan queue"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_fifo_order() {
        let mut queue = ScanQueue::new();
        queue.push(ScanTask::new("/r", "/r/a"));
        queue.push(ScanTask::new("/r", "/r/b"));
        assert_eq!(queue.pop().unwrap().directory, "/r/a");
        assert_eq!(queue.pop().unwrap().directory, "/r/b");
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_popped_directory_not_requeued_until_clear() {
        let mut queue = ScanQueue::new();
        queue.push(ScanTask::new("/r", "/r"));
        queue.pop();
        assert!(!queue.push(ScanTask::new("/r", "/r")));

        queue.clear();
        assert!(queue.push(ScanTask::new("/r", "/r")));
    }

    #[test]
    fn test_seed_overlapping_roots() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("inner").join("deep")).unwrap();

        let inner = root.join("inner");
        let mut queue = ScanQueue::new();
        let report = queue.seed(
            &DirectoryWalker::default(),
            [root.as_path(), inner.as_path()],
        );

        assert_eq!(report.queued, 3);
        assert_eq!(queue.len(), 3);
        let first = queue.pop().unwrap();
        assert_eq!(first.directory, root);
        assert_eq!(first.scan_root, root);
    }
}
