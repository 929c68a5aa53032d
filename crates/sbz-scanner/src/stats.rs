//! Scan statistics.
//!
//! [`ScanStats`] is owned by the processor and updated in place; callers
//! read a copy through [`StatsSnapshot`].
//!
//! # Examples
//!
//! ```
//! use sbz_scanner::ScanStats;
//!
//! let mut stats = ScanStats::new();
//! stats.add_queued(4);
//! stats.increment_scanned();
//!
//! let snapshot = stats.snapshot();
//! assert_eq!(snapshot.directories_scanned, 1);
//! assert!((snapshot.progress_percent() - 25.0).abs() < f64::EPSILON);
//! ```

use serde::{Deserialize, Serialize};

/// Counters for one scan.
#[derive(Debug, Default)]
pub struct ScanStats {
    directories_queued: u64,
    directories_scanned: u64,
    directories_failed: u64,
    files_found: u64,
    sidecars_loaded: u64,
    sidecars_failed: u64,
    steps: u64,
}

impl ScanStats {
    /// Creates a new [`ScanStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds directories that were queued while seeding.
    #[inline]
    pub fn add_queued(&mut self, count: usize) {
        self.directories_queued += count as u64;
    }

    /// Counts a directory that was listed.
    #[inline]
    pub fn increment_scanned(&mut self) {
        self.directories_scanned += 1;
    }

    /// Adds directories that could not be walked or listed.
    #[inline]
    pub fn add_failed(&mut self, count: usize) {
        self.directories_failed += count as u64;
    }

    /// Counts an audio file that was found.
    #[inline]
    pub fn increment_files(&mut self) {
        self.files_found += 1;
    }

    /// Counts a sidecar that was read.
    #[inline]
    pub fn increment_sidecars(&mut self) {
        self.sidecars_loaded += 1;
    }

    /// Counts a sidecar that existed but could not be read.
    #[inline]
    pub fn increment_sidecar_errors(&mut self) {
        self.sidecars_failed += 1;
    }

    /// Counts one call to the step function.
    #[inline]
    pub fn increment_steps(&mut self) {
        self.steps += 1;
    }

    /// Resets every counter to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns a copy of the counters.
    #[must_use]
    pub const fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            directories_queued: self.directories_queued,
            directories_scanned: self.directories_scanned,
            directories_failed: self.directories_failed,
            files_found: self.files_found,
            sidecars_loaded: self.sidecars_loaded,
            sidecars_failed: self.sidecars_failed,
            steps: self.steps,
        }
    }
}

/// A point-in-time copy of [`ScanStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Directories queued while seeding.
    pub directories_queued: u64,
    /// Directories listed so far.
    pub directories_scanned: u64,
    /// Directories that could not be walked or listed.
    pub directories_failed: u64,
    /// Audio files found so far.
    pub files_found: u64,
    /// Sidecars read so far.
    pub sidecars_loaded: u64,
    /// Sidecars that existed but could not be read.
    pub sidecars_failed: u64,
    /// Step calls made.
    pub steps: u64,
}

impl StatsSnapshot {
    /// Percentage of queued directories that have been handled.
    ///
    /// A scan with nothing queued reports 100%.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Directory counts stay far below 2^52
    pub fn progress_percent(&self) -> f64 {
        if self.directories_queued == 0 {
            return 100.0;
        }
        let done = self.directories_scanned.min(self.directories_queued);
        (done as f64 / self.directories_queued as f64) * 100.0
    }

    /// Directories still waiting to be listed.
    #[must_use]
    pub const fn directories_remaining(&self) -> u64 {
        self.directories_queued
            .saturating_sub(self.directories_scanned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_reset() {
        let mut stats = ScanStats::new();
        stats.add_queued(3);
        stats.increment_scanned();
        stats.add_failed(1);
        stats.increment_files();
        stats.increment_files();
        stats.increment_sidecars();
        stats.increment_steps();

        let snap = stats.snapshot();
        assert_eq!(snap.directories_remaining(), 2);
        assert_eq!(snap.files_found, 2);
        assert_eq!(snap.steps, 1);

        stats.reset();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_progress_with_nothing_queued() {
        let snap = StatsSnapshot::default();
        assert!((snap.progress_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_value(StatsSnapshot::default()).unwrap();
        assert_eq!(json["files_found"], 0);
    }
}
