//! Import progress reporting.

use std::time::{Duration, Instant};

use compact_str::CompactString;

/// Progress information while a batch is decoded.
#[derive(Debug, Clone)]
pub struct ImportProgress {
    /// Files in the selection.
    pub selected: usize,
    /// Files that passed the type filter.
    pub accepted: usize,
    /// Files rejected by type.
    pub rejected: usize,
    /// Accepted files decoded so far.
    pub decoded: usize,
    /// Accepted files whose decode failed so far.
    pub failed: usize,
    /// Bytes decoded so far.
    pub bytes_decoded: u64,
    /// Most recently finished file.
    pub last_file: Option<CompactString>,
    /// Time elapsed since the batch started.
    pub elapsed: Duration,
}

impl ImportProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            selected: 0,
            accepted: 0,
            rejected: 0,
            decoded: 0,
            failed: 0,
            bytes_decoded: 0,
            last_file: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Accepted files still waiting on their decode.
    pub fn pending(&self) -> usize {
        self.accepted.saturating_sub(self.decoded + self.failed)
    }

    /// Whether every accepted file has an outcome.
    pub fn is_finished(&self) -> bool {
        self.pending() == 0
    }

    /// Fraction of accepted files with an outcome (1.0 when none were accepted).
    pub fn ratio(&self) -> f64 {
        if self.accepted == 0 {
            1.0
        } else {
            (self.decoded + self.failed) as f64 / self.accepted as f64
        }
    }
}

impl Default for ImportProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal progress tracker with timing.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    progress: ImportProgress,
}

impl ProgressTracker {
    pub fn new(selected: usize, accepted: usize, rejected: usize) -> Self {
        Self {
            start_time: Instant::now(),
            progress: ImportProgress {
                selected,
                accepted,
                rejected,
                ..ImportProgress::new()
            },
        }
    }

    pub fn record_decoded(&mut self, name: &str, size: u64) {
        self.progress.decoded += 1;
        self.progress.bytes_decoded += size;
        self.progress.last_file = Some(name.into());
    }

    pub fn record_failed(&mut self, name: &str) {
        self.progress.failed += 1;
        self.progress.last_file = Some(name.into());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> ImportProgress {
        ImportProgress {
            elapsed: self.start_time.elapsed(),
            ..self.progress.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_counts() {
        let mut tracker = ProgressTracker::new(4, 3, 1);
        assert_eq!(tracker.snapshot().pending(), 3);

        tracker.record_decoded("a.txt", 10);
        tracker.record_failed("b.txt");
        let snapshot = tracker.snapshot();

        assert_eq!(snapshot.decoded, 1);
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.bytes_decoded, 10);
        assert_eq!(snapshot.pending(), 1);
        assert_eq!(snapshot.last_file.as_deref(), Some("b.txt"));
        assert!(!snapshot.is_finished());
    }

    #[test]
    fn test_ratio_without_accepted_files() {
        let progress = ImportProgress::new();
        assert!(progress.is_finished());
        assert_eq!(progress.ratio(), 1.0);
    }
}
