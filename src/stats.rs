//! Per-run download statistics.

use std::time::{Duration, Instant};

use crate::download::DownloadOutcome;

/// Statistics for an entire run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Files that were absent and are now complete.
    pub files_downloaded: usize,
    /// Files that had the wrong size and were replaced.
    pub files_redownloaded: usize,
    /// Files already complete on disk.
    pub files_skipped: usize,
    /// Jobs that did not produce a complete file.
    pub files_failed: usize,
    /// Total bytes written.
    pub total_bytes: u64,
    /// Total elapsed time for the run.
    pub elapsed: Duration,
}

impl SessionStats {
    /// Number of jobs seen.
    #[must_use]
    pub const fn total_jobs(&self) -> usize {
        self.files_downloaded + self.files_redownloaded + self.files_skipped + self.files_failed
    }

    /// Returns the average download speed in bytes per second.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn average_speed(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.total_bytes as f64 / secs) as u64
        } else {
            0
        }
    }
}

/// Builder for accumulating session statistics during downloads.
#[derive(Debug)]
pub struct SessionStatsBuilder {
    stats: SessionStats,
    start_time: Instant,
}

impl Default for SessionStatsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStatsBuilder {
    /// Creates a new session stats builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stats: SessionStats::default(),
            start_time: Instant::now(),
        }
    }

    /// Records the outcome of one job.
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::SkippedComplete => self.stats.files_skipped += 1,
            DownloadOutcome::Downloaded { .. } => self.stats.files_downloaded += 1,
            DownloadOutcome::Redownloaded { .. } => self.stats.files_redownloaded += 1,
            DownloadOutcome::Failed { .. } => self.stats.files_failed += 1,
        }
        self.stats.total_bytes += outcome.bytes_written();
    }

    /// Builds the final session statistics.
    #[must_use]
    pub fn build(self) -> SessionStats {
        SessionStats {
            elapsed: self.start_time.elapsed(),
            ..self.stats
        }
    }
}
