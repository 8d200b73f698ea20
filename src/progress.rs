//! Progress reporting hooks for the file materializer.

use reqwest::StatusCode;

use crate::download::{DownloadJob, DownloadOutcome};
use crate::integrity::FileState;

/// Trait for receiving download progress updates.
///
/// Implementations only observe; nothing they do changes how a transfer
/// proceeds. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// Called when a transfer starts writing. `state` is what was on disk
    /// before.
    fn on_start(&self, _job: &DownloadJob, _expected_size: Option<u64>, _state: FileState) {}

    /// Called after every chunk with the running byte total.
    fn on_chunk(&self, _job: &DownloadJob, _bytes_so_far: u64) {}

    /// Called when the server answered with an error status and the request
    /// is about to be retried.
    fn on_retry(&self, _job: &DownloadJob, _attempt: u32, _status: StatusCode) {}

    /// Called exactly once per job with its final outcome.
    fn on_done(&self, _job: &DownloadJob, _outcome: &DownloadOutcome) {}
}

/// A null progress implementation that ignores all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}
