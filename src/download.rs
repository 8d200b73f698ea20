//! Core download logic: skip, resume-by-refetch, and stream to disk.

use std::fmt;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{Error, Result};
use crate::fs::{FileSystem, TokioFileSystem};
use crate::integrity::{FileState, classify_advertised};
use crate::progress::ProgressReporter;
use crate::retry::{RetryForever, RetryPolicy};
use crate::transport::{ByteStream, HttpTransport, RemoteBody, Transport};

/// What a job downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Lecture video.
    Video,
    /// WebVTT subtitle track.
    Subtitle,
}

impl AssetKind {
    /// File extension used on disk.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Subtitle => "vtt",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => f.write_str("video"),
            Self::Subtitle => f.write_str("subtitle"),
        }
    }
}

/// A remote asset and where it goes on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    /// Remote URL.
    pub url: String,
    /// Destination directory, created before anything is written.
    pub dir: PathBuf,
    /// File name inside `dir`.
    pub file_name: String,
    /// Kind of asset.
    pub kind: AssetKind,
}

impl DownloadJob {
    /// Creates a job for `url` saved as `<dir>/<stem>.<ext>`.
    #[must_use]
    pub fn new(url: impl Into<String>, dir: impl Into<PathBuf>, stem: &str, kind: AssetKind) -> Self {
        Self {
            url: url.into(),
            dir: dir.into(),
            file_name: format!("{stem}.{}", kind.extension()),
            kind,
        }
    }

    /// Full destination path.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file on disk already had the advertised size; nothing was written.
    SkippedComplete,
    /// A file of the wrong size was replaced with a full copy.
    Redownloaded {
        /// Bytes written.
        bytes: u64,
    },
    /// The file was absent and is now complete.
    Downloaded {
        /// Bytes written.
        bytes: u64,
    },
    /// The job did not produce a complete file. Bytes already written stay
    /// on disk and are picked up as corrupted on the next run.
    Failed {
        /// Human-readable cause.
        reason: String,
    },
}

impl DownloadOutcome {
    /// Returns true unless the job failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Bytes written by this job.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        match self {
            Self::Redownloaded { bytes } | Self::Downloaded { bytes } => *bytes,
            Self::SkippedComplete | Self::Failed { .. } => 0,
        }
    }
}

/// Downloads jobs one at a time, skipping files that are already complete.
pub struct Materializer<T: Transport = HttpTransport, F: FileSystem = TokioFileSystem> {
    transport: T,
    fs: F,
    retry: Box<dyn RetryPolicy>,
}

impl<T: Transport> Materializer<T, TokioFileSystem> {
    /// Creates a materializer that writes to the real file system and retries
    /// error statuses forever.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_fs(transport, TokioFileSystem)
    }
}

impl<T: Transport, F: FileSystem> Materializer<T, F> {
    /// Creates a materializer with a custom file system implementation.
    #[must_use]
    pub fn with_fs(transport: T, fs: F) -> Self {
        Self {
            transport,
            fs,
            retry: Box::new(RetryForever),
        }
    }

    /// Replaces the retry policy for error statuses.
    #[must_use]
    pub fn with_retry(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.retry = Box::new(policy);
        self
    }

    /// Brings one job's destination file to the advertised size.
    ///
    /// Never returns an error: every failure is folded into
    /// [`DownloadOutcome::Failed`] so the caller can move on to the next job.
    pub async fn materialize(
        &self,
        job: &DownloadJob,
        progress: &dyn ProgressReporter,
    ) -> DownloadOutcome {
        let outcome = match self.try_materialize(job, progress).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("{} ({}): {e}", job.path().display(), job.kind);
                DownloadOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        progress.on_done(job, &outcome);
        outcome
    }

    async fn try_materialize(
        &self,
        job: &DownloadJob,
        progress: &dyn ProgressReporter,
    ) -> Result<DownloadOutcome> {
        self.fs.create_dir_all(&job.dir).await.map_err(|e| {
            Error::Transfer(format!("could not create {}: {e}", job.dir.display()))
        })?;

        let remote = self.open(job, progress).await?;
        let path = job.path();
        let state = classify_advertised(&self.fs, remote.content_length, &path).await;
        log::debug!("{}: {state:?}", path.display());

        if state.is_complete() {
            return Ok(DownloadOutcome::SkippedComplete);
        }

        progress.on_start(job, remote.content_length, state);
        let written = self.write_body(&path, remote.body, job, progress).await?;

        if let Some(expected) = remote.content_length
            && written != expected
        {
            return Err(Error::Transfer(format!(
                "received {written} of {expected} bytes"
            )));
        }

        Ok(match state {
            FileState::Corrupted { .. } => DownloadOutcome::Redownloaded { bytes: written },
            FileState::Absent | FileState::Complete => DownloadOutcome::Downloaded { bytes: written },
        })
    }

    /// Sends the GET, repeating it while the server answers with an error
    /// status and the retry policy allows it.
    async fn open(&self, job: &DownloadJob, progress: &dyn ProgressReporter) -> Result<RemoteBody> {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let remote = self.transport.get(&job.url).await?;
            let status = remote.status;
            if status.is_success() {
                return Ok(remote);
            }
            if !self.retry.should_retry(attempt, status) {
                return Err(Error::Fetch {
                    url: job.url.clone(),
                    status,
                });
            }
            log::warn!(
                "Error response from server ({status}) for {}, trying again",
                job.file_name
            );
            progress.on_retry(job, attempt, status);
        }
    }

    /// Streams `body` into a truncated file at `path`, returning the number
    /// of bytes written. Bytes received before an interruption are flushed
    /// and left in place.
    async fn write_body(
        &self,
        path: &Path,
        mut body: ByteStream,
        job: &DownloadJob,
        progress: &dyn ProgressReporter,
    ) -> Result<u64> {
        let file = self.fs.create_file(path).await.map_err(|e| {
            Error::Transfer(format!("could not create file {}: {e}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);
        let mut total: u64 = 0;
        let mut interrupted = None;

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    interrupted = Some(e);
                    break;
                }
            };
            if let Err(e) = writer.write_all(&chunk).await {
                interrupted = Some(Error::Io(e));
                break;
            }
            total += chunk.len() as u64;
            progress.on_chunk(job, total);
        }

        writer.flush().await?;

        match interrupted {
            Some(e) => Err(Error::Transfer(format!(
                "interrupted after {total} bytes: {e}"
            ))),
            None => Ok(total),
        }
    }
}
