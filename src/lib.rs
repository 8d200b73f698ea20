//! cloud-academy-dl - A library for downloading Cloud Academy course modules.
//!
//! This library resolves course metadata from the page state embedded in course
//! pages, walks the course into an ordered list of download jobs, and writes each
//! asset to disk, skipping files that are already complete and replacing files
//! whose size does not match the server's.
//!
//! # Example
//!
//! ```no_run
//! use cloud_academy_dl::{
//!     ContentResolver, CourseUrl, CourseWalker, Credentials, DownloadConfig, HttpTransport,
//!     Materializer, NoProgress,
//! };
//! use futures::TryStreamExt;
//!
//! # async fn example() -> cloud_academy_dl::Result<()> {
//! let credentials = Credentials::from_file("headers.txt".as_ref())?;
//! let url = CourseUrl::parse("https://cloudacademy.com/course/aws-compute/introduction/")?;
//!
//! let resolver = ContentResolver::new(&credentials)?;
//! let walker = CourseWalker::open(resolver, url, DownloadConfig::new()).await?;
//! let materializer = Materializer::new(HttpTransport::new()?);
//!
//! let jobs = walker.jobs();
//! futures::pin_mut!(jobs);
//! while let Some(job) = jobs.try_next().await? {
//!     let outcome = materializer.materialize(&job, &NoProgress).await;
//!     println!("{}: {outcome:?}", job.file_name);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod course_url;
pub mod credentials;
pub mod download;
pub mod error;
pub mod format;
pub mod fs;
pub mod integrity;
pub mod metadata;
pub mod progress;
pub mod resolver;
pub mod retry;
pub mod stats;
pub mod transport;
pub mod walker;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export main types for convenience
pub use config::{DownloadConfig, NamingStyle, Resolution};
pub use course_url::CourseUrl;
pub use credentials::Credentials;
pub use download::{AssetKind, DownloadJob, DownloadOutcome, Materializer};
pub use error::{ConfigError, Error, Result};
pub use format::{display_name, format_bytes, format_duration};
pub use fs::{FileSystem, TokioFileSystem};
pub use integrity::FileState;
pub use metadata::{ContentItem, CourseMetadata, Step};
pub use progress::{NoProgress, ProgressReporter};
pub use resolver::{ContentResolver, PageSource};
pub use retry::{MaxAttempts, RetryForever, RetryPolicy};
pub use stats::{SessionStats, SessionStatsBuilder};
pub use transport::{HttpTransport, RemoteBody, Transport};
pub use walker::CourseWalker;
