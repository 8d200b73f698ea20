//! Error types for the cloud-academy-dl library.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid operator input, detected before any network activity.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Requested resolution is not one of the supported renditions.
    #[error("Invalid value for --res: {0}. Supported values are 360, 720 or 1080")]
    InvalidResolution(String),

    /// No cookie file was given on the command line or in the config file.
    #[error("No cookie file given. Pass --cookie=<txt_file>")]
    MissingCookieFile,

    /// The cookie file could not be opened.
    #[error("File {} doesn't exist. Check the --cookie parameter", .0.display())]
    CookieFileNotFound(PathBuf),

    /// The cookie file does not hold exactly one of each required header.
    #[error(
        "Wrong cookie file format, check the 'authorization:' and 'cookie:' fields in your text file \
         (found {authorization} authorization and {cookie} cookie line(s))"
    )]
    CookieFormat {
        /// Number of `authorization: Bearer` lines found.
        authorization: usize,
        /// Number of `cookie:` lines found.
        cookie: usize,
    },

    /// A header value from the cookie file contains bytes HTTP does not allow.
    #[error("The {0} value in the cookie file contains characters not allowed in an HTTP header")]
    InvalidHeaderValue(&'static str),

    /// The course URL cannot be split into a step URL template.
    #[error("Invalid course URL: {0}")]
    CourseUrl(String),

    /// The optional configuration file exists but cannot be used.
    #[error("Invalid config file {}: {reason}", path.display())]
    ConfigFile {
        /// Path of the offending file.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors that can occur while resolving metadata or downloading assets.
#[derive(Error, Debug)]
pub enum Error {
    /// Operator input was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A metadata page answered with a non-success status.
    #[error("Request to {url} failed with status {status}")]
    Fetch {
        /// Requested page.
        url: String,
        /// HTTP status received.
        status: reqwest::StatusCode,
    },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The page-state blob is missing or is not valid JSON.
    #[error("Could not read page state: {0}")]
    Parse(String),

    /// The page-state blob does not have the expected shape.
    #[error("Unexpected course metadata: {0}")]
    Schema(String),

    /// A transfer was interrupted or could not be written.
    #[error("Download failed: {0}")]
    Transfer(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for errors raised while validating operator input.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// A specialized `Result` type for cloud-academy-dl operations.
pub type Result<T> = std::result::Result<T, Error>;
