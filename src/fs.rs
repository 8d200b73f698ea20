//! File system abstraction for testability.

use async_trait::async_trait;
use std::path::Path;

/// Abstraction over file system operations for testability.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Returns the size of a regular file if it exists.
    async fn file_size(&self, path: &Path) -> Option<u64>;

    /// Creates all directories in the given path.
    async fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;

    /// Creates a file at the given path, truncating any existing content.
    async fn create_file(&self, path: &Path) -> std::io::Result<tokio::fs::File>;
}

/// Default file system implementation using `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem` instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for TokioFileSystem {
    async fn file_size(&self, path: &Path) -> Option<u64> {
        tokio::fs::metadata(path)
            .await
            .ok()
            .filter(std::fs::Metadata::is_file)
            .map(|m| m.len())
    }

    async fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn create_file(&self, path: &Path) -> std::io::Result<tokio::fs::File> {
        tokio::fs::File::create(path).await
    }
}
