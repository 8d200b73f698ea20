//! Classification of local files against the size the server advertises.
//!
//! Byte length is the only integrity signal. A file of the right length
//! with the wrong content is reported as complete.

use std::path::Path;

use crate::fs::FileSystem;

/// State of a destination file before a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Nothing exists at the destination.
    Absent,
    /// The destination has exactly the expected number of bytes.
    Complete,
    /// The destination exists with a different size.
    Corrupted {
        /// Size found on disk.
        local_size: u64,
    },
}

impl FileState {
    /// Returns true if the file needs no transfer.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Classifies `path` against a known expected size.
pub async fn classify<F: FileSystem + ?Sized>(fs: &F, expected_size: u64, path: &Path) -> FileState {
    match fs.file_size(path).await {
        None => FileState::Absent,
        Some(size) if size == expected_size => FileState::Complete,
        Some(local_size) => FileState::Corrupted { local_size },
    }
}

/// Classifies `path` when the server may not have sent a length.
///
/// Without an expected size an existing file cannot be verified, so it is
/// treated as corrupted and fetched again.
pub async fn classify_advertised<F: FileSystem + ?Sized>(
    fs: &F,
    expected_size: Option<u64>,
    path: &Path,
) -> FileState {
    match expected_size {
        Some(expected) => classify(fs, expected, path).await,
        None => fs
            .file_size(path)
            .await
            .map_or(FileState::Absent, |local_size| FileState::Corrupted { local_size }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// A mock file system that only knows file sizes.
    struct MockFileSystem {
        files: Mutex<HashMap<PathBuf, u64>>,
    }

    impl MockFileSystem {
        fn new() -> Self {
            Self {
                files: Mutex::new(HashMap::new()),
            }
        }

        fn add_file(&self, path: impl Into<PathBuf>, size: u64) {
            self.files.lock().unwrap().insert(path.into(), size);
        }
    }

    #[async_trait::async_trait]
    impl FileSystem for MockFileSystem {
        async fn file_size(&self, path: &Path) -> Option<u64> {
            self.files.lock().unwrap().get(path).copied()
        }

        async fn create_dir_all(&self, _path: &Path) -> std::io::Result<()> {
            Ok(())
        }

        async fn create_file(&self, _path: &Path) -> std::io::Result<tokio::fs::File> {
            Err(std::io::Error::new(std::io::ErrorKind::Unsupported, "mock"))
        }
    }

    #[tokio::test]
    async fn classify_absent() {
        let fs = MockFileSystem::new();
        assert_eq!(
            classify(&fs, 1_000, Path::new("lecture.mp4")).await,
            FileState::Absent
        );
    }

    #[tokio::test]
    async fn classify_complete() {
        let fs = MockFileSystem::new();
        fs.add_file("lecture.mp4", 1_000_000);
        let state = classify(&fs, 1_000_000, Path::new("lecture.mp4")).await;
        assert_eq!(state, FileState::Complete);
        assert!(state.is_complete());
    }

    #[tokio::test]
    async fn classify_corrupted_when_shorter() {
        let fs = MockFileSystem::new();
        fs.add_file("lecture.mp4", 500);
        assert_eq!(
            classify(&fs, 1_000_000, Path::new("lecture.mp4")).await,
            FileState::Corrupted { local_size: 500 }
        );
    }

    #[tokio::test]
    async fn classify_corrupted_when_longer() {
        let fs = MockFileSystem::new();
        fs.add_file("lecture.mp4", 2_000);
        assert_eq!(
            classify(&fs, 1_000, Path::new("lecture.mp4")).await,
            FileState::Corrupted { local_size: 2_000 }
        );
    }

    #[tokio::test]
    async fn classify_empty_expected_empty_file() {
        let fs = MockFileSystem::new();
        fs.add_file("empty.vtt", 0);
        assert_eq!(
            classify(&fs, 0, Path::new("empty.vtt")).await,
            FileState::Complete
        );
    }

    #[tokio::test]
    async fn unknown_length_forces_refetch_of_existing_file() {
        let fs = MockFileSystem::new();
        fs.add_file("lecture.mp4", 1_000);
        assert_eq!(
            classify_advertised(&fs, None, Path::new("lecture.mp4")).await,
            FileState::Corrupted { local_size: 1_000 }
        );
        assert_eq!(
            classify_advertised(&fs, None, Path::new("other.mp4")).await,
            FileState::Absent
        );
        assert_eq!(
            classify_advertised(&fs, Some(1_000), Path::new("lecture.mp4")).await,
            FileState::Complete
        );
    }
}
