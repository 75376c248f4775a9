//! File-backed byte sources

use super::{ByteSource, SourceInfo, SourceOpener};
use crate::Result;
use crate::error::IoError;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Streams a file from disk in fixed-size chunks
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: Option<File>,
    total_size: u64,
    chunk_size: usize,
}

impl FileSource {
    /// Open a file for streaming
    pub async fn open(path: &Path, chunk_size: usize) -> Result<Self> {
        let file = File::open(path)
            .await
            .map_err(|e| IoError::from_std(e).with_path(path))?;
        let total_size = file
            .metadata()
            .await
            .map_err(|e| IoError::from_std(e).with_path(path))?
            .len();

        log::debug!(
            "Opened {} ({} bytes, {} byte chunks)",
            path.display(),
            total_size,
            chunk_size
        );

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
            total_size,
            chunk_size: chunk_size.max(1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file handle has been given up
    pub fn is_released(&self) -> bool {
        self.file.is_none()
    }
}

#[async_trait]
impl ByteSource for FileSource {
    fn total_size(&self) -> u64 {
        self.total_size
    }

    async fn read_chunk(&mut self) -> Result<Option<Bytes>> {
        let Some(file) = self.file.as_mut() else {
            return Ok(None);
        };

        let mut buffer = BytesMut::zeroed(self.chunk_size);
        let bytes_read = file
            .read(&mut buffer)
            .await
            .map_err(|e| IoError::source_read(e).with_path(&self.path))?;

        if bytes_read == 0 {
            return Ok(None);
        }

        buffer.truncate(bytes_read);
        Ok(Some(buffer.freeze()))
    }

    fn release(&mut self) {
        if self.file.take().is_some() {
            log::debug!("Released {}", self.path.display());
        }
    }
}

/// A file picked for hashing
#[derive(Debug, Clone)]
pub struct FileSelection {
    path: PathBuf,
    size: u64,
    chunk_size: usize,
}

impl FileSelection {
    /// Select a file, reading its size
    pub async fn new(path: impl Into<PathBuf>, chunk_size: usize) -> Result<Self> {
        let path = path.into();
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| IoError::from_std(e).with_path(&path))?;

        if !metadata.is_file() {
            return Err(IoError::file_not_found(&path).into());
        }

        Ok(Self {
            path,
            size: metadata.len(),
            chunk_size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SourceOpener for FileSelection {
    fn info(&self) -> SourceInfo {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        SourceInfo {
            name,
            size: self.size,
        }
    }

    async fn open(&self) -> Result<Box<dyn ByteSource>> {
        Ok(Box::new(FileSource::open(&self.path, self.chunk_size).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, IoErrorKind};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_in_chunks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, vec![7u8; 10_000]).unwrap();

        let mut source = FileSource::open(&path, 4096).await.unwrap();
        assert_eq!(source.total_size(), 10_000);

        let mut sizes = Vec::new();
        while let Some(chunk) = source.read_chunk().await.unwrap() {
            sizes.push(chunk.len());
        }
        assert_eq!(sizes.iter().sum::<usize>(), 10_000);
        assert!(sizes.iter().all(|s| *s <= 4096));
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"abc").unwrap();

        let mut source = FileSource::open(&path, 16).await.unwrap();
        source.release();
        source.release();
        assert!(source.is_released());
        assert!(source.read_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = FileSource::open(&dir.path().join("nope.bin"), 16)
            .await
            .unwrap_err();
        match err {
            Error::Io(io) => assert_eq!(io.kind, IoErrorKind::FileNotFound),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_selection_info_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movie.mkv");
        std::fs::write(&path, vec![1u8; 2048]).unwrap();

        let selection = FileSelection::new(&path, 512).await.unwrap();
        assert_eq!(
            selection.info(),
            SourceInfo {
                name: "movie.mkv".to_string(),
                size: 2048
            }
        );

        for _ in 0..2 {
            let mut source = selection.open().await.unwrap();
            assert_eq!(source.total_size(), 2048);
            assert!(source.read_chunk().await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_selection_rejects_directory() {
        let dir = TempDir::new().unwrap();
        assert!(FileSelection::new(dir.path(), 512).await.is_err());
    }
}
