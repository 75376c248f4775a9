//! Object storage backends

use crate::Result;
use crate::error::IoError;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// A stored object's contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
}

/// Key-addressed object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object, `None` if the key is absent
    async fn get(&self, key: &str) -> Result<Option<StoredObject>>;
}

/// Objects stored as files below a root directory
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return None;
            }
            path.push(segment);
        }
        Some(path)
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };

        match tokio::fs::read(&path).await {
            Ok(body) => Ok(Some(StoredObject {
                body: Bytes::from(body),
            })),
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::IsADirectory
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(IoError::from_std(e).with_path(&path).into()),
        }
    }
}
