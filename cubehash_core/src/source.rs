//! Byte sources consumed by the streaming engine
//!
//! A source knows its total size up front, yields chunks in order until it
//! is exhausted, and must be released when the consumer is done with it.

use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::ops::{Deref, DerefMut};

mod file;
mod memory;

pub use file::{FileSelection, FileSource};
pub use memory::{MemorySelection, MemorySource};

/// Default chunk size for file reads
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Finite, single-pass, pull-based byte stream
#[async_trait]
pub trait ByteSource: Send {
    /// Total number of bytes this source will produce
    fn total_size(&self) -> u64;

    /// Pull the next chunk, `None` once the source is exhausted
    async fn read_chunk(&mut self) -> Result<Option<Bytes>>;

    /// Give up the underlying handle. Must be idempotent.
    fn release(&mut self);
}

#[async_trait]
impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn total_size(&self) -> u64 {
        (**self).total_size()
    }

    async fn read_chunk(&mut self) -> Result<Option<Bytes>> {
        (**self).read_chunk().await
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Name and size of a selected input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub name: String,
    pub size: u64,
}

/// A re-openable input, e.g. the file the user picked
///
/// Each `open` produces a fresh single-pass source, which lets the same
/// selection be hashed again after a parameter change.
#[async_trait]
pub trait SourceOpener: Send + Sync {
    fn info(&self) -> SourceInfo;

    async fn open(&self) -> Result<Box<dyn ByteSource>>;
}

/// Releases the wrapped source when dropped
///
/// Covers every way out of a computation: completion, errors, and the
/// future being dropped part way through.
pub struct ReleaseOnDrop<'a, S: ByteSource + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: ByteSource + ?Sized> ReleaseOnDrop<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        Self { source }
    }
}

impl<S: ByteSource + ?Sized> Deref for ReleaseOnDrop<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.source
    }
}

impl<S: ByteSource + ?Sized> DerefMut for ReleaseOnDrop<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.source
    }
}

impl<S: ByteSource + ?Sized> Drop for ReleaseOnDrop<'_, S> {
    fn drop(&mut self) {
        self.source.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guard_releases_on_drop() {
        let mut source = MemorySource::new(Bytes::from_static(b"abcdef"), 4);
        {
            let mut guard = ReleaseOnDrop::new(&mut source);
            let first = guard.read_chunk().await.unwrap().unwrap();
            assert_eq!(&first[..], b"abcd");
        }
        assert!(source.is_released());
    }

    #[tokio::test]
    async fn test_boxed_source_forwards() {
        let mut boxed: Box<dyn ByteSource> =
            Box::new(MemorySource::new(Bytes::from_static(b"xyz"), 8));
        assert_eq!(boxed.total_size(), 3);
        assert_eq!(&boxed.read_chunk().await.unwrap().unwrap()[..], b"xyz");
        assert!(boxed.read_chunk().await.unwrap().is_none());
    }
}
