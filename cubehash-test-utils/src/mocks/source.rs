//! Scripted byte sources

use async_trait::async_trait;
use bytes::Bytes;
use cubehash_core::error::IoError;
use cubehash_core::{ByteSource, Result, SourceInfo, SourceOpener};
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Shared count of `release` calls across clones of a source
#[derive(Debug, Clone, Default)]
pub struct ReleaseCounter(Arc<AtomicUsize>);

impl ReleaseCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// A byte source that yields scripted chunks
///
/// Can fail after a given number of chunks, pause before each chunk and
/// report a declared size that differs from the real content.
#[derive(Debug, Clone)]
pub struct MockByteSource {
    chunks: VecDeque<Bytes>,
    declared_size: u64,
    fail_after: Option<usize>,
    chunk_delay: Duration,
    reads: usize,
    released: bool,
    releases: ReleaseCounter,
}

impl MockByteSource {
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        let chunks: VecDeque<Bytes> = chunks.into_iter().map(Into::into).collect();
        let declared_size = chunks.iter().map(|c| c.len() as u64).sum();
        Self {
            chunks,
            declared_size,
            fail_after: None,
            chunk_delay: Duration::ZERO,
            reads: 0,
            released: false,
            releases: ReleaseCounter::default(),
        }
    }

    /// Fail the read following the first `chunks` successful ones
    pub fn failing_after(mut self, chunks: usize) -> Self {
        self.fail_after = Some(chunks);
        self
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.declared_size = size;
        self
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn release_counter(&self) -> ReleaseCounter {
        self.releases.clone()
    }
}

#[async_trait]
impl ByteSource for MockByteSource {
    fn total_size(&self) -> u64 {
        self.declared_size
    }

    async fn read_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.released {
            return Ok(None);
        }
        if !self.chunk_delay.is_zero() {
            tokio::time::sleep(self.chunk_delay).await;
        }
        if self.fail_after == Some(self.reads) {
            return Err(IoError::source_read(io::Error::other("simulated read failure")).into());
        }
        self.reads += 1;
        Ok(self.chunks.pop_front())
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.releases.bump();
        }
    }
}

/// Opener that hands out fresh copies of a template source
#[derive(Debug, Clone)]
pub struct MockSelection {
    name: String,
    template: MockByteSource,
    fail_open: bool,
    opens: Arc<AtomicUsize>,
}

impl MockSelection {
    pub fn new(name: impl Into<String>, template: MockByteSource) -> Self {
        Self {
            name: name.into(),
            template,
            fail_open: false,
            opens: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every `open` fail as if the file had vanished
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Release count shared by every source this opener produced
    pub fn release_counter(&self) -> ReleaseCounter {
        self.template.release_counter()
    }
}

#[async_trait]
impl SourceOpener for MockSelection {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: self.name.clone(),
            size: self.template.total_size(),
        }
    }

    async fn open(&self) -> Result<Box<dyn ByteSource>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(IoError::file_not_found(std::path::Path::new(&self.name)).into());
        }
        Ok(Box::new(self.template.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_yields_chunks_then_none() {
        let mut source = MockByteSource::new([&b"ab"[..], &b"c"[..]]);
        assert_eq!(source.total_size(), 3);
        assert_eq!(source.read_chunk().await.unwrap().unwrap(), "ab");
        assert_eq!(source.read_chunk().await.unwrap().unwrap(), "c");
        assert!(source.read_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fails_after_chunks() {
        let mut source = MockByteSource::new([&b"ab"[..], &b"c"[..]]).failing_after(1);
        assert!(source.read_chunk().await.is_ok());
        let err = source.read_chunk().await.unwrap_err();
        assert!(err.is_source_read());
    }

    #[tokio::test]
    async fn test_release_is_counted_once() {
        let mut source = MockByteSource::new([&b"x"[..]]);
        let counter = source.release_counter();
        source.release();
        source.release();
        assert_eq!(counter.count(), 1);
    }
}
