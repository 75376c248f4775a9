//! In-memory byte sources

use super::{ByteSource, SourceInfo, SourceOpener};
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Serves a buffer as a sequence of chunks
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Bytes,
    chunk_lengths: Vec<usize>,
    next_chunk: usize,
    offset: usize,
    released: bool,
}

impl MemorySource {
    /// Split `data` into chunks of `chunk_size` bytes (the last may be shorter)
    pub fn new(data: Bytes, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let mut chunk_lengths = vec![chunk_size; data.len() / chunk_size];
        if data.len() % chunk_size != 0 {
            chunk_lengths.push(data.len() % chunk_size);
        }
        Self::from_parts(data, chunk_lengths)
    }

    /// Serve exactly the given chunks, in order
    pub fn from_chunks<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        let mut data = Vec::new();
        let mut chunk_lengths = Vec::new();
        for chunk in chunks {
            data.extend_from_slice(chunk.as_ref());
            chunk_lengths.push(chunk.as_ref().len());
        }
        Self::from_parts(Bytes::from(data), chunk_lengths)
    }

    fn from_parts(data: Bytes, chunk_lengths: Vec<usize>) -> Self {
        Self {
            data,
            chunk_lengths,
            next_chunk: 0,
            offset: 0,
            released: false,
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    fn total_size(&self) -> u64 {
        self.data.len() as u64
    }

    async fn read_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.released {
            return Ok(None);
        }
        let Some(&length) = self.chunk_lengths.get(self.next_chunk) else {
            return Ok(None);
        };

        let chunk = self.data.slice(self.offset..self.offset + length);
        self.offset += length;
        self.next_chunk += 1;
        Ok(Some(chunk))
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Named in-memory input that can be opened repeatedly
#[derive(Debug, Clone)]
pub struct MemorySelection {
    name: String,
    data: Bytes,
    chunk_size: usize,
}

impl MemorySelection {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>, chunk_size: usize) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            chunk_size,
        }
    }
}

#[async_trait]
impl SourceOpener for MemorySelection {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: self.name.clone(),
            size: self.data.len() as u64,
        }
    }

    async fn open(&self) -> Result<Box<dyn ByteSource>> {
        Ok(Box::new(MemorySource::new(self.data.clone(), self.chunk_size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn drain(source: &mut MemorySource) -> Vec<Vec<u8>> {
        let mut chunks = Vec::new();
        while let Some(chunk) = source.read_chunk().await.unwrap() {
            chunks.push(chunk.to_vec());
        }
        chunks
    }

    #[tokio::test]
    async fn test_fixed_chunking() {
        let mut source = MemorySource::new(Bytes::from_static(b"abcdefg"), 3);
        assert_eq!(source.total_size(), 7);
        assert_eq!(
            drain(&mut source).await,
            vec![b"abc".to_vec(), b"def".to_vec(), b"g".to_vec()]
        );
    }

    #[tokio::test]
    async fn test_explicit_chunks_keep_boundaries() {
        let mut source = MemorySource::from_chunks([&b"a"[..], b"", b"bc"]);
        assert_eq!(
            drain(&mut source).await,
            vec![b"a".to_vec(), Vec::new(), b"bc".to_vec()]
        );
    }

    #[tokio::test]
    async fn test_empty_source() {
        let mut source = MemorySource::new(Bytes::new(), 16);
        assert_eq!(source.total_size(), 0);
        assert!(source.read_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_released_source_yields_nothing() {
        let mut source = MemorySource::new(Bytes::from_static(b"abc"), 1);
        source.release();
        assert!(source.read_chunk().await.unwrap().is_none());
    }
}
