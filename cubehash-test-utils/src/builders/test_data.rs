//! Deterministic test content

use bytes::Bytes;
use cubehash_core::MemorySource;
use std::io;
use std::path::{Path, PathBuf};

/// Content patterns for deterministic test file generation
#[derive(Clone, Copy, Debug)]
pub enum ContentPattern {
    Zeros,
    /// Xorshift stream from the given seed
    Random(u64),
    Repeating(u8),
    Gradient,
}

/// Builder for test inputs with a fluent API
#[derive(Debug, Clone)]
pub struct TestDataBuilder {
    size: usize,
    pattern: ContentPattern,
}

impl Default for TestDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDataBuilder {
    /// 1KB of zeros
    pub fn new() -> Self {
        Self {
            size: 1024,
            pattern: ContentPattern::Zeros,
        }
    }

    /// Small file preset, a few chunks at test chunk sizes
    pub fn small_file() -> Self {
        Self::new()
            .with_size(10 * 1024)
            .with_pattern(ContentPattern::Gradient)
    }

    /// Large file preset, many default-sized chunks
    pub fn large_file() -> Self {
        Self::new()
            .with_size(8 * 1024 * 1024)
            .with_pattern(ContentPattern::Random(0x5eed))
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_pattern(mut self, pattern: ContentPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let size = self.size;
        match self.pattern {
            ContentPattern::Zeros => vec![0u8; size],
            ContentPattern::Repeating(byte) => vec![byte; size],
            ContentPattern::Gradient => (0..size).map(|i| (i % 256) as u8).collect(),
            ContentPattern::Random(seed) => {
                let mut state = seed | 1;
                (0..size)
                    .map(|_| {
                        state ^= state << 13;
                        state ^= state >> 7;
                        state ^= state << 17;
                        (state >> 24) as u8
                    })
                    .collect()
            }
        }
    }

    pub fn build_source(&self, chunk_size: usize) -> MemorySource {
        MemorySource::new(Bytes::from(self.build()), chunk_size)
    }

    /// Write the content to `dir/name` and return the path
    pub fn write_to(&self, dir: &Path, name: &str) -> io::Result<PathBuf> {
        let path = dir.join(name);
        std::fs::write(&path, self.build())?;
        Ok(path)
    }
}
