//! CubeHash Client Core Library
//!
//! Streaming CubeHash digests over files and strings, the two-mode result
//! controller that presents them, and the origin that serves the compiled
//! hash artifacts.

pub mod assets;
pub mod controller;
pub mod digest;
pub mod error;
pub mod hashing;
pub mod pipeline;
pub mod progress;
pub mod results;
pub mod source;

// Mock implementations and testing utilities live in the cubehash-test-utils crate

// Re-export main types
pub use assets::{AssetOrigin, AssetResponse, AssetRoute, FsObjectStore, ObjectStore};
pub use controller::{Clipboard, Completion, DigestController, DisplayState};
pub use digest::Digest;
pub use error::{Error, Result};
pub use hashing::{
    CubeHashFactory, DEFAULT_OUTPUT_BITS, DEFAULT_REVISION, HashParameters, HasherFactory,
    IncrementalHasher,
};
pub use pipeline::{DigestEngine, decode_text};
pub use progress::{FnProvider, NullProvider, ProgressProvider, ProgressUpdate};
pub use results::{Mode, RequestTicket, ResultRecord, ResultSlots};
pub use source::{
    ByteSource, DEFAULT_CHUNK_SIZE, FileSelection, FileSource, MemorySelection, MemorySource,
    SourceInfo, SourceOpener,
};

/// Core hashing configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HashingConfig {
    pub revision: u32,
    pub output_bits: u32,
    pub chunk_size: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            revision: DEFAULT_REVISION,
            output_bits: DEFAULT_OUTPUT_BITS,
            chunk_size: DEFAULT_CHUNK_SIZE, // 64KB reads
        }
    }
}

impl HashingConfig {
    pub fn parameters(&self) -> HashParameters {
        HashParameters::new(self.revision, self.output_bits)
    }

    /// Check that the parameters are usable and the chunk size is non-zero
    pub fn validate(&self) -> Result<()> {
        CubeHashFactory.create(self.parameters())?;
        if self.chunk_size == 0 {
            return Err(error::ValidationError::invalid_configuration(
                "chunk_size must be greater than zero",
            )
            .into());
        }
        Ok(())
    }
}
