//! Hash parameters and the incremental hasher capability
//!
//! The streaming engine only ever talks to [`HasherFactory`] and
//! [`IncrementalHasher`]; [`CubeHashFactory`] is the built-in provider.

use serde::{Deserialize, Serialize};

mod cubehash;
mod traits;

pub use cubehash::{CubeHash, CubeHashFactory, CubeHashVariant};
pub use traits::{HasherFactory, IncrementalHasher};

/// Revision used when nothing else is configured
pub const DEFAULT_REVISION: u32 = 3;

/// Output length used when nothing else is configured
pub const DEFAULT_OUTPUT_BITS: u32 = 512;

/// Algorithm parameters for one computation
///
/// A computation takes its own copy when it starts, so edits made while a
/// hash is running only affect later computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashParameters {
    /// Selects the CubeHash parameter set
    pub revision: u32,
    /// Digest length in bits
    pub output_bits: u32,
}

impl HashParameters {
    pub fn new(revision: u32, output_bits: u32) -> Self {
        Self {
            revision,
            output_bits,
        }
    }

    /// Copy of these parameters with a different revision
    pub fn with_revision(self, revision: u32) -> Self {
        Self { revision, ..self }
    }

    /// Copy of these parameters with a different output length
    pub fn with_output_bits(self, output_bits: u32) -> Self {
        Self {
            output_bits,
            ..self
        }
    }
}

impl Default for HashParameters {
    fn default() -> Self {
        Self::new(DEFAULT_REVISION, DEFAULT_OUTPUT_BITS)
    }
}

impl std::fmt::Display for HashParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rev{}/{}", self.revision, self.output_bits)
    }
}
