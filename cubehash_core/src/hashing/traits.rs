//! Traits for the incremental hasher capability

use super::HashParameters;
use crate::Result;
use crate::digest::Digest;

/// A single-use streaming hasher
///
/// `finalize` consumes the hasher, so no update can follow it.
pub trait IncrementalHasher: Send {
    /// Feed the next bytes of the message
    fn update(&mut self, data: &[u8]);

    /// Finish the computation and return the digest
    fn finalize(self: Box<Self>) -> Digest;
}

/// Builds hashers for a given parameter set
pub trait HasherFactory: Send + Sync {
    /// Display name for user interfaces
    fn name(&self) -> &'static str;

    /// Create a fresh hasher, or fail with an invalid-parameters error
    fn create(&self, params: HashParameters) -> Result<Box<dyn IncrementalHasher>>;

    /// Hash an in-memory buffer in one pass
    fn hash_bytes(&self, params: HashParameters, data: &[u8]) -> Result<Digest> {
        let mut hasher = self.create(params)?;
        hasher.update(data);
        Ok(hasher.finalize())
    }
}
