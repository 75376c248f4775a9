//! Hasher factory with configurable latency

use cubehash_core::{
    CubeHashFactory, Digest, HashParameters, HasherFactory, IncrementalHasher, Result,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Wraps [`CubeHashFactory`] and sleeps in `finalize` for chosen inputs
///
/// Digests are the real CubeHash digests, so results can be compared with
/// an unmocked engine. The sleep blocks the calling thread, which is what a
/// slow hash looks like to the controller's worker threads.
///
/// # Examples
///
/// ```rust
/// use cubehash_test_utils::MockHasherFactory;
/// use std::time::Duration;
///
/// let factory = MockHasherFactory::new().with_delay_for(b"a", Duration::from_millis(50));
/// assert_eq!(factory.created(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockHasherFactory {
    inner: CubeHashFactory,
    delays: Arc<HashMap<Vec<u8>, Duration>>,
    default_delay: Duration,
    created: Arc<Mutex<Vec<HashParameters>>>,
}

impl MockHasherFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay finalization when the hashed input equals `input`
    pub fn with_delay_for(mut self, input: &[u8], delay: Duration) -> Self {
        Arc::make_mut(&mut self.delays).insert(input.to_vec(), delay);
        self
    }

    /// Delay finalization of every input without a specific delay
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Number of hashers created so far
    pub fn created(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    /// Parameters of every hasher created so far, oldest first
    pub fn created_with(&self) -> Vec<HashParameters> {
        self.created.lock().unwrap().clone()
    }
}

impl HasherFactory for MockHasherFactory {
    fn name(&self) -> &'static str {
        "MockCubeHash"
    }

    fn create(&self, params: HashParameters) -> Result<Box<dyn IncrementalHasher>> {
        let inner = self.inner.create(params)?;
        self.created.lock().unwrap().push(params);
        Ok(Box::new(DelayedHasher {
            inner,
            seen: Vec::new(),
            delays: Arc::clone(&self.delays),
            default_delay: self.default_delay,
        }))
    }
}

struct DelayedHasher {
    inner: Box<dyn IncrementalHasher>,
    seen: Vec<u8>,
    delays: Arc<HashMap<Vec<u8>, Duration>>,
    default_delay: Duration,
}

impl IncrementalHasher for DelayedHasher {
    fn update(&mut self, data: &[u8]) {
        if !self.delays.is_empty() {
            self.seen.extend_from_slice(data);
        }
        self.inner.update(data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        let delay = self
            .delays
            .get(&self.seen)
            .copied()
            .unwrap_or(self.default_delay);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.inner.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_matches_real_factory() {
        let mock = MockHasherFactory::new().with_delay_for(b"abc", Duration::from_millis(1));
        let params = HashParameters::new(3, 256);

        assert_eq!(
            mock.hash_bytes(params, b"abc").unwrap(),
            CubeHashFactory.hash_bytes(params, b"abc").unwrap()
        );
        assert_eq!(mock.created_with(), vec![params]);
    }

    #[test]
    fn test_invalid_parameters_create_nothing() {
        let mock = MockHasherFactory::new();
        assert!(mock.create(HashParameters::new(9, 512)).is_err());
        assert_eq!(mock.created(), 0);
    }
}
