//! Digest engine: file streams and one-shot text

use super::ProgressTracker;
use crate::digest::Digest;
use crate::error::InternalError;
use crate::hashing::{CubeHashFactory, HashParameters, HasherFactory};
use crate::progress::{ProgressProvider, ProgressUpdate};
use crate::results::ResultRecord;
use crate::source::{ByteSource, ReleaseOnDrop};
use crate::Result;
use std::sync::Arc;
use std::time::Instant;

/// Computes digests through a [`HasherFactory`]
///
/// Holds no per-computation state; every call builds its own hasher from
/// the parameters it is given.
#[derive(Clone)]
pub struct DigestEngine {
    factory: Arc<dyn HasherFactory>,
}

impl std::fmt::Debug for DigestEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestEngine")
            .field("factory", &self.factory.name())
            .finish()
    }
}

impl Default for DigestEngine {
    fn default() -> Self {
        Self::new(Arc::new(CubeHashFactory))
    }
}

impl DigestEngine {
    pub fn new(factory: Arc<dyn HasherFactory>) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &Arc<dyn HasherFactory> {
        &self.factory
    }

    /// Hash a byte source chunk by chunk
    ///
    /// Parameters are checked before anything is read. A status line naming
    /// the size and parameters is reported first. Chunks go to the hasher in
    /// arrival order and progress is reported after each one. The
    /// source is released on every exit path. Elapsed time runs from the
    /// first read to the return of `finalize`.
    pub async fn compute_file_digest<S>(
        &self,
        source: &mut S,
        params: HashParameters,
        progress: &dyn ProgressProvider,
    ) -> Result<ResultRecord>
    where
        S: ByteSource + ?Sized,
    {
        let mut source = ReleaseOnDrop::new(source);
        let mut hasher = self.factory.create(params)?;

        let total_bytes = source.total_size();
        let mut tracker = ProgressTracker::new(total_bytes);
        let status = format!("Hashing {total_bytes} bytes with {} {params}", self.factory.name());
        log::debug!("{status}");
        progress.report(ProgressUpdate::Status { message: status });

        let start = Instant::now();
        loop {
            let chunk = match source.read_chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    log::warn!(
                        "Source failed after {} bytes: {e}",
                        tracker.bytes_processed()
                    );
                    return Err(e);
                }
            };
            hasher.update(&chunk);
            tracker.advance(chunk.len(), progress);
        }
        let digest = hasher.finalize();
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        drop(source);

        log::debug!(
            "Hashed {} bytes in {} chunks ({elapsed_ms:.2} ms)",
            tracker.bytes_processed(),
            tracker.chunks()
        );

        Ok(ResultRecord::file(digest, elapsed_ms, total_bytes))
    }

    /// Hash a string's UTF-8 bytes in a single update
    pub fn compute_string_digest(&self, text: &str, params: HashParameters) -> Result<Digest> {
        self.factory.hash_bytes(params, text.as_bytes())
    }
}

/// Turn raw input into text, rejecting bytes that are not UTF-8
pub fn decode_text(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        InternalError::encoding(&format!(
            "input is not valid UTF-8 at byte {}",
            e.utf8_error().valid_up_to()
        ))
        .into()
    })
}
