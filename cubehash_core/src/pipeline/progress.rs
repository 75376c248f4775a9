//! Byte accounting for progress updates

use crate::progress::{ProgressProvider, ProgressUpdate};

/// Tracks bytes fed to the hasher against the declared total
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total_bytes: u64,
    bytes_processed: u64,
    chunks: usize,
}

impl ProgressTracker {
    pub fn new(total_bytes: u64) -> Self {
        Self {
            total_bytes,
            bytes_processed: 0,
            chunks: 0,
        }
    }

    /// Account for one chunk and report the new position
    pub fn advance(&mut self, chunk_len: usize, provider: &dyn ProgressProvider) {
        self.bytes_processed += chunk_len as u64;
        self.chunks += 1;
        provider.report(ProgressUpdate::HashProgress {
            bytes_processed: self.bytes_processed,
            total_bytes: self.total_bytes,
        });
    }

    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::FnProvider;
    use std::sync::Mutex;

    #[test]
    fn test_reports_cumulative_fraction() {
        let seen = Mutex::new(Vec::new());
        let provider = FnProvider::new(|f| seen.lock().unwrap().push(f));
        let mut tracker = ProgressTracker::new(100);

        tracker.advance(25, &provider);
        tracker.advance(25, &provider);
        tracker.advance(50, &provider);

        assert_eq!(*seen.lock().unwrap(), vec![0.25, 0.5, 1.0]);
        assert_eq!(tracker.bytes_processed(), 100);
        assert_eq!(tracker.chunks(), 3);
    }
}
