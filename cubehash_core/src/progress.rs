//! Progress reporting abstractions
//!
//! The engine reports through [`ProgressProvider`] so it never depends on a
//! particular channel or UI.

/// Core trait for progress reporting
pub trait ProgressProvider: Send + Sync {
    /// Report a progress update
    fn report(&self, update: ProgressUpdate);

    /// Signal that the operation is complete
    fn complete(&self) {}
}

/// Unified progress update type
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// Bytes fed to the hasher so far
    HashProgress {
        bytes_processed: u64,
        total_bytes: u64,
    },

    /// Generic status message
    Status { message: String },
}

impl ProgressUpdate {
    /// Fraction of the input consumed, clamped to `[0, 1]`
    ///
    /// `None` for updates that carry no byte counts.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            ProgressUpdate::HashProgress {
                bytes_processed,
                total_bytes,
            } => Some(fraction(*bytes_processed, *total_bytes)),
            ProgressUpdate::Status { .. } => None,
        }
    }
}

/// `processed / total` clamped to `[0, 1]`; a zero total counts as done
pub fn fraction(processed: u64, total: u64) -> f64 {
    if total == 0 {
        1.0
    } else {
        (processed as f64 / total as f64).min(1.0)
    }
}

/// Null implementation for when no progress is needed
pub struct NullProvider;

impl ProgressProvider for NullProvider {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Adapts a plain `fraction -> ()` callback
pub struct FnProvider<F> {
    callback: F,
}

impl<F> FnProvider<F>
where
    F: Fn(f64) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressProvider for FnProvider<F>
where
    F: Fn(f64) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        if let Some(value) = update.fraction() {
            (self.callback)(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_null_provider() {
        let provider = NullProvider;
        provider.report(ProgressUpdate::Status {
            message: "Test".to_string(),
        });
        provider.complete();
    }

    #[test]
    fn test_fraction_is_clamped() {
        assert_eq!(fraction(0, 100), 0.0);
        assert_eq!(fraction(50, 100), 0.5);
        assert_eq!(fraction(150, 100), 1.0);
        assert_eq!(fraction(0, 0), 1.0);
    }

    #[test]
    fn test_fn_provider_ignores_status() {
        let seen = Mutex::new(Vec::new());
        let provider = FnProvider::new(|f| seen.lock().unwrap().push(f));

        provider.report(ProgressUpdate::Status {
            message: "ignored".to_string(),
        });
        provider.report(ProgressUpdate::HashProgress {
            bytes_processed: 25,
            total_bytes: 100,
        });

        assert_eq!(*seen.lock().unwrap(), vec![0.25]);
    }
}
