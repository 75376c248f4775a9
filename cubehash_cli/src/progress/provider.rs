//! Progress provider implementation for CLI
//!
//! Bridges the core library's progress reporting with the CLI's rendering
//! task.

use cubehash_core::progress::{ProgressProvider, ProgressUpdate};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

/// Channel-based progress provider for CLI rendering
///
/// Sends progress updates through a channel to a separate rendering task,
/// decoupling the progress reporting from the UI rendering.
pub struct ChannelProvider {
    tx: Mutex<Option<mpsc::Sender<ProgressUpdate>>>,
    name: String,
}

impl ChannelProvider {
    /// Create a new channel provider whose status messages carry a name
    pub fn with_name(tx: mpsc::Sender<ProgressUpdate>, name: String) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
            name,
        }
    }
}

impl ProgressProvider for ChannelProvider {
    fn report(&self, update: ProgressUpdate) {
        let update = match update {
            ProgressUpdate::Status { message } => ProgressUpdate::Status {
                message: format!("[{}] {message}", self.name),
            },
            other => other,
        };

        // Don't block or panic if the receiver is gone or full
        let tx_opt = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(tx) = tx_opt {
            let _ = tx.try_send(update);
        }
    }

    fn complete(&self) {
        // Drop our sender so the renderer can exit its loop
        *self.tx.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Create a progress provider and receiver pair for one named input
pub fn create_progress_infrastructure(
    name: String,
) -> (Arc<dyn ProgressProvider>, mpsc::Receiver<ProgressUpdate>) {
    let (tx, rx) = mpsc::channel(100);
    let provider = Arc::new(ChannelProvider::with_name(tx, name)) as Arc<dyn ProgressProvider>;
    (provider, rx)
}
