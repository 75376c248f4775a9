//! Internal library error types

use thiserror::Error;

/// Internal library errors
#[derive(Error, Debug)]
pub enum InternalError {
    /// Input text could not be turned into bytes
    #[error("Text encoding failed: {message}")]
    Encoding { message: String },

    /// A background hashing task did not finish
    #[error("Hashing worker failed: {message}")]
    Worker { message: String },
}

impl InternalError {
    /// Create an encoding error
    pub fn encoding(message: &str) -> Self {
        Self::Encoding {
            message: message.to_string(),
        }
    }

    /// Create a worker error
    pub fn worker(message: &str) -> Self {
        Self::Worker {
            message: message.to_string(),
        }
    }
}
