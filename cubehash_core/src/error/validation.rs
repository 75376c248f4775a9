//! Validation related error types

use thiserror::Error;

/// Validation and configuration errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The hasher rejected a revision / output length combination
    #[error("Invalid hash parameters (revision {revision}, {output_bits} bits): {reason}")]
    InvalidParameters {
        revision: u32,
        output_bits: u32,
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ValidationError {
    /// Create an invalid parameters error
    pub fn invalid_parameters(revision: u32, output_bits: u32, reason: &str) -> Self {
        Self::InvalidParameters {
            revision,
            output_bits,
            reason: reason.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: &str) -> Self {
        Self::InvalidConfiguration {
            message: message.to_string(),
        }
    }
}
