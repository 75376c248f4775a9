//! Error types for the CubeHash core library
//!
//! Errors are grouped into a few categories so callers at the triggering
//! boundary can turn any of them into one human-readable message.

use thiserror::Error;

pub mod internal;
pub mod io;
pub mod validation;

pub use self::io::{IoError, IoErrorKind};
pub use self::validation::ValidationError;
pub use internal::InternalError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the CubeHash core library
///
/// - I/O errors: opening or reading a byte source, reading stored objects
/// - Validation errors: rejected hash parameters, bad configuration
/// - Internal errors: text encoding, worker failures
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Internal library errors
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Error {
    /// Whether the hasher rejected the revision / output length pair
    pub fn is_invalid_parameters(&self) -> bool {
        matches!(
            self,
            Error::Validation(ValidationError::InvalidParameters { .. })
        )
    }

    /// Whether a byte source failed while being read
    pub fn is_source_read(&self) -> bool {
        matches!(self, Error::Io(err) if err.kind == IoErrorKind::SourceRead)
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}
