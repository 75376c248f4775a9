//! Streaming digest pipeline
//!
//! Drives a [`ByteSource`](crate::source::ByteSource) through one hasher
//! instance, reporting progress and measuring wall time.

mod progress;
mod streaming;

pub use progress::ProgressTracker;
pub use streaming::{DigestEngine, decode_text};
