//! CubeHash command line interface
//!
//! The binary is a thin layer over these modules; they are exposed as a
//! library so integration tests can drive them directly.

pub mod clipboard;
pub mod config;
pub mod output;
pub mod progress;
pub mod server;
pub mod session;
pub mod terminal;
