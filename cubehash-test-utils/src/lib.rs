//! Test utilities for the CubeHash client
//!
//! This crate provides mock hashers, byte sources and object stores, plus
//! builders for deterministic test data.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::{ContentPattern, TestDataBuilder};
pub use mocks::{
    MemoryObjectStore, MockByteSource, MockHasherFactory, MockSelection, ReleaseCounter,
};
