//! Mock implementations for testing

mod hasher;
mod source;
mod store;

pub use hasher::MockHasherFactory;
pub use source::{MockByteSource, MockSelection, ReleaseCounter};
pub use store::MemoryObjectStore;
