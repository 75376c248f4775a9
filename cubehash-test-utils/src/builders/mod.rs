//! Builders for test data

mod test_data;

pub use test_data::{ContentPattern, TestDataBuilder};
