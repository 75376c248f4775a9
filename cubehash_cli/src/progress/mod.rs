//! Progress reporting module for the CLI
//!
//! Providers turn engine updates into channel messages; the renderer draws
//! them with indicatif on stderr.

pub mod provider;
pub mod renderer;
pub mod utils;

pub use provider::{ChannelProvider, create_progress_infrastructure};
pub use renderer::{ProgressRenderer, render_progress};
pub use utils::{format_bytes, format_duration};
