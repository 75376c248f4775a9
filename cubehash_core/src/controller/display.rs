//! What the user currently sees

use crate::results::{Mode, ResultRecord};
use serde::Serialize;

/// Shown where a value is not available
pub const PLACEHOLDER: &str = "–";

/// Rendered view of the controller state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    pub active: Mode,
    /// Lowercase hex digest, empty when nothing is shown
    pub digest_hex: String,
    pub elapsed: String,
    pub throughput: String,
    /// Timing/throughput panel, only meaningful for files
    pub performance_visible: bool,
    pub file_label: Option<String>,
    pub error: Option<String>,
    pub busy: bool,
    pub progress: Option<f64>,
}

impl DisplayState {
    pub fn new(active: Mode) -> Self {
        Self {
            active,
            digest_hex: String::new(),
            elapsed: PLACEHOLDER.to_string(),
            throughput: PLACEHOLDER.to_string(),
            performance_visible: active == Mode::File,
            file_label: None,
            error: None,
            busy: false,
            progress: None,
        }
    }

    pub(crate) fn set_active(&mut self, mode: Mode) {
        self.active = mode;
        self.performance_visible = mode == Mode::File;
    }

    pub(crate) fn clear_output(&mut self) {
        self.digest_hex.clear();
        self.elapsed = PLACEHOLDER.to_string();
        self.throughput = PLACEHOLDER.to_string();
    }

    pub(crate) fn show_record(&mut self, record: &ResultRecord) {
        self.digest_hex = record.digest.to_hex();
        self.elapsed = format_elapsed(record.elapsed_ms);
        self.throughput = record
            .throughput_mbps()
            .map(format_throughput)
            .unwrap_or_else(|| PLACEHOLDER.to_string());
    }
}

/// `"12.34 ms"`
pub fn format_elapsed(elapsed_ms: f64) -> String {
    format!("{elapsed_ms:.2} ms")
}

/// `"56.78 MB/s"`
pub fn format_throughput(mbps: f64) -> String {
    format!("{mbps:.2} MB/s")
}

/// `"name (12.3 KB)"`
pub fn format_file_label(name: &str, size: u64) -> String {
    format!("{name} ({:.1} KB)", size as f64 / 1024.0)
}
