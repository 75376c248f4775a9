use super::{HashReport, OutputFormatter};
use crate::progress::format_bytes;
use anyhow::Result;
use colored::*;
use cubehash_core::controller::{format_elapsed, format_throughput};
use serde_json::json;

/// Text formatter for human-readable output
///
/// Stdout gets the bare digest so it can be piped; everything else goes to
/// the summary.
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn colorize(&self, text: &str, color: fn(&str) -> ColoredString) -> String {
        if self.use_color {
            color(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_result(&self, report: &HashReport) -> Result<String> {
        Ok(report.record.digest.to_hex())
    }

    fn format_summary(&self, report: &HashReport) -> Option<String> {
        let size = report.record.source_size_bytes?;
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            self.colorize("File:", |s| s.bold()),
            report.source
        ));
        output.push_str(&format!("Size: {} ({size})\n", format_bytes(size)));
        output.push_str(&format!(
            "Parameters: {}\n",
            self.colorize(&report.params.to_string(), |s| s.yellow())
        ));
        output.push_str(&format!(
            "Time: {}\n",
            format_elapsed(report.record.elapsed_ms)
        ));
        if let Some(mbps) = report.record.throughput_mbps() {
            output.push_str(&format!("Throughput: {}", format_throughput(mbps)));
        }

        Some(output)
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_result(&self, report: &HashReport) -> Result<String> {
        let record = &report.record;
        let mut json_result = json!({
            "source": report.source,
            "mode": report.mode,
            "revision": report.params.revision,
            "output_bits": report.params.output_bits,
            "digest": record.digest,
        });

        if let Some(size) = record.source_size_bytes {
            json_result["size_bytes"] = json!(size);
            json_result["elapsed_ms"] = json!(record.elapsed_ms);
            json_result["throughput_mbps"] = json!(record.throughput_mbps());
        }

        if self.pretty {
            Ok(serde_json::to_string_pretty(&json_result)?)
        } else {
            Ok(serde_json::to_string(&json_result)?)
        }
    }
}
