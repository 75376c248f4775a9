mod formatters;

pub use formatters::{JsonFormatter, TextFormatter};

use anyhow::Result;
use cubehash_core::{HashParameters, Mode, ResultRecord};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => anyhow::bail!("Unknown output format: {}", s),
        }
    }
}

/// One finished computation, ready to print
#[derive(Debug, Clone)]
pub struct HashReport {
    /// File path or a description of the text input
    pub source: String,
    pub mode: Mode,
    pub params: HashParameters,
    pub record: ResultRecord,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// What goes to stdout
    fn format_result(&self, report: &HashReport) -> Result<String>;

    /// Timing details for stderr, if this format has any
    fn format_summary(&self, report: &HashReport) -> Option<String> {
        let _ = report;
        None
    }
}

/// Create a formatter based on output format
pub fn create_formatter(format: OutputFormat, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
