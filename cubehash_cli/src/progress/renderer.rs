//! Progress rendering for the CLI
//!
//! Converts ProgressUpdate messages into an indicatif bar on stderr.

use crate::progress::utils::format_bytes;
use colored::*;
use cubehash_core::progress::ProgressUpdate;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

/// Render progress updates from a channel until every sender is gone
pub async fn render_progress(mut rx: mpsc::Receiver<ProgressUpdate>, label: String) {
    let mut renderer = ProgressRenderer::new(label);

    while let Some(update) = rx.recv().await {
        renderer.handle_update(update);
    }

    renderer.finish();
}

/// Progress renderer for a single hashing run
pub struct ProgressRenderer {
    label: String,
    bar: Option<ProgressBar>,
    updates: usize,
}

impl ProgressRenderer {
    pub fn new(label: String) -> Self {
        Self {
            label,
            bar: None,
            updates: 0,
        }
    }

    /// Number of byte-count updates rendered so far
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Handle a progress update
    pub fn handle_update(&mut self, update: ProgressUpdate) {
        match update {
            ProgressUpdate::HashProgress {
                bytes_processed,
                total_bytes,
            } => {
                self.updates += 1;
                let bar = self.bar(total_bytes);
                bar.set_position(bytes_processed.min(total_bytes));
            }
            ProgressUpdate::Status { message } => {
                let line = format!("{} {}", "→".green(), message);
                match &self.bar {
                    Some(bar) => bar.println(line),
                    None => eprintln!("{line}"),
                }
            }
        }
    }

    fn bar(&mut self, total_bytes: u64) -> &ProgressBar {
        let label = &self.label;
        self.bar.get_or_insert_with(|| {
            let pb = ProgressBar::new(total_bytes);
            let style = ProgressStyle::default_bar()
                .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% | {bytes}/{total_bytes} | {bytes_per_sec}")
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style);
            pb.set_message(format!(
                "{}: {} ({})",
                "Hashing".bold(),
                label.cyan(),
                format_bytes(total_bytes)
            ));
            pb
        })
    }

    /// Finish the progress bar, if one was drawn
    pub fn finish(self) {
        if let Some(pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}
