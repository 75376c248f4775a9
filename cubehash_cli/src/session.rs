//! Line-oriented driver for the digest controller
//!
//! Each input line is one command. File hashes can run in the background
//! (`hash &`) while the other mode is used, which is where the controller's
//! per-mode bookkeeping matters.

use anyhow::Result;
use cubehash_core::controller::{Completion, DisplayState, PLACEHOLDER};
use cubehash_core::{Clipboard, DigestController, FileSelection, HashParameters, Mode};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;

const HELP: &str = "\
Commands:
  file <path>      select a file
  hash [&]         hash the selected file (& runs it in the background)
  wait             wait for background hashes
  text [string]    set the string input and hash it
  mode file|string switch the active mode
  rev <n>          set the revision
  bits <n>         set the output length in bits
  show             print the current state
  copy             copy the shown digest to the clipboard
  help             show this help
  quit             leave the session";

/// What the caller should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive session over one controller
pub struct Session<W: Write> {
    controller: Arc<DigestController>,
    chunk_size: usize,
    clipboard: Box<dyn Clipboard + Send + Sync>,
    background: Vec<JoinHandle<Completion>>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(
        controller: DigestController,
        chunk_size: usize,
        clipboard: Box<dyn Clipboard + Send + Sync>,
        out: W,
    ) -> Self {
        Self {
            controller: Arc::new(controller),
            chunk_size,
            clipboard,
            background: Vec::new(),
            out,
        }
    }

    pub fn controller(&self) -> &DigestController {
        &self.controller
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read commands until `quit` or end of input
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, reader: R) -> Result<()> {
        writeln!(self.out, "Type 'help' for commands.")?;
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if self.execute(&line).await? == Flow::Quit {
                break;
            }
        }
        self.wait().await?;
        Ok(())
    }

    /// Run one command line
    pub async fn execute(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim_start();
        // `text` takes everything after the first separator verbatim
        let (command, raw_rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line.trim_end(), ""));
        let rest = raw_rest.trim();
        log::debug!("Session command: {command:?} {rest:?}");

        match command {
            "" => {}
            "file" => self.select_file(rest).await?,
            "hash" if rest == "&" => self.hash_in_background()?,
            "hash" => {
                self.controller.hash_selected_file().await;
                self.render()?;
            }
            "wait" => {
                self.wait().await?;
                self.render()?;
            }
            "text" => {
                self.controller.set_text(raw_rest).await;
                self.render()?;
            }
            "mode" => match rest.parse::<Mode>() {
                Ok(mode) => {
                    self.controller.switch_to(mode).await;
                    self.render()?;
                }
                Err(e) => writeln!(self.out, "{e}")?,
            },
            "rev" | "bits" => match rest.parse::<u32>() {
                Ok(value) if command == "rev" => {
                    self.controller.set_revision(value).await;
                    self.render()?;
                }
                Ok(value) => {
                    self.controller.set_output_bits(value).await;
                    self.render()?;
                }
                Err(_) => writeln!(self.out, "Expected a number, got {rest:?}")?,
            },
            "show" => self.render()?,
            "copy" => {
                if self.controller.copy_output(self.clipboard.as_ref()) {
                    writeln!(self.out, "Copied.")?;
                }
            }
            "help" => writeln!(self.out, "{HELP}")?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => writeln!(self.out, "Unknown command: {other} (try 'help')")?,
        }

        Ok(Flow::Continue)
    }

    async fn select_file(&mut self, path: &str) -> Result<()> {
        if path.is_empty() {
            writeln!(self.out, "Usage: file <path>")?;
            return Ok(());
        }
        match FileSelection::new(path, self.chunk_size).await {
            Ok(selection) => {
                self.controller.select_file(Arc::new(selection));
                self.render()?;
            }
            Err(e) => writeln!(self.out, "Error: {e}")?,
        }
        Ok(())
    }

    fn hash_in_background(&mut self) -> Result<()> {
        let controller = Arc::clone(&self.controller);
        self.background
            .push(tokio::spawn(
                async move { controller.hash_selected_file().await },
            ));
        writeln!(self.out, "Hashing in the background; 'wait' to join.")?;
        Ok(())
    }

    async fn wait(&mut self) -> Result<()> {
        for handle in self.background.drain(..) {
            if let Err(e) = handle.await {
                log::warn!("Background hash task failed: {e}");
            }
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let display = self.controller.display();
        let params = self.controller.parameters();
        writeln!(self.out, "{}", render_display(&display, params))?;
        Ok(())
    }
}

/// Plain-text rendering of the controller's display
pub fn render_display(display: &DisplayState, params: HashParameters) -> String {
    let mut lines = vec![format!("[{}] {params}", display.active)];

    if display.active == Mode::File {
        lines.push(format!(
            "File: {}",
            display.file_label.as_deref().unwrap_or("none")
        ));
    }
    if display.busy {
        let percent = display.progress.unwrap_or(0.0) * 100.0;
        lines.push(format!("Hashing... {percent:.0}%"));
    }

    let digest = if display.digest_hex.is_empty() {
        PLACEHOLDER
    } else {
        display.digest_hex.as_str()
    };
    lines.push(format!("Digest: {digest}"));

    if display.performance_visible {
        lines.push(format!(
            "Time: {} | Throughput: {}",
            display.elapsed, display.throughput
        ));
    }
    if let Some(error) = &display.error {
        lines.push(error.clone());
    }

    lines.join("\n")
}
