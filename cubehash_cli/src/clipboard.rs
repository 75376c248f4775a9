//! Clipboard access through the terminal
//!
//! Uses the OSC 52 escape sequence, which most terminal emulators (and tmux
//! with `set-clipboard on`) turn into a system clipboard write.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cubehash_core::Clipboard;
use std::io::{self, Write};
use std::sync::Mutex;

/// Build the OSC 52 sequence that sets the clipboard to `text`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

/// Writes OSC 52 sequences to a terminal stream
pub struct Osc52Clipboard<W: Write + Send> {
    out: Mutex<W>,
}

impl Osc52Clipboard<io::Stderr> {
    /// Clipboard on stderr, which stays a terminal when stdout is piped
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn write_text(&self, text: &str) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::other("clipboard writer poisoned"))?;
        out.write_all(osc52_sequence(text).as_bytes())?;
        out.flush()
    }
}
