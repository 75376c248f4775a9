//! Per-mode result slots with last-request-wins commits
//!
//! Each mode holds at most one [`ResultRecord`]. Every computation takes a
//! [`RequestTicket`] before it starts and may only store its result if no
//! newer request for the same mode has been issued since.

use crate::digest::Digest;
use serde::{Deserialize, Serialize};

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    File,
    String,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::File => write!(f, "file"),
            Mode::String => write!(f, "string"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(Mode::File),
            "string" | "text" => Ok(Mode::String),
            _ => Err(format!("Unknown mode: {s}")),
        }
    }
}

/// Outcome of one successful computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub digest: Digest,
    pub elapsed_ms: f64,
    /// Present for file results only
    pub source_size_bytes: Option<u64>,
}

impl ResultRecord {
    pub fn file(digest: Digest, elapsed_ms: f64, source_size_bytes: u64) -> Self {
        Self {
            digest,
            elapsed_ms,
            source_size_bytes: Some(source_size_bytes),
        }
    }

    /// String results carry no meaningful timing
    pub fn string(digest: Digest) -> Self {
        Self {
            digest,
            elapsed_ms: 0.0,
            source_size_bytes: None,
        }
    }

    /// Throughput in MB/s (1 MB = 10^6 bytes), if this record has a size
    pub fn throughput_mbps(&self) -> Option<f64> {
        let size = self.source_size_bytes?;
        let seconds = self.elapsed_ms / 1000.0;
        let megabytes = size as f64 / 1_000_000.0;
        Some(if seconds > 0.0 { megabytes / seconds } else { 0.0 })
    }
}

/// Permission to store a result for one mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    mode: Mode,
    sequence: u64,
}

impl RequestTicket {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Debug, Default)]
struct Slot {
    record: Option<ResultRecord>,
    issued: u64,
    settled: u64,
}

/// One result slot per mode
#[derive(Debug, Default)]
pub struct ResultSlots {
    file: Slot,
    string: Slot,
}

impl ResultSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, mode: Mode) -> &Slot {
        match mode {
            Mode::File => &self.file,
            Mode::String => &self.string,
        }
    }

    fn slot_mut(&mut self, mode: Mode) -> &mut Slot {
        match mode {
            Mode::File => &mut self.file,
            Mode::String => &mut self.string,
        }
    }

    /// Issue a new ticket, superseding any outstanding one for `mode`
    pub fn begin(&mut self, mode: Mode) -> RequestTicket {
        let slot = self.slot_mut(mode);
        slot.issued += 1;
        RequestTicket {
            mode,
            sequence: slot.issued,
        }
    }

    /// Whether `ticket` is still the latest request for its mode
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.slot(ticket.mode).issued == ticket.sequence
    }

    /// Whether the latest request for `mode` has not finished yet
    pub fn is_pending(&self, mode: Mode) -> bool {
        let slot = self.slot(mode);
        slot.settled < slot.issued
    }

    /// Replace the record for the ticket's mode if the ticket is current
    ///
    /// Returns `false` and drops `record` when a newer request exists.
    pub fn commit(&mut self, ticket: RequestTicket, record: ResultRecord) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "Discarding stale {} result #{} (latest #{})",
                ticket.mode,
                ticket.sequence,
                self.slot(ticket.mode).issued
            );
            return false;
        }
        let slot = self.slot_mut(ticket.mode);
        slot.record = Some(record);
        slot.settled = ticket.sequence;
        true
    }

    /// Mark a current request as finished without a result
    pub fn abandon(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.slot_mut(ticket.mode).settled = ticket.sequence;
        true
    }

    pub fn get(&self, mode: Mode) -> Option<&ResultRecord> {
        self.slot(mode).record.as_ref()
    }
}
