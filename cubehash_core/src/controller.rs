//! Presentation controller for the file and string modes
//!
//! The controller owns the current parameters, the inputs for both modes,
//! one result slot per mode and the rendered [`DisplayState`]. Methods take
//! `&self` so a running file hash and string edits can interleave on one
//! runtime; no lock is held across an `.await`.
//!
//! Rules:
//! - switching to a mode with a stored record only re-renders it;
//! - a file hash keeps running after switching away and still stores its
//!   result, which is rendered only while file mode is active;
//! - a parameter change recomputes the active mode only;
//! - a result is stored only if no newer request for its mode was issued.

use crate::Result;
use crate::error::InternalError;
use crate::hashing::HashParameters;
use crate::pipeline::DigestEngine;
use crate::progress::{ProgressProvider, ProgressUpdate};
use crate::results::{Mode, RequestTicket, ResultRecord, ResultSlots};
use crate::source::SourceOpener;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

mod display;

pub use display::{
    DisplayState, PLACEHOLDER, format_elapsed, format_file_label, format_throughput,
};

/// Message shown when a file hash is requested without a selection
pub const NO_FILE_MESSAGE: &str = "Pick a file first.";

/// What happened to a request
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// A stored record was shown without recomputing
    Rendered,
    /// A new record was stored
    Committed(ResultRecord),
    /// A newer request for the same mode replaced this one
    Superseded,
    /// A computation for the mode is already running
    InFlight,
    /// Nothing to hash for the mode
    NoInput,
    /// The computation failed; the message is also on the display
    Failed(String),
}

/// Destination for copying the shown digest
pub trait Clipboard {
    fn write_text(&self, text: &str) -> std::io::Result<()>;
}

struct ControllerState {
    active: Mode,
    params: HashParameters,
    text: String,
    selection: Option<Arc<dyn SourceOpener>>,
    slots: ResultSlots,
    display: DisplayState,
}

/// Two-mode digest controller
pub struct DigestController {
    engine: DigestEngine,
    state: Mutex<ControllerState>,
}

impl std::fmt::Debug for DigestController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("DigestController")
            .field("engine", &self.engine)
            .field("active", &state.active)
            .field("params", &state.params)
            .field("has_selection", &state.selection.is_some())
            .finish()
    }
}

impl DigestController {
    /// Start in file mode with nothing computed
    pub fn new(engine: DigestEngine, params: HashParameters) -> Self {
        Self {
            engine,
            state: Mutex::new(ControllerState {
                active: Mode::File,
                params,
                text: String::new(),
                selection: None,
                slots: ResultSlots::new(),
                display: DisplayState::new(Mode::File),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn display(&self) -> DisplayState {
        self.lock().display.clone()
    }

    pub fn active_mode(&self) -> Mode {
        self.lock().active
    }

    pub fn parameters(&self) -> HashParameters {
        self.lock().params
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    pub fn record(&self, mode: Mode) -> Option<ResultRecord> {
        self.lock().slots.get(mode).cloned()
    }

    pub fn is_pending(&self, mode: Mode) -> bool {
        self.lock().slots.is_pending(mode)
    }

    /// Remember the file to hash; does not start hashing
    pub fn select_file(&self, selection: Arc<dyn SourceOpener>) {
        let info = selection.info();
        let mut state = self.lock();
        state.display.file_label = Some(format_file_label(&info.name, info.size));
        state.selection = Some(selection);
    }

    pub fn clear_selection(&self) {
        let mut state = self.lock();
        state.display.file_label = None;
        state.selection = None;
    }

    /// Hash the selected file with the current parameters
    pub async fn hash_selected_file(&self) -> Completion {
        let (ticket, params, selection) = {
            let mut state = self.lock();
            state.display.error = None;
            let Some(selection) = state.selection.clone() else {
                state.display.error = Some(NO_FILE_MESSAGE.to_string());
                return Completion::NoInput;
            };
            if state.active == Mode::File {
                state.display.clear_output();
            }
            let ticket = state.slots.begin(Mode::File);
            state.display.busy = true;
            state.display.progress = Some(0.0);
            (ticket, state.params, selection)
        };

        let _busy = BusyGuard {
            controller: self,
            ticket,
        };
        let progress = DisplayProgress {
            controller: self,
            ticket,
        };

        let outcome = match selection.open().await {
            Ok(mut source) => {
                self.engine
                    .compute_file_digest(&mut source, params, &progress)
                    .await
            }
            Err(e) => Err(e),
        };

        self.settle(ticket, outcome)
    }

    /// Replace the string input and hash it
    pub async fn set_text(&self, text: impl Into<String>) -> Completion {
        self.lock().text = text.into();
        self.refresh_string().await
    }

    /// Change the parameters and recompute the active mode's input
    pub async fn set_parameters(&self, params: HashParameters) -> Completion {
        let (active, has_selection) = {
            let mut state = self.lock();
            state.params = params;
            (state.active, state.selection.is_some())
        };
        log::debug!("Parameters changed to {params}, refreshing {active} mode");

        match active {
            Mode::String => self.refresh_string().await,
            Mode::File if has_selection => self.hash_selected_file().await,
            Mode::File => Completion::NoInput,
        }
    }

    pub async fn set_revision(&self, revision: u32) -> Completion {
        let params = self.parameters().with_revision(revision);
        self.set_parameters(params).await
    }

    pub async fn set_output_bits(&self, output_bits: u32) -> Completion {
        let params = self.parameters().with_output_bits(output_bits);
        self.set_parameters(params).await
    }

    /// Make `mode` active, showing its record or computing one
    pub async fn switch_to(&self, mode: Mode) -> Completion {
        let has_selection = {
            let mut state = self.lock();
            state.active = mode;
            state.display.set_active(mode);

            if let Some(record) = state.slots.get(mode).cloned() {
                state.display.show_record(&record);
                return Completion::Rendered;
            }
            state.display.clear_output();
            if state.slots.is_pending(mode) {
                return Completion::InFlight;
            }
            state.selection.is_some()
        };

        match mode {
            Mode::String => self.refresh_string().await,
            Mode::File if has_selection => self.hash_selected_file().await,
            Mode::File => Completion::NoInput,
        }
    }

    /// Copy the shown digest; clipboard failures are ignored
    pub fn copy_output(&self, clipboard: &dyn Clipboard) -> bool {
        let text = self.lock().display.digest_hex.clone();
        if text.is_empty() {
            return false;
        }
        clipboard.write_text(&text).is_ok()
    }

    async fn refresh_string(&self) -> Completion {
        let (ticket, params, text) = {
            let mut state = self.lock();
            (state.slots.begin(Mode::String), state.params, state.text.clone())
        };

        let engine = self.engine.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            engine
                .compute_string_digest(&text, params)
                .map(ResultRecord::string)
        })
        .await
        .unwrap_or_else(|e| Err(InternalError::worker(&e.to_string()).into()));

        self.settle(ticket, outcome)
    }

    fn settle(&self, ticket: RequestTicket, outcome: Result<ResultRecord>) -> Completion {
        let mut state = self.lock();
        match outcome {
            Ok(record) => {
                if !state.slots.commit(ticket, record.clone()) {
                    return Completion::Superseded;
                }
                if state.active == ticket.mode() {
                    state.display.show_record(&record);
                    state.display.error = None;
                }
                Completion::Committed(record)
            }
            Err(e) => {
                if !state.slots.abandon(ticket) {
                    log::debug!("Ignoring failure of superseded {} request: {e}", ticket.mode());
                    return Completion::Superseded;
                }
                log::warn!("{} hash failed: {e}", ticket.mode());
                let message = format!("Error: {e}");
                state.display.error = Some(message.clone());
                Completion::Failed(message)
            }
        }
    }
}

/// Clears the busy indicator when a file request ends, however it ends
struct BusyGuard<'a> {
    controller: &'a DigestController,
    ticket: RequestTicket,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.controller.lock();
        // A newer file request owns the indicator
        if state.slots.is_current(self.ticket) {
            state.display.busy = false;
            state.display.progress = None;
        }
    }
}

/// Mirrors engine progress into the display for the current file request
struct DisplayProgress<'a> {
    controller: &'a DigestController,
    ticket: RequestTicket,
}

impl ProgressProvider for DisplayProgress<'_> {
    fn report(&self, update: ProgressUpdate) {
        if let Some(fraction) = update.fraction() {
            let mut state = self.controller.lock();
            if state.slots.is_current(self.ticket) {
                state.display.progress = Some(fraction);
            }
        }
    }
}
