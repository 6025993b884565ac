//! The Receive Loop: forwards inbound server text to the display.
//!
//! # State machine
//!
//! ```text
//!            data (n > 0) → publish text + prompt
//!           ┌──────────┐
//!           ▼          │
//!       ┌─────────┐    │
//!  ───▶ │ Reading │ ───┘
//!       └─────────┘
//!           │  zero-length read   → disconnected notice    → Terminated(PeerClosed)
//!           │  read error         → (silent)               → Terminated(ReadFailed)
//!           └─ connection closed  → (silent)               → Terminated(LocallyClosed)
//! ```
//!
//! The loop only publishes to the display.  Releasing the connection and
//! clearing `running` after termination is the session's job (see
//! `application::session`), because that state is shared with the caller
//! path and must be updated under the session lock.
//!
//! # No framing
//!
//! Each successful read is treated as one complete unit of display text.
//! A server message split across two reads is shown as two pieces, and two
//! messages arriving in one read are shown together.

use std::sync::Arc;

use bbs_core::decode_text;
use tracing::debug;

use crate::domain::display::{DisplaySink, DISCONNECTED_NOTICE};
use crate::infrastructure::connection::{ConnectionReader, ReadEvent};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The server closed the connection.
    PeerClosed,
    /// A read failed.
    ReadFailed,
    /// The session closed the connection.
    LocallyClosed,
}

/// The two states of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveState {
    Reading,
    Terminated(Termination),
}

/// Reads from one connection until it ends.
pub struct ReceiveLoop {
    reader: ConnectionReader,
    sink: Arc<dyn DisplaySink>,
    prompt: String,
    disconnected_notice: String,
    buffer: Vec<u8>,
    label: String,
}

impl ReceiveLoop {
    /// Creates a loop reading `reader` in chunks of at most `buffer_size`
    /// bytes and publishing to `sink`.
    ///
    /// `label` only appears in log lines.
    pub fn new(
        reader: ConnectionReader,
        sink: Arc<dyn DisplaySink>,
        prompt: impl Into<String>,
        buffer_size: usize,
        label: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            sink,
            prompt: prompt.into(),
            disconnected_notice: DISCONNECTED_NOTICE.to_string(),
            buffer: vec![0u8; buffer_size.max(1)],
            label: label.into(),
        }
    }

    /// Replaces the text shown when the server closes the connection.
    pub fn with_disconnected_notice(mut self, notice: impl Into<String>) -> Self {
        self.disconnected_notice = notice.into();
        self
    }

    /// Runs the loop to completion and reports why it stopped.
    pub async fn run(mut self) -> Termination {
        let mut state = ReceiveState::Reading;
        loop {
            match state {
                ReceiveState::Reading => state = self.step().await,
                ReceiveState::Terminated(termination) => {
                    debug!("{}: receive loop terminated ({termination:?})", self.label);
                    return termination;
                }
            }
        }
    }

    /// Performs one read and returns the next state.
    async fn step(&mut self) -> ReceiveState {
        match self.reader.read(&mut self.buffer).await {
            ReadEvent::Data(n) => {
                let text = decode_text(&self.buffer[..n]);
                debug!("{}: received {n} bytes", self.label);
                self.sink.append(&with_prompt(&text, &self.prompt));
                ReceiveState::Reading
            }
            ReadEvent::PeerClosed => {
                self.sink.append(&self.disconnected_notice);
                ReceiveState::Terminated(Termination::PeerClosed)
            }
            ReadEvent::Failed(e) => {
                // Not surfaced to the user; further messages simply stop.
                debug!("{}: read failed: {e}", self.label);
                ReceiveState::Terminated(Termination::ReadFailed)
            }
            ReadEvent::LocallyClosed => ReceiveState::Terminated(Termination::LocallyClosed),
        }
    }
}

/// Appends the prompt marker on its own line after inbound text.
fn with_prompt(text: &str, prompt: &str) -> String {
    if prompt.is_empty() {
        text.to_string()
    } else {
        format!("{text}\n{prompt}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
