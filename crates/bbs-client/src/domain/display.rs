//! The Display Sink: where incoming text and user-facing notices go.
//!
//! The engine never renders anything itself.  Every front-end supplies one
//! [`DisplaySink`] and the engine calls [`DisplaySink::append`] from two
//! places:
//!
//! - the caller-driven path, for usage errors and connection notices;
//! - the receive task, for inbound server text and the disconnection notice.
//!
//! Because the second caller runs on a Tokio worker thread, implementations
//! must be `Send + Sync` and must not block for long.

use std::sync::Mutex;

/// Shown once when the server closes the connection (terminal wording).
pub const DISCONNECTED_NOTICE: &str = "server disconnected";

/// Shown once when the server closes the connection (form wording).
pub const FORM_SERVER_DISCONNECTED_NOTICE: &str = "Server disconnected.";

/// Shown for free text once the username has already been sent.
pub const UNKNOWN_COMMAND_NOTICE: &str = "command not found";

/// Shown for blank input.
pub const EMPTY_INPUT_NOTICE: &str = "no valid command found";

/// A thread-safe "append text" callable provided by the front-end.
#[cfg_attr(test, mockall::automock)]
pub trait DisplaySink: Send + Sync {
    /// Appends `text` to the display.
    fn append(&self, text: &str);
}

/// A sink that keeps every appended text in memory.
///
/// Used by the tests and by embedders that want to poll for output instead
/// of rendering it immediately.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything appended so far, oldest first.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of `append` calls whose text equals `text`.
    pub fn count(&self, text: &str) -> usize {
        self.lines().iter().filter(|line| *line == text).count()
    }
}

impl DisplaySink for RecordingSink {
    fn append(&self, text: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(text.to_string());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        // Arrange
        let sink = RecordingSink::new();

        // Act
        sink.append("first");
        sink.append("second");

        // Assert
        assert_eq!(sink.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_recording_sink_count() {
        let sink = RecordingSink::new();
        sink.append(DISCONNECTED_NOTICE);
        sink.append("other");
        sink.append(DISCONNECTED_NOTICE);
        assert_eq!(sink.count(DISCONNECTED_NOTICE), 2);
        assert_eq!(sink.count("missing"), 0);
    }

    #[test]
    fn test_recording_sink_is_usable_as_trait_object() {
        let sink: std::sync::Arc<dyn DisplaySink> = std::sync::Arc::new(RecordingSink::new());
        sink.append("x");
    }
}
