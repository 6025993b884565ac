//! Client configuration types.
//!
//! [`ClientConfig`] holds every runtime setting of a session.  It is filled
//! in by `main.rs` from CLI arguments, or taken from one of the presets for
//! tests and embedders.  Nothing here reads the environment or a file.

use std::time::Duration;

use crate::domain::display::{DISCONNECTED_NOTICE, FORM_SERVER_DISCONNECTED_NOTICE};

/// Default size of one socket read, matching the server's 1024-byte chunks.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Prompt marker printed by the terminal front-end.
pub const DEFAULT_PROMPT: &str = "> ";

/// All runtime configuration for one client session.
///
/// # Example
///
/// ```rust
/// use bbs_client::domain::ClientConfig;
///
/// let cfg = ClientConfig::default();
/// assert_eq!(cfg.prompt, "> ");
/// assert_eq!(cfg.read_buffer_size, 1024);
/// assert!(cfg.connect_timeout.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Marker appended after every inbound chunk so the user sees a fresh
    /// prompt.  Empty for front-ends without a prompt line.
    pub prompt: String,

    /// Maximum number of bytes taken from the socket per read.  Each read is
    /// displayed as one unit.
    pub read_buffer_size: usize,

    /// Upper bound on the TCP handshake.
    ///
    /// `None` waits as long as the operating system does.  There is no read
    /// timeout: a silent server leaves the receive task blocked until the
    /// connection is closed.
    pub connect_timeout: Option<Duration>,

    /// Shown once when the server closes the connection.
    pub disconnected_notice: String,
}

impl ClientConfig {
    /// Preset for form-based front-ends: no prompt marker after inbound text
    /// and the form's wording for a server-side close.
    pub fn form() -> Self {
        Self {
            prompt: String::new(),
            disconnected_notice: FORM_SERVER_DISCONNECTED_NOTICE.to_string(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    /// | Field               | Default                 |
    /// |---------------------|-------------------------|
    /// | prompt              | `"> "`                  |
    /// | read_buffer_size    | 1024                    |
    /// | connect_timeout     | none                    |
    /// | disconnected_notice | `"server disconnected"` |
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            connect_timeout: None,
            disconnected_notice: DISCONNECTED_NOTICE.to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
