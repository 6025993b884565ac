//! Wire codec for the two payload shapes that share the socket.
//!
//! Wire format:
//! ```text
//! username handshake:  <raw UTF-8 text>                    (once per connection)
//! every other request: {"command":"%...", <fields>...}     (compact JSON object)
//! ```
//!
//! There is no length prefix and no delimiter.  Each payload is written as a
//! single unstructured byte sequence and the server treats whatever one
//! `recv` returns as one request.  Inbound data is likewise opaque display
//! text with no structure.

use thiserror::Error;

use crate::protocol::request::Request;

/// Errors that can occur while encoding a request.
#[derive(Debug, Error)]
pub enum CodecError {
    /// serde_json rejected the request.
    #[error("failed to serialise request: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encodes a [`Request`] as a single compact JSON object.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
///
/// # Examples
///
/// ```rust
/// use bbs_core::{encode_request, Request};
///
/// let bytes = encode_request(&Request::Groups).unwrap();
/// assert_eq!(bytes, br#"{"command":"%groups"}"#);
/// ```
pub fn encode_request(request: &Request) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(request)?)
}

/// Encodes the username handshake: the literal text, no trailing newline.
pub fn encode_username(username: &str) -> Vec<u8> {
    username.as_bytes().to_vec()
}

/// Decodes one inbound chunk as display text.
///
/// Undecodable bytes are replaced with U+FFFD rather than treated as an
/// error.  A multi-byte character split across two reads therefore shows up
/// as replacement characters; each read is displayed on its own.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
