//! # bbs-core
//!
//! Shared library for the bulletin-board client containing the command
//! vocabulary, the request model, and the wire codec.
//!
//! It has zero dependencies on sockets, async runtimes, or UI frameworks, so
//! every front-end (terminal prompt, form-based UI) can reuse the same
//! validation and encoding rules.
//!
//! # Architecture overview
//!
//! A user action flows through this crate in three steps:
//!
//! ```text
//! "%groupjoin teamA"                     (raw terminal input)
//!     │  domain::command_line::parse_line
//!     ▼
//! Command { tag: JoinGroup, args: ["teamA"] }
//!     │  protocol::Request::build
//!     ▼
//! Request::GroupJoin { group: "teamA" }
//!     │  protocol::codec::encode_request
//!     ▼
//! {"command":"%groupjoin","group":"teamA"}  (bytes on the socket)
//! ```
//!
//! - **`domain`** – What the user asked for: the closed set of command tags,
//!   their usage text, and the terminal tokenizer.
//! - **`protocol`** – What travels over the network: the tagged `Request`
//!   enum and the functions that turn it (and the one-off username
//!   handshake) into bytes.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `bbs_core::Request` instead of `bbs_core::protocol::request::Request`.
pub use domain::command::{Command, CommandTag, ConnectTarget, ValidationError};
pub use domain::command_line::parse_line;
pub use protocol::codec::{decode_text, encode_request, encode_username, CodecError};
pub use protocol::request::{Request, DEFAULT_GROUP};
