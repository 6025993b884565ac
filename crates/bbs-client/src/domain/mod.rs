//! Domain layer for bbs-client.
//!
//! Plain types with no dependency on sockets or the async runtime:
//!
//! - Runtime configuration ([`ClientConfig`])
//! - The display seam every front-end implements ([`DisplaySink`])

pub mod config;
pub mod display;

pub use config::ClientConfig;
pub use display::{DisplaySink, RecordingSink};
