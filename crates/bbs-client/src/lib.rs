//! bbs-client library crate.
//!
//! The client session protocol engine for the bulletin-board protocol, plus
//! the terminal front-end that drives it.
//!
//! # Architecture
//!
//! ```text
//! front-end (terminal prompt / form callbacks)
//!         │  handle(raw input)
//!         ▼
//! [bbs-client]
//!   ├── domain/           ClientConfig, DisplaySink
//!   ├── application/
//!   │     ├── session/    Session state: connection, running, username_sent
//!   │     ├── controller/ Text-command dispatch (SessionController::handle)
//!   │     └── form/       Form-flavour actions (FormController)
//!   └── infrastructure/
//!         ├── connection/   TCP socket: connect / send / close
//!         ├── receive_loop/ Background reader → DisplaySink
//!         └── terminal/     stdin prompt loop and stdout sink
//!         │
//!         ▼
//! bulletin-board server (TCP)
//! ```
//!
//! Two paths share a [`application::Session`]: the caller-driven path owns
//! every write, and one receive task per connection owns every read.  The
//! only state they share is the connection slot and the `running` flag,
//! both guarded by the same lock.

/// Domain layer: configuration and the display seam (no I/O).
pub mod domain;

/// Application layer: session state and command dispatch.
pub mod application;

/// Infrastructure layer: socket, receive loop, and terminal front-end.
pub mod infrastructure;
