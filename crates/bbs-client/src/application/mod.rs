//! Application layer for bbs-client.
//!
//! - [`Session`] owns the connection state shared with the receive task.
//! - [`SessionController`] dispatches terminal-style text commands.
//! - [`FormController`] backs the buttons of a form-based front-end.

pub mod controller;
pub mod form;
pub mod session;

pub use controller::{Flow, SessionController};
pub use form::{ConnectForm, FormController, FormError};
pub use session::{ConnectionStatus, Session, SessionError};
