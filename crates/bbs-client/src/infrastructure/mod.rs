//! Infrastructure layer for bbs-client: everything that touches a socket or
//! the terminal.

pub mod connection;
pub mod receive_loop;
pub mod terminal;

pub use connection::{ConnectError, Connection, ConnectionReader, SendError};
pub use receive_loop::{ReceiveLoop, Termination};
pub use terminal::{run_terminal, TerminalSink};
