//! Domain module containing the command vocabulary and the terminal tokenizer.

pub mod command;
pub mod command_line;

pub use command::{Command, CommandTag, ConnectTarget, ValidationError};
pub use command_line::parse_line;
