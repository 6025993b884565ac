//! Tokenizer for the terminal front-end's `%keyword` input syntax.
//!
//! # Input syntax
//!
//! ```text
//! %groupjoin teamA                         whitespace-separated arguments
//! %grouppost ; teamA ; Subject ; Body text  ';'-separated arguments
//! alice                                    anything else is free text
//! ```
//!
//! The first whitespace-delimited token picks the command.  The two posting
//! commands split on `;` instead, so subjects and bodies may contain spaces.
//! The first `;` segment (the keyword itself) is discarded and every other
//! segment is trimmed.
//!
//! A line whose first token is not a known keyword is returned unaltered as a
//! [`CommandTag::SendUsername`] command.  Whether that text is accepted as the
//! username or rejected as an unknown command is the session's decision, not
//! the tokenizer's.

use crate::domain::command::{Command, CommandTag};

/// Parses one line of terminal input.
///
/// Returns `None` when the line contains nothing but whitespace.
///
/// # Examples
///
/// ```rust
/// use bbs_core::{parse_line, CommandTag};
///
/// let cmd = parse_line("%post ; Hello ; World").unwrap();
/// assert_eq!(cmd.tag(), CommandTag::PostDefault);
/// assert_eq!(cmd.args(), ["Hello", "World"]);
/// ```
pub fn parse_line(line: &str) -> Option<Command> {
    let first = line.split_whitespace().next()?;

    let Some(tag) = CommandTag::from_keyword(first) else {
        return Some(Command::username(line));
    };

    let command = match tag {
        CommandTag::PostDefault | CommandTag::PostGroup => {
            Command::new(tag, line.split(';').skip(1).map(str::trim))
        }
        _ => Command::new(tag, line.split_whitespace().skip(1)),
    };
    Some(command)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
