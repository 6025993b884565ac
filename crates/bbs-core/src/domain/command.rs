//! Command vocabulary shared by every front-end.
//!
//! A [`Command`] is a parsed user intent: a [`CommandTag`] from a closed set
//! plus the raw string arguments the front-end collected for it.  Commands
//! are immutable and built fresh for every user action.
//!
//! Arguments stay as strings here on purpose.  Validation (arity, integer
//! parsing) happens when a command is turned into something the network
//! layer can use:
//!
//! - [`crate::protocol::Request::build`] for every command that produces a
//!   structured request.
//! - [`ConnectTarget::from_command`] for `%connect`, which only opens a socket.
//!
//! `SendUsername` is the odd one out: its single argument is written to the
//! socket verbatim during the handshake.

use thiserror::Error;

// ── Command tags ──────────────────────────────────────────────────────────────

/// The closed set of user intents understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandTag {
    /// `%connect <host> <port>` – open the TCP connection.
    Connect,
    /// `%join` – join the default group.
    JoinDefault,
    /// `%post ; <subject> ; <message>` – post to the default group.
    PostDefault,
    /// `%users` – list members of the default group.
    ListDefaultUsers,
    /// `%leave` – leave the default group.
    LeaveDefault,
    /// `%message <message_id>` – fetch one message from the default group.
    GetDefaultMessage,
    /// `%exit` – tell the server we are leaving and close the connection.
    Exit,
    /// `%groups` – list every group on the server.
    ListGroups,
    /// `%groupjoin <group_name>`
    JoinGroup,
    /// `%grouppost ; <groupname> ; <subject> ; <message>`
    PostGroup,
    /// `%groupusers <group_name>`
    ListGroupUsers,
    /// `%groupleave <group_name>`
    LeaveGroup,
    /// `%groupmessage <group_name> <message_id>`
    GetGroupMessage,
    /// Free text sent raw as the username handshake.
    SendUsername,
}

impl CommandTag {
    /// Every tag, in the order the terminal client documents them.
    pub const ALL: [CommandTag; 14] = [
        CommandTag::Connect,
        CommandTag::JoinDefault,
        CommandTag::PostDefault,
        CommandTag::ListDefaultUsers,
        CommandTag::LeaveDefault,
        CommandTag::GetDefaultMessage,
        CommandTag::Exit,
        CommandTag::ListGroups,
        CommandTag::JoinGroup,
        CommandTag::PostGroup,
        CommandTag::ListGroupUsers,
        CommandTag::LeaveGroup,
        CommandTag::GetGroupMessage,
        CommandTag::SendUsername,
    ];

    /// Looks up the tag for a terminal keyword such as `"%groupjoin"`.
    ///
    /// Returns `None` for anything outside the vocabulary.  `SendUsername`
    /// has no keyword and is never returned.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.keyword() == Some(keyword))
    }

    /// Returns the terminal keyword for this tag, if it has one.
    pub fn keyword(self) -> Option<&'static str> {
        let keyword = match self {
            CommandTag::Connect => "%connect",
            CommandTag::JoinDefault => "%join",
            CommandTag::PostDefault => "%post",
            CommandTag::ListDefaultUsers => "%users",
            CommandTag::LeaveDefault => "%leave",
            CommandTag::GetDefaultMessage => "%message",
            CommandTag::Exit => "%exit",
            CommandTag::ListGroups => "%groups",
            CommandTag::JoinGroup => "%groupjoin",
            CommandTag::PostGroup => "%grouppost",
            CommandTag::ListGroupUsers => "%groupusers",
            CommandTag::LeaveGroup => "%groupleave",
            CommandTag::GetGroupMessage => "%groupmessage",
            CommandTag::SendUsername => return None,
        };
        Some(keyword)
    }

    /// Returns the expected-usage text shown when arguments are malformed.
    pub fn usage(self) -> &'static str {
        match self {
            CommandTag::Connect => "%connect <host> <port>",
            CommandTag::JoinDefault => "%join",
            CommandTag::PostDefault => "%post ; <subject> ; <message>",
            CommandTag::ListDefaultUsers => "%users",
            CommandTag::LeaveDefault => "%leave",
            CommandTag::GetDefaultMessage => "%message <message_id>",
            CommandTag::Exit => "%exit",
            CommandTag::ListGroups => "%groups",
            CommandTag::JoinGroup => "%groupjoin <group_name>",
            CommandTag::PostGroup => "%grouppost ; <groupname> ; <subject> ; <message>",
            CommandTag::ListGroupUsers => "%groupusers <group_name>",
            CommandTag::LeaveGroup => "%groupleave <group_name>",
            CommandTag::GetGroupMessage => "%groupmessage <group_name> <message_id>",
            CommandTag::SendUsername => "<username>",
        }
    }

    /// Number of arguments the command takes.
    pub fn arity(self) -> usize {
        match self {
            CommandTag::JoinDefault
            | CommandTag::ListDefaultUsers
            | CommandTag::LeaveDefault
            | CommandTag::Exit
            | CommandTag::ListGroups => 0,
            CommandTag::GetDefaultMessage
            | CommandTag::JoinGroup
            | CommandTag::ListGroupUsers
            | CommandTag::LeaveGroup
            | CommandTag::SendUsername => 1,
            CommandTag::Connect | CommandTag::PostDefault | CommandTag::GetGroupMessage => 2,
            CommandTag::PostGroup => 3,
        }
    }

    /// Returns `true` if trailing arguments are dropped instead of rejected.
    ///
    /// `%exit` and `%groups` take no arguments, but `%exit bye` still exits
    /// and `%groups all` still lists the groups.
    pub fn ignores_extra_args(self) -> bool {
        matches!(self, CommandTag::Exit | CommandTag::ListGroups)
    }

    /// Returns `true` if the tag's group field is fixed to the default group.
    pub fn targets_default_group(self) -> bool {
        matches!(
            self,
            CommandTag::JoinDefault
                | CommandTag::PostDefault
                | CommandTag::ListDefaultUsers
                | CommandTag::LeaveDefault
                | CommandTag::GetDefaultMessage
        )
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// A command's arguments did not match what the command requires.
///
/// Validation never performs I/O and never produces a partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Wrong number of arguments, or a numeric argument failed to parse.
    #[error("usage: {}", .tag.usage())]
    Usage { tag: CommandTag },

    /// The command is valid but has no structured request encoding
    /// (`Connect` opens a socket, `SendUsername` is written raw).
    #[error("{tag:?} has no structured request encoding")]
    NoWirePayload { tag: CommandTag },
}

impl ValidationError {
    /// Convenience constructor for [`ValidationError::Usage`].
    pub fn usage(tag: CommandTag) -> Self {
        ValidationError::Usage { tag }
    }
}

// ── Command ───────────────────────────────────────────────────────────────────

/// A parsed user intent: a tag plus its raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    tag: CommandTag,
    args: Vec<String>,
}

impl Command {
    /// Creates a command from a tag and its arguments.
    pub fn new<I, S>(tag: CommandTag, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tag,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates the raw username handshake command.
    pub fn username(text: impl Into<String>) -> Self {
        Self {
            tag: CommandTag::SendUsername,
            args: vec![text.into()],
        }
    }

    /// The command's tag.
    pub fn tag(&self) -> CommandTag {
        self.tag
    }

    /// The command's arguments, in the order the front-end supplied them.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns the arguments if their count matches the tag's arity.
    ///
    /// For tags that [ignore extra arguments](CommandTag::ignores_extra_args)
    /// only the first `arity` arguments are returned.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Usage`] when the count is wrong.
    pub fn expect_args(&self) -> Result<&[String], ValidationError> {
        let arity = self.tag.arity();
        match self.args.len() {
            n if n == arity => Ok(&self.args),
            n if n > arity && self.tag.ignores_extra_args() => Ok(&self.args[..arity]),
            _ => Err(ValidationError::usage(self.tag)),
        }
    }
}

// ── Connect target ────────────────────────────────────────────────────────────

/// The validated `host`/`port` pair of a `%connect` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub host: String,
    pub port: u16,
}

impl ConnectTarget {
    /// Validates a `Connect` command.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Usage`] if the command is not `Connect`,
    /// does not have exactly two arguments, or the port is not a valid
    /// 16-bit port number.
    pub fn from_command(command: &Command) -> Result<Self, ValidationError> {
        if command.tag() != CommandTag::Connect {
            return Err(ValidationError::usage(CommandTag::Connect));
        }
        let [host, port] = command.expect_args()? else {
            return Err(ValidationError::usage(CommandTag::Connect));
        };
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ValidationError::usage(CommandTag::Connect))?;
        Ok(Self {
            host: host.clone(),
            port,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
