//! The Request Model: structured requests sent to the bulletin-board server.
//!
//! Every request is a single JSON object with a mandatory `"command"` field
//! naming the operation.  All other fields are flattened into the same
//! object:
//!
//! ```json
//! {"command":"%groupjoin","group":"teamA"}
//! {"command":"%grouppost","group":"default","subject":"Hello","message":"World"}
//! {"command":"%groupmessage","group":"teamA","message_id":42}
//! {"command":"%groups"}
//! ```
//!
//! Serde's `#[serde(tag = "command")]` produces exactly this shape from the
//! tagged enum, so the untyped mapping only exists at the I/O boundary.
//!
//! # Default-group sugar
//!
//! `%join`, `%post`, `%users`, `%leave` and `%message` never reach the wire
//! under their own names.  [`Request::build`] rewrites them into their
//! `%group*` counterparts with `group` fixed to [`DEFAULT_GROUP`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::command::{Command, CommandTag, ValidationError};

/// Name of the group targeted by the default-group sugar commands.
pub const DEFAULT_GROUP: &str = "default";

/// A wire-level request, one variant per recognised `command` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Request {
    /// Join a group.
    #[serde(rename = "%groupjoin")]
    GroupJoin { group: String },

    /// Post a message to a group.
    #[serde(rename = "%grouppost")]
    GroupPost {
        group: String,
        subject: String,
        message: String,
    },

    /// List the members of a group.
    #[serde(rename = "%groupusers")]
    GroupUsers { group: String },

    /// Leave a group.
    #[serde(rename = "%groupleave")]
    GroupLeave { group: String },

    /// Fetch one message from a group by id.
    ///
    /// The server reads the id as a C `int`, hence `i32`.
    #[serde(rename = "%groupmessage")]
    GroupMessage { group: String, message_id: i32 },

    /// List every group on the server.
    #[serde(rename = "%groups")]
    Groups,

    /// Tell the server the user is leaving so it can drop their memberships.
    #[serde(rename = "%exit")]
    Exit,
}

impl Request {
    /// Validates a [`Command`] and maps it to its wire request.
    ///
    /// This is a pure function: it performs no I/O and either returns a
    /// complete request or nothing at all.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::Usage`] if the argument count is wrong or a
    ///   message id is not an integer.
    /// - [`ValidationError::NoWirePayload`] for `Connect` and `SendUsername`,
    ///   which never produce a structured request.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bbs_core::{Command, CommandTag, Request};
    ///
    /// let cmd = Command::new(CommandTag::PostDefault, ["Hello", "World"]);
    /// let req = Request::build(&cmd).unwrap();
    /// assert_eq!(
    ///     req,
    ///     Request::GroupPost {
    ///         group: "default".into(),
    ///         subject: "Hello".into(),
    ///         message: "World".into(),
    ///     }
    /// );
    /// ```
    pub fn build(command: &Command) -> Result<Self, ValidationError> {
        let tag = command.tag();
        if matches!(tag, CommandTag::Connect | CommandTag::SendUsername) {
            return Err(ValidationError::NoWirePayload { tag });
        }

        let args = command.expect_args()?;

        // Sugar commands carry one argument fewer than their `%group*`
        // counterparts; splice the default group in front so both share the
        // same field mapping below.
        let mut fields: Vec<String> = Vec::with_capacity(args.len() + 1);
        if tag.targets_default_group() {
            fields.push(DEFAULT_GROUP.to_string());
        }
        fields.extend(args.iter().cloned());

        let request = match (tag, fields.as_slice()) {
            (CommandTag::JoinDefault | CommandTag::JoinGroup, [group]) => Request::GroupJoin {
                group: group.clone(),
            },
            (CommandTag::PostDefault | CommandTag::PostGroup, [group, subject, message]) => {
                Request::GroupPost {
                    group: group.clone(),
                    subject: subject.clone(),
                    message: message.clone(),
                }
            }
            (CommandTag::ListDefaultUsers | CommandTag::ListGroupUsers, [group]) => {
                Request::GroupUsers {
                    group: group.clone(),
                }
            }
            (CommandTag::LeaveDefault | CommandTag::LeaveGroup, [group]) => Request::GroupLeave {
                group: group.clone(),
            },
            (CommandTag::GetDefaultMessage | CommandTag::GetGroupMessage, [group, id]) => {
                let message_id = id
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| ValidationError::usage(tag))?;
                Request::GroupMessage {
                    group: group.clone(),
                    message_id,
                }
            }
            (CommandTag::ListGroups, []) => Request::Groups,
            (CommandTag::Exit, []) => Request::Exit,
            _ => return Err(ValidationError::usage(tag)),
        };

        debug!("built {} request", request.keyword());
        Ok(request)
    }

    /// Returns the wire `command` value of this request.
    ///
    /// Used in log messages so that subjects and message bodies are never
    /// logged.
    pub fn keyword(&self) -> &'static str {
        match self {
            Request::GroupJoin { .. } => "%groupjoin",
            Request::GroupPost { .. } => "%grouppost",
            Request::GroupUsers { .. } => "%groupusers",
            Request::GroupLeave { .. } => "%groupleave",
            Request::GroupMessage { .. } => "%groupmessage",
            Request::Groups => "%groups",
            Request::Exit => "%exit",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn build(tag: CommandTag, args: &[&str]) -> Result<Request, ValidationError> {
        Request::build(&Command::new(tag, args.iter().copied()))
    }

    #[test]
    fn test_join_default_uses_default_group() {
        assert_eq!(
            build(CommandTag::JoinDefault, &[]),
            Ok(Request::GroupJoin {
                group: "default".to_string()
            })
        );
    }

    #[test]
    fn test_post_default_builds_grouppost() {
        // Arrange / Act
        let req = build(CommandTag::PostDefault, &["Hello", "World"]).unwrap();

        // Assert
        assert_eq!(
            req,
            Request::GroupPost {
                group: "default".to_string(),
                subject: "Hello".to_string(),
                message: "World".to_string(),
            }
        );
    }

    #[test]
    fn test_users_and_leave_default() {
        assert_eq!(
            build(CommandTag::ListDefaultUsers, &[]).unwrap(),
            Request::GroupUsers {
                group: DEFAULT_GROUP.to_string()
            }
        );
        assert_eq!(
            build(CommandTag::LeaveDefault, &[]).unwrap(),
            Request::GroupLeave {
                group: DEFAULT_GROUP.to_string()
            }
        );
    }

    #[test]
    fn test_message_default_parses_id() {
        assert_eq!(
            build(CommandTag::GetDefaultMessage, &["7"]).unwrap(),
            Request::GroupMessage {
                group: DEFAULT_GROUP.to_string(),
                message_id: 7
            }
        );
    }

    #[test]
    fn test_groupmessage_parses_group_and_id() {
        assert_eq!(
            build(CommandTag::GetGroupMessage, &["teamA", "42"]).unwrap(),
            Request::GroupMessage {
                group: "teamA".to_string(),
                message_id: 42
            }
        );
    }

    #[test]
    fn test_groupmessage_non_integer_id_is_usage_error() {
        assert_eq!(
            build(CommandTag::GetGroupMessage, &["teamA", "forty-two"]),
            Err(ValidationError::usage(CommandTag::GetGroupMessage))
        );
    }

    #[test]
    fn test_message_id_out_of_i32_range_is_usage_error() {
        assert!(build(CommandTag::GetDefaultMessage, &["99999999999"]).is_err());
    }

    #[test]
    fn test_named_group_commands() {
        assert_eq!(
            build(CommandTag::JoinGroup, &["teamA"]).unwrap(),
            Request::GroupJoin {
                group: "teamA".to_string()
            }
        );
        assert_eq!(
            build(CommandTag::ListGroupUsers, &["teamA"]).unwrap(),
            Request::GroupUsers {
                group: "teamA".to_string()
            }
        );
        assert_eq!(
            build(CommandTag::LeaveGroup, &["teamA"]).unwrap(),
            Request::GroupLeave {
                group: "teamA".to_string()
            }
        );
        assert_eq!(
            build(CommandTag::PostGroup, &["teamA", "S", "M"]).unwrap(),
            Request::GroupPost {
                group: "teamA".to_string(),
                subject: "S".to_string(),
                message: "M".to_string(),
            }
        );
    }

    #[test]
    fn test_groups_and_exit_ignore_trailing_arguments() {
        assert_eq!(build(CommandTag::ListGroups, &[]), Ok(Request::Groups));
        assert_eq!(build(CommandTag::Exit, &[]), Ok(Request::Exit));
        assert_eq!(build(CommandTag::ListGroups, &["all"]), Ok(Request::Groups));
        assert_eq!(build(CommandTag::Exit, &["bye", "now"]), Ok(Request::Exit));
    }

    #[test]
    fn test_every_fixed_arity_command_rejects_an_extra_argument() {
        // Arrange: every tag that produces a request and checks its arity
        let tags = CommandTag::ALL.into_iter().filter(|t| {
            !matches!(t, CommandTag::Connect | CommandTag::SendUsername) && !t.ignores_extra_args()
        });

        for tag in tags {
            // Act: one argument too many
            let args = vec!["x"; tag.arity() + 1];
            let result = build(tag, &args);

            // Assert
            assert_eq!(result, Err(ValidationError::usage(tag)), "{tag:?}");
        }
    }

    #[test]
    fn test_connect_and_username_have_no_wire_payload() {
        assert_eq!(
            build(CommandTag::Connect, &["h", "1"]),
            Err(ValidationError::NoWirePayload {
                tag: CommandTag::Connect
            })
        );
        assert_eq!(
            Request::build(&Command::username("alice")),
            Err(ValidationError::NoWirePayload {
                tag: CommandTag::SendUsername
            })
        );
    }

    #[test]
    fn test_keyword_matches_serialized_command_field() {
        // Arrange
        let req = Request::GroupLeave {
            group: "g".to_string(),
        };

        // Act
        let value = serde_json::to_value(&req).unwrap();

        // Assert
        assert_eq!(value["command"], req.keyword());
    }
}
