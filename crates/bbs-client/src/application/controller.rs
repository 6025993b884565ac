//! SessionController: turns one user action into at most one network write.
//!
//! ```text
//! raw input ─▶ parse_line ─▶ Command ─┬─ Connect       ─▶ Session::connect
//!                                     ├─ Exit          ─▶ Session::exit      ─▶ Flow::Exit
//!                                     ├─ SendUsername  ─▶ Session::send_username  (first time)
//!                                     │                   "command not found"     (afterwards)
//!                                     └─ everything else ─▶ Request::build ─▶ Session::send_request
//! ```
//!
//! Each call has at most one connection change, one byte write, and one
//! display notice.  Errors never escape: they are shown through the
//! session's [`DisplaySink`](crate::domain::DisplaySink) and the call
//! returns normally.

use bbs_core::{parse_line, Command, CommandTag, ConnectTarget, Request};
use tracing::debug;

use crate::application::session::{Session, SessionError};
use crate::domain::display::{EMPTY_INPUT_NOTICE, UNKNOWN_COMMAND_NOTICE};

/// What the front-end should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input.
    Continue,
    /// The user exited; stop the front-end's input loop.
    Exit,
}

/// Dispatches text commands against a [`Session`].
pub struct SessionController {
    session: Session,
}

impl SessionController {
    /// Creates a controller driving `session`.
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// The session this controller drives.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handles one line of raw terminal input.
    pub async fn handle(&self, raw_input: &str) -> Flow {
        match parse_line(raw_input) {
            Some(command) => self.dispatch(command).await,
            None => {
                self.notify(EMPTY_INPUT_NOTICE);
                Flow::Continue
            }
        }
    }

    /// Handles one parsed command.
    pub async fn dispatch(&self, command: Command) -> Flow {
        debug!(
            "session {}: dispatching {:?}",
            self.session.id(),
            command.tag()
        );
        match command.tag() {
            CommandTag::Connect => {
                self.connect(&command).await;
                Flow::Continue
            }
            CommandTag::Exit => self.exit(&command).await,
            CommandTag::SendUsername => {
                self.send_username(&command).await;
                Flow::Continue
            }
            _ => {
                self.send(&command).await;
                Flow::Continue
            }
        }
    }

    async fn connect(&self, command: &Command) {
        let target = match ConnectTarget::from_command(command) {
            Ok(target) => target,
            Err(e) => return self.notify(&e.to_string()),
        };
        let notice = format!("connected to {} on port {}", target.host, target.port);
        if let Err(e) = self
            .session
            .connect(&target.host, target.port, Some(&notice))
            .await
        {
            self.notify(&e.to_string());
        }
    }

    async fn exit(&self, command: &Command) -> Flow {
        if let Err(e) = Request::build(command) {
            self.notify(&e.to_string());
            return Flow::Continue;
        }
        if let Err(e) = self.session.exit().await {
            self.notify(&e.to_string());
        }
        Flow::Exit
    }

    async fn send_username(&self, command: &Command) {
        if self.session.username_sent().await {
            return self.notify(UNKNOWN_COMMAND_NOTICE);
        }
        let username = command.args().first().map(String::as_str).unwrap_or_default();
        match self.session.send_username(username).await {
            Ok(()) => {}
            Err(SessionError::UsernameAlreadySent) => self.notify(UNKNOWN_COMMAND_NOTICE),
            Err(e) => self.notify(&e.to_string()),
        }
    }

    async fn send(&self, command: &Command) {
        let result = match Request::build(command) {
            Ok(request) => self.session.send_request(&request).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            self.notify(&e.to_string());
        }
    }

    fn notify(&self, text: &str) {
        self.session.sink().append(text);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
