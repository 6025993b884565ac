//! FormController: the actions behind a form-based front-end's buttons.
//!
//! A GUI toolkit owns the widgets; this type owns what the buttons do.  Each
//! method takes the raw field contents, validates them, and either returns a
//! [`FormError`] (which the front-end shows as a dialog) or performs the
//! action and reports progress through the session's display sink.
//!
//! ```text
//! [Connect]   host, port, username ─▶ connect ─▶ "Connected to h:p"
//!                                             └▶ username ─▶ "Username 'u' sent to server."
//! [Join]      group                ─▶ %groupjoin
//! [Leave]     group                ─▶ %groupleave
//! [Users]     group                ─▶ %groupusers
//! [Groups]                         ─▶ %groups
//! [Post]      group, subject, body ─▶ %grouppost
//! [Get]       group, message id    ─▶ %groupmessage
//! [Exit]                           ─▶ %exit, then disconnect
//! [Disconnect]                     ─▶ local close only
//! window close                     ─▶ best-effort %exit, then close
//! ```
//!
//! Unlike the terminal, the username is sent as soon as the connection is
//! up, so free text never reaches this controller.

use bbs_core::Request;
use thiserror::Error;
use tracing::debug;

use crate::application::session::{Session, SessionError};
use crate::infrastructure::connection::ConnectError;

/// Shown once when the form opens.
pub const FORM_GREETING: &str = "Fill in host/port/username and press Connect.";

/// Shown after an explicit disconnect or exit.
pub const FORM_DISCONNECTED_NOTICE: &str = "Disconnected from server.";

/// Errors shown to the user as a dialog.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Already connected.")]
    AlreadyConnected,
    #[error("Host, port, and username are required.")]
    MissingConnectFields,
    #[error("Port must be an integer.")]
    InvalidPort,
    #[error("Could not connect: {0}")]
    CouldNotConnect(#[source] ConnectError),
    #[error("Not connected to server.")]
    NotConnected,
    #[error("Group name is required.")]
    MissingGroup,
    #[error("Group, subject, and message are required.")]
    MissingPostFields,
    #[error("Group and message ID are required.")]
    MissingMessageFields,
    #[error("Message ID must be an integer.")]
    InvalidMessageId,
    #[error(transparent)]
    Session(SessionError),
}

impl From<SessionError> for FormError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::AlreadyConnected => Self::AlreadyConnected,
            SessionError::NotConnected => Self::NotConnected,
            SessionError::Connect(inner) => Self::CouldNotConnect(inner),
            other => Self::Session(other),
        }
    }
}

/// Contents of the connect form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectForm {
    pub host: String,
    pub port: String,
    pub username: String,
}

impl ConnectForm {
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            username: username.into(),
        }
    }
}

/// Button actions of a form-based front-end.
pub struct FormController {
    session: Session,
}

impl FormController {
    /// Creates a controller and shows the greeting.
    ///
    /// The session should use [`ClientConfig::form`](crate::domain::ClientConfig::form)
    /// so inbound text is shown without a prompt marker.
    pub fn new(session: Session) -> Self {
        session.sink().append(FORM_GREETING);
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Connects and immediately sends the username.
    ///
    /// # Errors
    ///
    /// Validation failures, [`FormError::AlreadyConnected`], and
    /// [`FormError::CouldNotConnect`].  A failed username write is only
    /// reported on the display; the connection stays up.
    pub async fn connect(&self, form: &ConnectForm) -> Result<(), FormError> {
        if self.session.is_connected().await {
            return Err(FormError::AlreadyConnected);
        }

        let host = form.host.trim();
        let port = form.port.trim();
        let username = form.username.trim();
        if host.is_empty() || port.is_empty() || username.is_empty() {
            return Err(FormError::MissingConnectFields);
        }
        let port: u16 = port.parse().map_err(|_| FormError::InvalidPort)?;

        let notice = format!("Connected to {host}:{port}");
        self.session.connect(host, port, Some(&notice)).await?;

        match self.session.send_username(username).await {
            Ok(()) => self.notify(&format!("Username '{username}' sent to server.")),
            Err(e) => self.notify(&format!("Error sending username: {e}")),
        }
        Ok(())
    }

    /// `%groupjoin` for the group field.
    pub async fn join_group(&self, group: &str) -> Result<(), FormError> {
        let group = required_group(group)?;
        self.send(Request::GroupJoin { group }).await
    }

    /// `%groupleave` for the group field.
    pub async fn leave_group(&self, group: &str) -> Result<(), FormError> {
        let group = required_group(group)?;
        self.send(Request::GroupLeave { group }).await
    }

    /// `%groupusers` for the group field.
    pub async fn list_users(&self, group: &str) -> Result<(), FormError> {
        let group = required_group(group)?;
        self.send(Request::GroupUsers { group }).await
    }

    pub async fn list_groups(&self) -> Result<(), FormError> {
        self.send(Request::Groups).await
    }

    /// `%grouppost`; every field is trimmed and must be non-empty.
    pub async fn post(&self, group: &str, subject: &str, message: &str) -> Result<(), FormError> {
        let (group, subject, message) = (group.trim(), subject.trim(), message.trim());
        if group.is_empty() || subject.is_empty() || message.is_empty() {
            return Err(FormError::MissingPostFields);
        }
        self.send(Request::GroupPost {
            group: group.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        })
        .await
    }

    /// `%groupmessage`; the id field must hold an integer.
    pub async fn get_message(&self, group: &str, message_id: &str) -> Result<(), FormError> {
        let (group, message_id) = (group.trim(), message_id.trim());
        if group.is_empty() || message_id.is_empty() {
            return Err(FormError::MissingMessageFields);
        }
        let message_id: i32 = message_id
            .parse()
            .map_err(|_| FormError::InvalidMessageId)?;
        self.send(Request::GroupMessage {
            group: group.to_string(),
            message_id,
        })
        .await
    }

    /// Sends `%exit` and disconnects.
    ///
    /// The disconnect notice is shown even when there was no connection, in
    /// which case [`FormError::NotConnected`] is returned as well.
    pub async fn exit_server(&self) -> Result<(), FormError> {
        let was_connected = self.session.is_connected().await;
        if let Err(e) = self.session.exit().await {
            self.report_send_failure(e)?;
        }
        self.notify(FORM_DISCONNECTED_NOTICE);
        if was_connected {
            Ok(())
        } else {
            Err(FormError::NotConnected)
        }
    }

    /// Closes the connection without telling the server.
    pub async fn disconnect(&self) {
        self.session.disconnect().await;
        self.notify(FORM_DISCONNECTED_NOTICE);
    }

    /// Window close: tries to send `%exit`, then closes.  Never fails.
    pub async fn close(&self) {
        if let Err(e) = self.session.exit().await {
            debug!("session {}: exit on close failed: {e}", self.session.id());
        }
    }

    async fn send(&self, request: Request) -> Result<(), FormError> {
        match self.session.send_request(&request).await {
            Ok(()) => Ok(()),
            Err(e) => self.report_send_failure(e),
        }
    }

    /// Write failures go to the display; everything else is a dialog.
    fn report_send_failure(&self, e: SessionError) -> Result<(), FormError> {
        match e {
            SessionError::Send(inner) => {
                self.notify(&format!("Send error: {inner}"));
                Ok(())
            }
            SessionError::Encode(inner) => {
                self.notify(&format!("Send error: {inner}"));
                Ok(())
            }
            other => Err(other.into()),
        }
    }

    fn notify(&self, text: &str) {
        self.session.sink().append(text);
    }
}

fn required_group(group: &str) -> Result<String, FormError> {
    match group.trim() {
        "" => Err(FormError::MissingGroup),
        group => Ok(group.to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
