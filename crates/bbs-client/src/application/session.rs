//! Session: the mutable state of one client run.
//!
//! # Shared state
//!
//! ```text
//!                     ┌──────────── Arc<Mutex<SessionState>> ────────────┐
//! caller path ──────▶ │ connection: Option<Connection>   (write side)    │
//! (connect, send,     │ running:    bool                                  │
//!  exit, disconnect)  │ username_sent: bool                               │
//!                     │ epoch:      u64   (bumped on every connect)       │
//! receive task ─────▶ └───────────────────────────────────────────────────┘
//! (release on termination, only if its epoch is still current)
//! ```
//!
//! Every transition of `connection`/`running` happens under the one lock, so
//! a connect racing a receive-failure close can never leave `running == true`
//! with no connection, or the other way round.  The epoch stops a receive
//! task from an older connection tearing down a newer one.
//!
//! The lock is a `tokio::sync::Mutex` because it is held across the socket
//! write; that also serialises concurrent senders.

use std::sync::Arc;

use bbs_core::{encode_request, encode_username, CodecError, Request, ValidationError};
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::config::ClientConfig;
use crate::domain::display::DisplaySink;
use crate::infrastructure::connection::{ConnectError, Connection, ConnectionReader, SendError};
use crate::infrastructure::receive_loop::{ReceiveLoop, Termination};

// ── Errors ────────────────────────────────────────────────────────────────────

/// Everything a session operation can fail with.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not connect to server: {0}")]
    Connect(#[from] ConnectError),
    #[error("send failed: {0}")]
    Send(#[from] SendError),
    #[error(transparent)]
    Encode(#[from] CodecError),
    #[error("not connected to server")]
    NotConnected,
    #[error("already connected")]
    AlreadyConnected,
    #[error("username already sent")]
    UsernameAlreadySent,
}

/// Connection status published to front-ends.
///
/// Form-based front-ends use it to enable the connect button again after
/// the server goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connected,
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SessionState {
    connection: Option<Connection>,
    running: bool,
    username_sent: bool,
    epoch: u64,
}

impl SessionState {
    /// Clears `running` and closes the connection, if any.
    ///
    /// Returns `true` if a connection was actually closed.
    async fn close(&mut self) -> bool {
        self.running = false;
        match self.connection.take() {
            Some(mut connection) => {
                connection.close().await;
                true
            }
            None => false,
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One client session.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Session {
    id: Uuid,
    config: Arc<ClientConfig>,
    sink: Arc<dyn DisplaySink>,
    state: Arc<Mutex<SessionState>>,
    status: Arc<watch::Sender<ConnectionStatus>>,
}

impl Session {
    /// Creates an unconnected session that displays through `sink`.
    pub fn new(config: ClientConfig, sink: Arc<dyn DisplaySink>) -> Self {
        let (status, _) = watch::channel(ConnectionStatus::Disconnected);
        Self {
            id: Uuid::new_v4(),
            config: Arc::new(config),
            sink,
            state: Arc::new(Mutex::new(SessionState::default())),
            status: Arc::new(status),
        }
    }

    /// Identifier used in this session's log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The configuration this session was created with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The display this session publishes to.
    pub fn sink(&self) -> &Arc<dyn DisplaySink> {
        &self.sink
    }

    /// Opens a connection and starts the receive task.
    ///
    /// The TCP handshake runs without holding the session lock.  `notice`,
    /// if given, is shown before the receive task starts, so it always
    /// precedes any text the server sends on accept.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AlreadyConnected`] if a connection is live.
    /// - [`SessionError::Connect`] if the handshake fails; the session is
    ///   left unconnected and the caller may try again.
    pub async fn connect(
        &self,
        host: &str,
        port: u16,
        notice: Option<&str>,
    ) -> Result<(), SessionError> {
        if self.is_connected().await {
            return Err(SessionError::AlreadyConnected);
        }
        let (connection, reader) = Connection::connect(host, port, self.config.connect_timeout)
            .await
            .map_err(|e| {
                warn!("session {}: {e}", self.id);
                e
            })?;
        self.attach(connection, reader, notice).await
    }

    /// Installs an already-open connection and starts its receive task.
    ///
    /// `notice` is appended to the display before the receive task is
    /// spawned.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyConnected`] if another connection
    /// became live in the meantime; the new one is closed.
    pub async fn attach(
        &self,
        mut connection: Connection,
        reader: ConnectionReader,
        notice: Option<&str>,
    ) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.connection.is_some() {
            drop(state);
            connection.close().await;
            return Err(SessionError::AlreadyConnected);
        }

        state.epoch += 1;
        let epoch = state.epoch;
        let peer = connection.peer().to_string();
        state.connection = Some(connection);
        state.running = true;
        state.username_sent = false;
        self.status.send_replace(ConnectionStatus::Connected);
        drop(state);

        info!("session {}: connected to {peer} (epoch {epoch})", self.id);
        if let Some(notice) = notice {
            self.sink.append(notice);
        }

        let receive_loop = ReceiveLoop::new(
            reader,
            Arc::clone(&self.sink),
            self.config.prompt.clone(),
            self.config.read_buffer_size,
            format!("session {}", self.id),
        )
        .with_disconnected_notice(self.config.disconnected_notice.clone());
        let session = self.clone();
        tokio::spawn(async move {
            let termination = receive_loop.run().await;
            session.release(epoch, termination).await;
        });
        Ok(())
    }

    /// Cleans up after the receive task for `epoch` stopped.
    async fn release(&self, epoch: u64, termination: Termination) {
        let mut state = self.state.lock().await;
        if state.epoch != epoch || state.connection.is_none() {
            // Already closed by the caller path, or a newer connection owns
            // the slot now.
            debug!(
                "session {}: stale receive task for epoch {epoch} finished ({termination:?})",
                self.id
            );
            return;
        }
        state.close().await;
        self.status.send_replace(ConnectionStatus::Disconnected);
        info!("session {}: connection lost ({termination:?})", self.id);
    }

    /// Encodes and sends a structured request.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotConnected`] without a connection, or
    /// [`SessionError::Send`] if the write fails.  A failed write leaves
    /// the session as it was; only the receive task detects a dead socket.
    pub async fn send_request(&self, request: &Request) -> Result<(), SessionError> {
        let bytes = encode_request(request)?;
        let mut state = self.state.lock().await;
        let connection = state.connection.as_mut().ok_or(SessionError::NotConnected)?;
        if let Err(e) = connection.send(&bytes).await {
            warn!("session {}: sending {} failed: {e}", self.id, request.keyword());
            return Err(e.into());
        }
        debug!("session {}: sent {}", self.id, request.keyword());
        Ok(())
    }

    /// Sends the raw username handshake.  Allowed once per connection.
    ///
    /// # Errors
    ///
    /// [`SessionError::UsernameAlreadySent`] on a second attempt,
    /// [`SessionError::NotConnected`] without a connection, or
    /// [`SessionError::Send`] if the write fails (the username then still
    /// counts as unsent).
    pub async fn send_username(&self, username: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.username_sent {
            return Err(SessionError::UsernameAlreadySent);
        }
        let connection = state.connection.as_mut().ok_or(SessionError::NotConnected)?;
        connection.send(&encode_username(username)).await?;
        state.username_sent = true;
        debug!("session {}: username sent", self.id);
        Ok(())
    }

    /// Tells the server we are leaving, then closes the connection.
    ///
    /// The local close happens whether or not the `%exit` write succeeded.
    /// Without a connection this does nothing.
    ///
    /// # Errors
    ///
    /// Returns the send failure, after the connection has been closed.
    pub async fn exit(&self) -> Result<(), SessionError> {
        let bytes = encode_request(&Request::Exit)?;
        let mut state = self.state.lock().await;
        let Some(connection) = state.connection.as_mut() else {
            debug!("session {}: exit without a connection", self.id);
            return Ok(());
        };
        let sent = connection.send(&bytes).await;
        state.close().await;
        self.status.send_replace(ConnectionStatus::Disconnected);
        drop(state);

        info!("session {}: exited", self.id);
        sent.map_err(Into::into)
    }

    /// Closes the connection without telling the server.
    ///
    /// Returns `true` if there was a connection to close.
    pub async fn disconnect(&self) -> bool {
        let mut state = self.state.lock().await;
        let closed = state.close().await;
        if closed {
            self.status.send_replace(ConnectionStatus::Disconnected);
            info!("session {}: disconnected", self.id);
        }
        closed
    }

    /// `true` while a connection is live.
    pub async fn is_running(&self) -> bool {
        self.state.lock().await.running
    }

    /// `true` while the session holds a connection.
    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.connection.is_some()
    }

    /// `true` once the username has been sent on the current connection.
    pub async fn username_sent(&self) -> bool {
        self.state.lock().await.username_sent
    }

    /// The current connection status.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Subscribes to connection status changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
