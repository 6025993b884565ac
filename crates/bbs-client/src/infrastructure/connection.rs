//! TCP connection to the bulletin-board server.
//!
//! A successful [`Connection::connect`] returns two handles to one socket:
//!
//! - [`Connection`] – the write side, owned by the session.  `send` and
//!   `close` go through it.
//! - [`ConnectionReader`] – the read side, moved into the receive task.
//!
//! Reads and writes are independent directions on the same stream and never
//! wait on each other.  A TCP stream is split with
//! [`TcpStream::into_split`], which needs no lock between the halves; other
//! streams go through `tokio::io::split`.
//!
//! # Closing
//!
//! Dropping the write half of a split stream does not wake a task blocked in
//! `read()`.  [`Connection::close`] therefore also fires a one-shot signal
//! that the reader races against every read, so a local close always ends
//! the receive task promptly.  Dropping a `Connection` without calling
//! `close` has the same effect on the reader.
//!
//! # Portability note
//!
//! Only `tokio::net::TcpStream` and `tokio::io` are used, so behaviour is the
//! same on Windows, Linux, and macOS.

use std::io;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tracing::debug;

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

// ── Errors ────────────────────────────────────────────────────────────────────

/// The TCP connection could not be established.
///
/// Covers name resolution failures, refused connections, and the optional
/// handshake timeout.  No retry is attempted.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("failed to connect to {addr}: {source}")]
    Io {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("timed out connecting to {addr} after {timeout:?}")]
    TimedOut { addr: String, timeout: Duration },
}

/// A write to the server failed.
#[derive(Debug, Error)]
pub enum SendError {
    /// The connection has already been closed locally.
    #[error("connection is closed")]
    Closed,
    /// The operating system rejected the write (e.g. broken pipe).
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of one [`ConnectionReader::read`] call.
#[derive(Debug)]
pub enum ReadEvent {
    /// `n > 0` bytes were placed at the start of the buffer.
    Data(usize),
    /// The peer closed its side (zero-length read).
    PeerClosed,
    /// The read itself failed.
    Failed(io::Error),
    /// [`Connection::close`] was called, or the `Connection` was dropped.
    LocallyClosed,
}

// ── Write side ────────────────────────────────────────────────────────────────

/// The write side of the server connection.
pub struct Connection {
    peer: String,
    writer: Option<BoxedWriter>,
    closed_tx: Option<oneshot::Sender<()>>,
}

impl Connection {
    /// Opens a TCP connection to `host:port`.
    ///
    /// `host` may be a name or an IP address.  When `timeout` is `Some`, the
    /// handshake is abandoned after that long.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError`] if the address cannot be resolved, the
    /// server refuses the connection, or the timeout elapses.
    pub async fn connect(
        host: &str,
        port: u16,
        timeout: Option<Duration>,
    ) -> Result<(Self, ConnectionReader), ConnectError> {
        let addr = format!("{host}:{port}");
        let attempt = TcpStream::connect((host, port));

        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, attempt)
                .await
                .map_err(|_| ConnectError::TimedOut {
                    addr: addr.clone(),
                    timeout: limit,
                })?,
            None => attempt.await,
        };
        let stream = result.map_err(|source| ConnectError::Io {
            addr: addr.clone(),
            source,
        })?;

        debug!("TCP connection established to {addr}");
        let (read_half, write_half) = stream.into_split();
        Ok(Self::from_halves(
            Box::new(read_half),
            Box::new(write_half),
            addr,
        ))
    }

    /// Wraps an already-open byte stream.
    ///
    /// Tests use this with `tokio::io::duplex` and mock streams.
    pub fn from_stream<S>(stream: S, peer: impl Into<String>) -> (Self, ConnectionReader)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        Self::from_halves(Box::new(read_half), Box::new(write_half), peer.into())
    }

    fn from_halves(
        read_half: BoxedReader,
        write_half: BoxedWriter,
        peer: String,
    ) -> (Self, ConnectionReader) {
        let (closed_tx, closed_rx) = oneshot::channel();

        let connection = Self {
            peer,
            writer: Some(write_half),
            closed_tx: Some(closed_tx),
        };
        let reader = ConnectionReader {
            reader: read_half,
            closed_rx,
        };
        (connection, reader)
    }

    /// The `host:port` (or label) this connection was opened to.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Returns `true` once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    /// Writes the whole byte sequence and flushes it.
    ///
    /// The bytes are written as one unstructured unit; there is no framing.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Closed`] after `close`, or [`SendError::Io`] if
    /// the socket is broken.  A failed send does not close the connection.
    pub async fn send(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        let writer = self.writer.as_mut().ok_or(SendError::Closed)?;
        // `write_all` loops until every byte is accepted by the OS.
        writer.write_all(bytes).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Closes the connection.  Safe to call any number of times.
    pub async fn close(&mut self) {
        if let Some(closed_tx) = self.closed_tx.take() {
            // The reader may already be gone; that is fine.
            let _ = closed_tx.send(());
        }
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.shutdown().await {
                debug!("shutdown of connection to {} failed: {e}", self.peer);
            }
            debug!("connection to {} closed", self.peer);
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("peer", &self.peer)
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ── Read side ─────────────────────────────────────────────────────────────────

/// The read side of the server connection, owned by the receive task.
pub struct ConnectionReader {
    reader: BoxedReader,
    closed_rx: oneshot::Receiver<()>,
}

impl ConnectionReader {
    /// Reads the next chunk into `buf`.
    ///
    /// Completes when data arrives, the peer closes, the read fails, or the
    /// owning [`Connection`] is closed.  Must not be called again after it
    /// returned anything other than [`ReadEvent::Data`].
    pub async fn read(&mut self, buf: &mut [u8]) -> ReadEvent {
        tokio::select! {
            // Check the close signal first so a local close wins over data
            // that happens to be buffered at the same moment.
            biased;
            _ = &mut self.closed_rx => ReadEvent::LocallyClosed,
            result = self.reader.read(buf) => match result {
                Ok(0) => ReadEvent::PeerClosed,
                Ok(n) => ReadEvent::Data(n),
                Err(e) => ReadEvent::Failed(e),
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
