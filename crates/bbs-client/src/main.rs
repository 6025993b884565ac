//! Bulletin-board terminal client: entry point.
//!
//! Starts unconnected and reads `%keyword` commands from stdin:
//!
//! ```text
//! > %connect 127.0.0.1 65432
//! connected to 127.0.0.1 on port 65432
//! Enter a username:
//! > alice
//! > %groupjoin teamA
//! > %grouppost ; teamA ; Hello ; First post
//! > %exit
//! ```
//!
//! # Usage
//!
//! ```text
//! bbs-client [OPTIONS]
//!
//! Options:
//!   --connect-timeout  <SECS>   TCP handshake timeout, 0 = none [default: 0]
//!   --read-buffer-size <BYTES>  Bytes taken from the socket per read [default: 1024]
//!   --prompt           <TEXT>   Prompt marker [default: "> "]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable               | Default | Description                  |
//! |------------------------|---------|------------------------------|
//! | `BBS_CONNECT_TIMEOUT`  | `0`     | Handshake timeout (secs)     |
//! | `BBS_READ_BUFFER_SIZE` | `1024`  | Read chunk size (bytes)      |
//! | `BBS_PROMPT`           | `"> "`  | Prompt marker                |
//! | `RUST_LOG`             | `warn`  | Log filter (written to stderr) |

use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bbs_client::application::{Session, SessionController};
use bbs_client::domain::ClientConfig;
use bbs_client::infrastructure::{run_terminal, TerminalSink};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Terminal client for the bulletin-board server.
#[derive(Debug, Parser)]
#[command(
    name = "bbs-client",
    about = "Terminal client for the bulletin-board server",
    version
)]
struct Cli {
    /// Seconds to wait for the TCP handshake; 0 waits as long as the OS does.
    #[arg(long, default_value_t = 0, env = "BBS_CONNECT_TIMEOUT")]
    connect_timeout: u64,

    /// Maximum bytes taken from the socket per read.
    ///
    /// Each read is displayed as one unit.
    #[arg(long, default_value_t = 1024, env = "BBS_READ_BUFFER_SIZE")]
    read_buffer_size: usize,

    /// Prompt marker printed before each input line and after server text.
    #[arg(long, default_value = "> ", env = "BBS_PROMPT")]
    prompt: String,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--read-buffer-size` is zero.
    fn into_client_config(self) -> anyhow::Result<ClientConfig> {
        ensure!(
            self.read_buffer_size > 0,
            "--read-buffer-size must be at least 1"
        );

        let connect_timeout =
            (self.connect_timeout > 0).then(|| Duration::from_secs(self.connect_timeout));

        Ok(ClientConfig {
            prompt: self.prompt,
            read_buffer_size: self.read_buffer_size,
            connect_timeout,
            ..ClientConfig::default()
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the prompt on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse()
        .into_client_config()
        .context("invalid command-line arguments")?;
    let prompt = config.prompt.clone();

    let sink = Arc::new(TerminalSink::new(prompt.clone()));
    let session = Session::new(config, sink);
    info!("bbs-client starting (session {})", session.id());

    let controller = SessionController::new(session);
    run_terminal(&controller, &prompt).await?;

    info!("bbs-client stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
