//! Terminal front-end: a prompt loop over stdin and a stdout display sink.
//!
//! ```text
//! stdin thread ──lines──▶ mpsc ──▶ drive() ──▶ SessionController::handle
//!                                    ▲                │
//!                     Ctrl+C ────────┘                ▼
//!                                          TerminalSink ──▶ stdout
//! ```
//!
//! Stdin is read on a plain OS thread, not a runtime blocking task, so a
//! pending read does not hold up shutdown after Ctrl+C.
//!
//! End of input, a stdin read error and Ctrl+C are all handled as `%exit`.
//! A read error is still returned once the exit has been sent.

use std::future::Future;
use std::io::{self, BufRead, Write};

use anyhow::Context;
use bbs_core::{Command, CommandTag};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::application::controller::{Flow, SessionController};
use crate::domain::display::DisplaySink;

/// Writes display text to stdout.
///
/// Every text starts with `\r` so it overwrites a prompt that is already on
/// screen.  A newline is added unless the text already ends with the prompt
/// marker (inbound server text) or a newline.
#[derive(Debug, Clone)]
pub struct TerminalSink {
    prompt: String,
}

impl TerminalSink {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

impl DisplaySink for TerminalSink {
    fn append(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        // A closed stdout leaves nowhere to report the failure.
        let _ = stdout
            .write_all(terminal_line(text, &self.prompt).as_bytes())
            .and_then(|()| stdout.flush());
    }
}

/// Formats one display text for the terminal.
fn terminal_line(text: &str, prompt: &str) -> String {
    let ends_with_prompt = !prompt.is_empty() && text.ends_with(prompt);
    if ends_with_prompt || text.ends_with('\n') {
        format!("\r{text}")
    } else {
        format!("\r{text}\n")
    }
}

/// Runs the interactive prompt loop until the user exits.
///
/// # Errors
///
/// Fails if the stdin thread cannot be started, stdout is unwritable, or the
/// Ctrl+C handler cannot be installed.
pub async fn run_terminal(controller: &SessionController, prompt: &str) -> anyhow::Result<()> {
    let input = spawn_stdin_reader().context("failed to start the stdin reader")?;
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, exiting"),
            Err(e) => tracing::error!("failed to listen for Ctrl+C: {e}"),
        }
    };
    drive(controller, prompt, input, interrupt).await
}

/// The prompt loop proper, over any line source and interrupt signal.
async fn drive(
    controller: &SessionController,
    prompt: &str,
    mut input: mpsc::Receiver<io::Result<String>>,
    interrupt: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    tokio::pin!(interrupt);

    loop {
        print_prompt(prompt).context("failed to write the prompt")?;

        // `interrupt` completes at most once: the `%exit` it triggers ends the loop.
        let line = tokio::select! {
            line = input.recv() => line,
            () = &mut interrupt => None,
        };

        let flow = match line {
            Some(Ok(line)) => controller.handle(&line).await,
            Some(Err(e)) => {
                debug!("stdin read failed, sending %exit");
                exit(controller).await;
                return Err(e).context("failed to read from stdin");
            }
            None => {
                debug!("end of input, sending %exit");
                exit(controller).await
            }
        };

        if flow == Flow::Exit {
            return Ok(());
        }
    }
}

async fn exit(controller: &SessionController) -> Flow {
    controller
        .dispatch(Command::new(CommandTag::Exit, std::iter::empty::<&str>()))
        .await
}

fn print_prompt(prompt: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()
}

/// Reads stdin line by line on a dedicated thread.
///
/// The channel closes at end of input.
fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<io::Result<String>>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(rx)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
