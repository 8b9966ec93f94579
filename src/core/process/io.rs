// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks (concurrent with wait)
//!   mpsc channels buffer lines
//!   wait (or cancel/timeout --> kill + reap)
//!   --> ProcessOutput { stdout, stderr, exit_code, interrupted }
//! ```
//!
//! Both streams are drained while the child runs. A child that fills one pipe
//! past the OS buffer while the parent blocks in `wait()` deadlocks forever;
//! the reader tasks make that impossible.

use crate::error::{EngineResult, ProcessError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};

/// Spawns a reader task for stdout if needed.
fn spawn_stdout_reader(
    stdout: Option<ChildStdout>,
    flags: StreamFlags,
    process_name: &str,
    tx: mpsc::UnboundedSender<String>,
) -> Option<JoinHandle<()>> {
    if !flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    let name = process_name.to_string();
    stdout.map(|stdout| {
        tokio::spawn(async move {
            read_stream(stdout, flags, &name, "stdout", tx).await;
        })
    })
}

/// Spawns a reader task for stderr if needed.
fn spawn_stderr_reader(
    stderr: Option<ChildStderr>,
    flags: StreamFlags,
    process_name: &str,
    tx: mpsc::UnboundedSender<String>,
) -> Option<JoinHandle<()>> {
    if !flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    let name = process_name.to_string();
    stderr.map(|stderr| {
        tokio::spawn(async move {
            read_stream(stderr, flags, &name, "stderr", tx).await;
        })
    })
}

/// Collects output from a channel into a string.
fn collect_output(rx: &mut mpsc::UnboundedReceiver<String>, flags: StreamFlags) -> String {
    if !flags.contains(StreamFlags::KEEP_IN_STRING) {
        return String::new();
    }
    let mut output = String::new();
    while let Ok(line) = rx.try_recv() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&line);
    }
    output
}

/// Waits for reader tasks to complete.
///
/// Must happen after the child exited (or was killed) and before collecting:
/// the readers finish only at stream EOF, which guarantees full drainage.
async fn await_readers(
    stdout_handle: Option<JoinHandle<()>>,
    stderr_handle: Option<JoinHandle<()>>,
) {
    if let Some(handle) = stdout_handle {
        let _ = handle.await;
    }
    if let Some(handle) = stderr_handle {
        let _ = handle.await;
    }
}

impl ProcessBuilder {
    /// Runs the child process, handling I/O streaming, timeout, and
    /// cancellation, waiting for completion.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: CancellationToken,
    ) -> EngineResult<ProcessOutput> {
        let (stdout_tx, mut stdout_rx) = mpsc::unbounded_channel::<String>();
        let (stderr_tx, mut stderr_rx) = mpsc::unbounded_channel::<String>();

        let stdout_handle = spawn_stdout_reader(
            child.stdout.take(),
            self.stdout_config().flags(),
            name,
            stdout_tx,
        );
        let stderr_handle = spawn_stderr_reader(
            child.stderr.take(),
            self.stderr_config().flags(),
            name,
            stderr_tx,
        );

        enum WaitOutcome {
            Exited(std::process::ExitStatus),
            Cancelled(std::process::ExitStatus),
            TimedOut,
        }

        let outcome = if let Some(timeout_duration) = self.timeout_duration() {
            tokio::select! {
                status = child.wait() => WaitOutcome::Exited(status.map_err(|e| wait_error(name, &e))?),
                () = token.cancelled() => {
                    warn!(process = %name, "cancellation requested, terminating process");
                    child.kill().await.ok();
                    WaitOutcome::Cancelled(child.wait().await.map_err(|e| wait_error(name, &e))?)
                }
                () = tokio::time::sleep(timeout_duration) => {
                    warn!(process = %name, timeout = ?timeout_duration, "process timed out");
                    child.kill().await.ok();
                    // Reap so the timed-out child cannot linger as a zombie.
                    child.wait().await.map_err(|e| wait_error(name, &e))?;
                    WaitOutcome::TimedOut
                }
            }
        } else {
            tokio::select! {
                status = child.wait() => WaitOutcome::Exited(status.map_err(|e| wait_error(name, &e))?),
                () = token.cancelled() => {
                    warn!(process = %name, "cancellation requested, terminating process");
                    child.kill().await.ok();
                    WaitOutcome::Cancelled(child.wait().await.map_err(|e| wait_error(name, &e))?)
                }
            }
        };

        await_readers(stdout_handle, stderr_handle).await;

        match outcome {
            WaitOutcome::TimedOut => Err(ProcessError::Timeout {
                command: self.command_line(),
                timeout_secs: self.timeout_duration().map_or(0, |d| d.as_secs()),
            }
            .into()),
            WaitOutcome::Exited(status) => Ok(ProcessOutput::new(
                status.code().unwrap_or(-1),
                collect_output(&mut stdout_rx, self.stdout_config().flags()),
                collect_output(&mut stderr_rx, self.stderr_config().flags()),
                false,
            )),
            WaitOutcome::Cancelled(status) => Ok(ProcessOutput::new(
                status.code().unwrap_or(-1),
                collect_output(&mut stdout_rx, self.stdout_config().flags()),
                collect_output(&mut stderr_rx, self.stderr_config().flags()),
                true,
            )),
        }
    }
}

fn wait_error(name: &str, e: &std::io::Error) -> ProcessError {
    ProcessError::OutputError {
        command: name.to_string(),
        message: format!("failed waiting for process: {e}"),
    }
}

/// Reads from a stream and processes lines.
async fn read_stream<R>(
    reader: R,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &str,
    tx: mpsc::UnboundedSender<String>,
) where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if flags.contains(StreamFlags::FORWARD_TO_LOG) {
            trace!(process = %process_name, stream = %stream_name, line = %line, "output");
        }
        if flags.contains(StreamFlags::KEEP_IN_STRING) {
            let _ = tx.send(line);
        }
    }
}
