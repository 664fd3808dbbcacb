//! Subprocess execution with a bounded wait
//!
//! The linter's stdout and stderr are attached to the same pipe, so the
//! captured text keeps the interleaving the tool produced. The pipe is
//! drained on a reader thread while the child is polled against a deadline.

use crate::error::{LintError, LintResult};
use crate::invocation::Invocation;
use std::io::Read;
use std::process::{Child, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long one linter run may take
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Spawn attempts when the freshly written binary is still busy
const SPAWN_ATTEMPTS: u32 = 5;

/// Exit status and combined output of a finished linter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `-1` when the process was ended by a signal
    pub exit_code: i32,
    pub output: String,
}

/// Runs linter invocations one at a time
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run an invocation to completion and capture its output.
    ///
    /// # Errors
    ///
    /// * [`LintError::ExecutionTimeout`] if the process outlives the timeout
    ///   (it is killed before returning), or if its output pipe is still open
    ///   when the timeout expires
    /// * [`LintError::ExecutionFailed`] on spawn or I/O failures
    pub fn run(&self, invocation: &Invocation) -> LintResult<ProcessOutput> {
        debug!("Executing: {}", invocation.display_command());

        let (mut reader, mut child) = spawn_with_shared_pipe(invocation)?;

        // A background descendant of the linter can hold the pipe open after
        // the child exits, so EOF is awaited against the same deadline.
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = sender.send(reader.read_to_end(&mut buf).map(|_| buf));
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(LintError::ExecutionTimeout {
                            timeout: self.timeout,
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    let _ = child.kill();
                    return Err(LintError::ExecutionFailed(format!(
                        "failed to wait for linter: {}",
                        e
                    )));
                }
            }
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        let bytes = match receiver.recv_timeout(remaining) {
            Ok(read) => read
                .map_err(|e| LintError::ExecutionFailed(format!("failed to read output: {}", e)))?,
            Err(RecvTimeoutError::Timeout) => {
                warn!("Linter exited but its output stayed open past the timeout");
                return Err(LintError::ExecutionTimeout {
                    timeout: self.timeout,
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(LintError::ExecutionFailed(
                    "output reader stopped without a result".to_string(),
                ));
            }
        };

        Ok(ProcessOutput {
            exit_code: status.code().unwrap_or(-1),
            output: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

fn spawn_with_shared_pipe(invocation: &Invocation) -> LintResult<(std::io::PipeReader, Child)> {
    let mut attempt = 1;
    loop {
        let (reader, writer) = std::io::pipe()
            .map_err(|e| LintError::ExecutionFailed(format!("failed to create pipe: {}", e)))?;
        let writer_err = writer
            .try_clone()
            .map_err(|e| LintError::ExecutionFailed(format!("failed to clone pipe: {}", e)))?;

        // The command owns the write ends; it must be dropped before reading
        // so the reader sees EOF when the child exits.
        let spawned = {
            let mut command = invocation.to_command();
            command
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(writer_err);
            command.spawn()
        };

        match spawned {
            Ok(child) => return Ok((reader, child)),
            Err(e) if is_text_file_busy(&e) && attempt < SPAWN_ATTEMPTS => {
                debug!("Linter executable busy, retrying spawn (attempt {})", attempt);
                attempt += 1;
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(LintError::ExecutionFailed(format!(
                    "failed to start {}: {}",
                    invocation.program().display(),
                    e
                )));
            }
        }
    }
}

#[cfg(unix)]
fn is_text_file_busy(e: &std::io::Error) -> bool {
    // ETXTBSY on Linux and macOS
    e.raw_os_error() == Some(26)
}

#[cfg(not(unix))]
fn is_text_file_busy(_e: &std::io::Error) -> bool {
    false
}
