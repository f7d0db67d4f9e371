//! Process spawning.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use cryptvol_common::{CryptvolResult, ExecutionError};
use tokio::process::Command;
use tokio::task::JoinHandle;

use super::CommandRunner;
use super::stdio::{OutputStream, capture, diagnostic};
use crate::container::PreparedCommand;

/// Runs commands as child processes on the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Create a runner with no timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Kill the child if it has not exited after `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &PreparedCommand, echo_output: bool) -> CryptvolResult<()> {
        let program = command.program().to_string();
        tracing::debug!(command = %command.redacted(), echo_output, "Spawning process");

        let mut child = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = tokio::spawn(capture(child.stdout.take(), OutputStream::Stdout, echo_output));
        let stderr = tokio::spawn(capture(child.stderr.take(), OutputStream::Stderr, echo_output));

        let waited = match self.timeout {
            Some(timeout) => {
                if let Ok(status) = tokio::time::timeout(timeout, child.wait()).await {
                    status
                } else {
                    let _ = child.kill().await;
                    stdout.abort();
                    stderr.abort();
                    tracing::warn!(program = %program, ?timeout, "Process timed out and was killed");
                    return Err(ExecutionError::TimedOut { program, timeout }.into());
                }
            }
            None => child.wait().await,
        };

        let status = waited.map_err(|source| ExecutionError::Stream {
            program: program.clone(),
            source,
        })?;
        let stdout = join_output(&program, stdout).await?;
        let stderr = join_output(&program, stderr).await?;

        if status.success() {
            tracing::debug!(program = %program, "Process exited successfully");
            return Ok(());
        }

        let diagnostic = diagnostic(&stdout, &stderr);
        tracing::error!(program = %program, code = ?status.code(), %diagnostic, "Process failed");
        Err(ExecutionError::ExitStatus {
            program,
            code: status.code(),
            diagnostic,
        }
        .into())
    }
}

async fn join_output(
    program: &str,
    handle: JoinHandle<io::Result<String>>,
) -> Result<String, ExecutionError> {
    let stream_error = |source| ExecutionError::Stream {
        program: program.to_string(),
        source,
    };

    handle
        .await
        .map_err(|e| stream_error(io::Error::other(e)))?
        .map_err(stream_error)
}
