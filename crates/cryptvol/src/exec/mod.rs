//! Running prepared commands.
//!
//! The controller only builds argument vectors; anything that actually
//! starts a process goes through a [`CommandRunner`].

mod process;
mod stdio;

use async_trait::async_trait;
use cryptvol_common::CryptvolResult;

use crate::container::PreparedCommand;

pub use process::ProcessRunner;
pub use stdio::OutputStream;

/// Executes a prepared command to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command`, echoing its output to the terminal when
    /// `echo_output` is set.
    ///
    /// Returns once the process has exited. A non-zero exit, a spawn
    /// failure or an output read failure is an error.
    async fn run(&self, command: &PreparedCommand, echo_output: bool) -> CryptvolResult<()>;
}

/// Runner that logs the command instead of starting it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRunner;

#[async_trait]
impl CommandRunner for DryRunRunner {
    async fn run(&self, command: &PreparedCommand, echo_output: bool) -> CryptvolResult<()> {
        tracing::info!(kind = %command.kind(), command = %command.redacted(), "Dry run, not executing");
        if echo_output {
            println!("{}", command.redacted());
        }
        Ok(())
    }
}

