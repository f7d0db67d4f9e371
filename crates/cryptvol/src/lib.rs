//! # cryptvol
//!
//! Mount and dismount VeraCrypt containers by driving the VeraCrypt
//! executable.
//!
//! Command construction is kept apart from execution: the controller checks
//! preconditions against live mount state and builds an argument vector,
//! and a [`CommandRunner`](exec::CommandRunner) runs it.
//!
//! ## Usage
//!
//! ```no_run
//! use cryptvol::container::{ContainerConfig, ContainerController};
//! use cryptvol::exec::ProcessRunner;
//! use cryptvol::volume::{MountNamespace, VolumeStateChecker};
//! use cryptvol_common::CryptvolError;
//!
//! # async fn example() -> cryptvol_common::CryptvolResult<()> {
//! let config = ContainerConfig::new(
//!     "C:/Program Files/VeraCrypt/VeraCrypt.exe",
//!     "D:/vaults/work.hc",
//!     "T",
//! )
//! .with_password("Password");
//!
//! let checker = VolumeStateChecker::new(MountNamespace::DriveLetters);
//! let mut controller = ContainerController::new(config, checker)?;
//!
//! match controller.mount(&ProcessRunner::new(), true).await {
//!     Err(CryptvolError::AlreadyMounted { .. }) => {}
//!     other => other?,
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod container;
pub mod exec;
pub mod logging;
pub mod volume;

pub use container::{ContainerConfig, ContainerController, PreparedCommand};
pub use volume::VolumeStateChecker;
