//! Encrypted container control.
//!
//! This module handles:
//! - Container configuration (tool, container file, credentials)
//! - Building the tool's argument vectors
//! - Mount/dismount guards against live mount state

mod command;
mod config;
mod controller;

pub use command::{
    CommandKind, EMPTY_PASSWORD_FLAG, KEYFILE_FLAG, PASSWORD_FLAG, PreparedCommand, Redacted,
    build_dismount_command, build_mount_command,
};
pub use config::ContainerConfig;
pub use controller::ContainerController;
