//! # cryptvol-common
//!
//! Shared types for the cryptvol crates.
//!
//! This crate provides:
//! - The error taxonomy used by the controller, runner and CLI
//! - Default filesystem locations for configuration and logs

#![warn(missing_docs)]

pub mod error;
pub mod paths;

pub use error::{CryptvolError, CryptvolResult, ExecutionError};
pub use paths::CryptvolPaths;
