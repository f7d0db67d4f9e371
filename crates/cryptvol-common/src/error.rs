//! Error types for cryptvol.

use std::path::PathBuf;
use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using [`CryptvolError`].
pub type CryptvolResult<T> = Result<T, CryptvolError>;

/// Errors raised while validating, preparing or running a volume command.
///
/// `AlreadyMounted` and `AlreadyDismounted` are recoverable: callers are
/// expected to match on them and continue. Every other variant is fatal to
/// the current call.
#[derive(Error, Diagnostic, Debug)]
pub enum CryptvolError {
    /// The encryption tool is missing or not executable.
    #[error("Encryption tool not found or not executable: {}", .path.display())]
    #[diagnostic(
        code(cryptvol::executable::not_found),
        help("Point `container.executable` at the VeraCrypt binary")
    )]
    ExecutableNotFound {
        /// The configured executable path.
        path: PathBuf,
    },

    /// The container file does not exist.
    #[error("Container not found: {}", .path.display())]
    #[diagnostic(code(cryptvol::container::not_found))]
    ContainerNotFound {
        /// The configured container path.
        path: PathBuf,
    },

    /// The configured keyfile does not exist.
    #[error("Keyfile not found: {}", .path.display())]
    #[diagnostic(code(cryptvol::keyfile::not_found))]
    KeyfileNotFound {
        /// The configured keyfile path.
        path: PathBuf,
    },

    /// The mount identifier is already bound.
    #[error("Mount point {mount_id} is already mounted")]
    #[diagnostic(
        code(cryptvol::volume::already_mounted),
        severity(Warning)
    )]
    AlreadyMounted {
        /// The mount identifier.
        mount_id: String,
    },

    /// The mount identifier is not bound.
    #[error("Mount point {mount_id} is not mounted")]
    #[diagnostic(
        code(cryptvol::volume::already_dismounted),
        severity(Warning)
    )]
    AlreadyDismounted {
        /// The mount identifier.
        mount_id: String,
    },

    /// The encryption tool could not be run to completion.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Execution(#[from] ExecutionError),

    /// I/O error while querying the filesystem or mount table.
    #[error("I/O error: {0}")]
    #[diagnostic(code(cryptvol::io))]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(cryptvol::config))]
    Config {
        /// The error message.
        message: String,
    },
}

impl CryptvolError {
    /// Whether the caller may treat this error as a no-op and continue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AlreadyMounted { .. } | Self::AlreadyDismounted { .. }
        )
    }
}

impl From<toml::de::Error> for CryptvolError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

/// Failures reported by the subprocess runner.
#[derive(Error, Diagnostic, Debug)]
pub enum ExecutionError {
    /// The process could not be started.
    #[error("Failed to spawn {program}: {source}")]
    #[diagnostic(
        code(cryptvol::exec::spawn),
        help("Check that the encryption tool is installed and executable")
    )]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The process exited unsuccessfully.
    #[error("{program} exited with {}: {diagnostic}", .code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}")))]
    #[diagnostic(code(cryptvol::exec::exit_status))]
    ExitStatus {
        /// Program that failed.
        program: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
        /// Trimmed stderr (or stdout when stderr was empty).
        diagnostic: String,
    },

    /// The process did not finish within the configured timeout.
    #[error("{program} timed out after {timeout:?}")]
    #[diagnostic(code(cryptvol::exec::timeout))]
    TimedOut {
        /// Program that was killed.
        program: String,
        /// The configured timeout.
        timeout: Duration,
    },

    /// Reading the process output failed.
    #[error("Failed to read output of {program}: {source}")]
    #[diagnostic(code(cryptvol::exec::stream))]
    Stream {
        /// Program whose output could not be read.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CryptvolError::AlreadyMounted {
            mount_id: "Z".to_string(),
        };
        assert_eq!(err.to_string(), "Mount point Z is already mounted");

        let err = CryptvolError::ContainerNotFound {
            path: PathBuf::from("/vaults/missing.hc"),
        };
        assert_eq!(err.to_string(), "Container not found: /vaults/missing.hc");
    }

    #[test]
    fn recoverable_kinds() {
        assert!(
            CryptvolError::AlreadyMounted {
                mount_id: "Z".into()
            }
            .is_recoverable()
        );
        assert!(
            CryptvolError::AlreadyDismounted {
                mount_id: "Z".into()
            }
            .is_recoverable()
        );
        assert!(
            !CryptvolError::KeyfileNotFound {
                path: PathBuf::from("key")
            }
            .is_recoverable()
        );

        let exec: CryptvolError = ExecutionError::ExitStatus {
            program: "veracrypt".into(),
            code: Some(1),
            diagnostic: "wrong password".into(),
        }
        .into();
        assert!(!exec.is_recoverable());
    }

    #[test]
    fn exit_status_display() {
        let err = ExecutionError::ExitStatus {
            program: "veracrypt".into(),
            code: Some(2),
            diagnostic: "volume in use".into(),
        };
        assert_eq!(err.to_string(), "veracrypt exited with code 2: volume in use");

        let err = ExecutionError::ExitStatus {
            program: "veracrypt".into(),
            code: None,
            diagnostic: String::new(),
        };
        assert_eq!(err.to_string(), "veracrypt exited with a signal: ");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CryptvolError = io_err.into();
        assert!(matches!(err, CryptvolError::Io(_)));
    }

    #[test]
    fn error_from_toml() {
        let err: CryptvolError = toml::from_str::<toml::Table>("not = [valid")
            .unwrap_err()
            .into();
        assert!(matches!(err, CryptvolError::Config { .. }));
    }
}
