//! Argument vectors for the encryption tool.

use std::fmt;
use std::path::Path;

use cryptvol_common::CryptvolResult;
use zeroize::Zeroizing;

use super::ContainerConfig;

/// Flag introducing the password value.
pub const PASSWORD_FLAG: &str = "/password";
/// Flag telling the tool to try an empty password.
pub const EMPTY_PASSWORD_FLAG: &str = "/tryemptypass";
/// Flag introducing the keyfile path.
pub const KEYFILE_FLAG: &str = "/keyfile";

/// Which operation a command performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Mount the container.
    Mount,
    /// Dismount the container.
    Dismount,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mount => write!(f, "mount"),
            Self::Dismount => write!(f, "dismount"),
        }
    }
}

/// One fully resolved invocation: the program followed by its arguments.
///
/// The argument vector may carry the password and is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    kind: CommandKind,
    argv: Zeroizing<Vec<String>>,
}

impl PreparedCommand {
    fn new(kind: CommandKind, program: &Path) -> Self {
        Self {
            kind,
            argv: Zeroizing::new(vec![program.to_string_lossy().into_owned()]),
        }
    }

    fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.argv.push(arg.into());
        self
    }

    /// The operation this command performs.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        self.kind
    }

    /// The program to run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments after the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// Program and arguments, in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.argv
    }

    /// Whether `flag` appears among the arguments.
    #[must_use]
    pub fn contains_flag(&self, flag: &str) -> bool {
        self.args().iter().any(|a| a == flag)
    }

    /// The value following `flag`, if present.
    #[must_use]
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        let args = self.args();
        let pos = args.iter().position(|a| a == flag)?;
        args.get(pos + 1).map(String::as_str)
    }

    /// Display form with the password masked, safe for logs.
    #[must_use]
    pub const fn redacted(&self) -> Redacted<'_> {
        Redacted(self)
    }
}

impl fmt::Debug for PreparedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedCommand")
            .field("kind", &self.kind)
            .field("argv", &format_args!("{}", self.redacted()))
            .finish()
    }
}

/// Log-safe rendering of a [`PreparedCommand`].
pub struct Redacted<'a>(&'a PreparedCommand);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mask_next = false;
        for (i, arg) in self.0.argv.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if mask_next {
                f.write_str("********")?;
            } else if arg.contains(char::is_whitespace) {
                write!(f, "\"{arg}\"")?;
            } else {
                f.write_str(arg)?;
            }
            mask_next = i > 0 && arg == PASSWORD_FLAG;
        }
        Ok(())
    }
}

/// Build the mount invocation for `config`.
///
/// Performs no precondition checks; see
/// [`ContainerController::prepare_mount`](super::ContainerController::prepare_mount).
///
/// # Errors
///
/// Returns an I/O error if a relative path cannot be made absolute.
pub fn build_mount_command(config: &ContainerConfig) -> CryptvolResult<PreparedCommand> {
    let mut cmd = PreparedCommand::new(CommandKind::Mount, config.executable());
    cmd.arg("/volume")
        .arg(absolute(config.container())?)
        .arg("/letter")
        .arg(config.mount_id())
        .arg("/silent")
        .arg("/auto")
        .arg("/quit");

    if let Some(keyfile) = config.keyfile() {
        cmd.arg(KEYFILE_FLAG).arg(absolute(keyfile)?);
    }

    match config.password() {
        Some(password) => cmd.arg(PASSWORD_FLAG).arg(password),
        None => cmd.arg(EMPTY_PASSWORD_FLAG),
    };

    Ok(cmd)
}

/// Build the dismount invocation for `config`.
///
/// # Errors
///
/// Returns an I/O error if a relative path cannot be made absolute.
pub fn build_dismount_command(config: &ContainerConfig) -> CryptvolResult<PreparedCommand> {
    let mut cmd = PreparedCommand::new(CommandKind::Dismount, config.executable());
    cmd.arg("/volume")
        .arg(absolute(config.container())?)
        .arg("/dismount")
        .arg(config.mount_id())
        .arg("/force")
        .arg("/silent")
        .arg("/quit");
    Ok(cmd)
}

fn absolute(path: &Path) -> CryptvolResult<String> {
    Ok(std::path::absolute(path)?.to_string_lossy().into_owned())
}
