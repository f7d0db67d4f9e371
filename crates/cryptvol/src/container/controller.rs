//! Mount/dismount controller for a single container.

use cryptvol_common::{CryptvolError, CryptvolResult};

use super::command::{PreparedCommand, build_dismount_command, build_mount_command};
use super::ContainerConfig;
use crate::exec::CommandRunner;
use crate::volume::VolumeStateChecker;

/// Drives one container through mount and dismount.
///
/// Whether the container is mounted is never stored here; it is asked of the
/// [`VolumeStateChecker`] right before each command is built.
#[derive(Debug)]
pub struct ContainerController {
    config: ContainerConfig,
    checker: VolumeStateChecker,
    last_prepared: Option<PreparedCommand>,
}

impl ContainerController {
    /// Create a controller, validating the encryption tool.
    ///
    /// # Errors
    ///
    /// Returns [`CryptvolError::ExecutableNotFound`] if the tool is missing
    /// or not executable.
    pub fn new(config: ContainerConfig, checker: VolumeStateChecker) -> CryptvolResult<Self> {
        tracing::info!(
            executable = %config.executable().display(),
            "Checking encryption tool"
        );

        if !is_executable(config.executable()) {
            return Err(CryptvolError::ExecutableNotFound {
                path: config.executable().to_path_buf(),
            });
        }

        Ok(Self {
            config,
            checker,
            last_prepared: None,
        })
    }

    /// The container configuration.
    #[must_use]
    pub const fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// The state checker in use.
    #[must_use]
    pub const fn checker(&self) -> &VolumeStateChecker {
        &self.checker
    }

    /// The command built by the most recent successful prepare, kept for
    /// inspection only. Cleared whenever a prepare fails.
    #[must_use]
    pub const fn last_prepared(&self) -> Option<&PreparedCommand> {
        self.last_prepared.as_ref()
    }

    /// Whether the configured mount identifier is currently bound.
    ///
    /// # Errors
    ///
    /// Propagates OS query failures.
    pub fn is_mounted(&self) -> CryptvolResult<bool> {
        self.checker.is_identifier_mounted(self.config.mount_id())
    }

    /// Validate preconditions and build the mount command.
    ///
    /// Checks, in order: the container exists, the keyfile (if set) exists,
    /// the mount identifier is free. No process is started.
    ///
    /// # Errors
    ///
    /// `ContainerNotFound`, `KeyfileNotFound`, `AlreadyMounted`, or an I/O
    /// error from the state query.
    pub fn prepare_mount(&mut self) -> CryptvolResult<&PreparedCommand> {
        self.last_prepared = None;
        self.ensure_container()?;

        if let Some(keyfile) = self.config.keyfile() {
            if !keyfile.try_exists()? {
                return Err(CryptvolError::KeyfileNotFound {
                    path: keyfile.to_path_buf(),
                });
            }
        }

        if self.is_mounted()? {
            return Err(CryptvolError::AlreadyMounted {
                mount_id: self.config.mount_id().to_string(),
            });
        }

        tracing::info!(
            container = %self.config.container().display(),
            mount_id = self.config.mount_id(),
            "Preparing to mount container"
        );

        let command = build_mount_command(&self.config)?;
        Ok(self.last_prepared.insert(command))
    }

    /// Validate preconditions and build the dismount command.
    ///
    /// # Errors
    ///
    /// `ContainerNotFound`, `AlreadyDismounted`, or an I/O error from the
    /// state query.
    pub fn prepare_dismount(&mut self) -> CryptvolResult<&PreparedCommand> {
        self.last_prepared = None;
        self.ensure_container()?;

        if !self.is_mounted()? {
            return Err(CryptvolError::AlreadyDismounted {
                mount_id: self.config.mount_id().to_string(),
            });
        }

        tracing::info!(
            container = %self.config.container().display(),
            mount_id = self.config.mount_id(),
            "Preparing to dismount container"
        );

        let command = build_dismount_command(&self.config)?;
        Ok(self.last_prepared.insert(command))
    }

    /// Mount the container and wait for the tool to finish.
    ///
    /// `AlreadyMounted` is raised before anything is spawned; callers
    /// usually log it and carry on.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::prepare_mount`], or the runner's failure.
    pub async fn mount(
        &mut self,
        runner: &dyn CommandRunner,
        echo_output: bool,
    ) -> CryptvolResult<()> {
        let command = self.prepare_mount()?.clone();
        tracing::info!(
            container = %self.config.container().display(),
            "Mounting container"
        );
        runner.run(&command, echo_output).await
    }

    /// Dismount the container and wait for the tool to finish.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::prepare_dismount`], or the runner's failure.
    pub async fn dismount(
        &mut self,
        runner: &dyn CommandRunner,
        echo_output: bool,
    ) -> CryptvolResult<()> {
        let command = self.prepare_dismount()?.clone();
        tracing::info!(
            container = %self.config.container().display(),
            "Dismounting container"
        );
        runner.run(&command, echo_output).await
    }

    fn ensure_container(&self) -> CryptvolResult<()> {
        let container = self.config.container();
        if container.try_exists()? {
            Ok(())
        } else {
            Err(CryptvolError::ContainerNotFound {
                path: container.to_path_buf(),
            })
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &std::path::Path) -> bool {
    path.is_file()
}
