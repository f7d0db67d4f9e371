//! Container configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::volume::MountNamespace;

/// Static description of one encrypted container.
///
/// Immutable once built; the controller that owns it re-validates the
/// container and keyfile paths before every command.
#[derive(Clone)]
pub struct ContainerConfig {
    executable: PathBuf,
    container: PathBuf,
    mount_id: String,
    password: Option<Zeroizing<String>>,
    keyfile: Option<PathBuf>,
}

impl ContainerConfig {
    /// Create a configuration without credentials.
    pub fn new(
        executable: impl Into<PathBuf>,
        container: impl Into<PathBuf>,
        mount_id: impl Into<String>,
    ) -> Self {
        Self {
            executable: executable.into(),
            container: container.into(),
            mount_id: MountNamespace::normalize(&mount_id.into()),
            password: None,
            keyfile: None,
        }
    }

    /// Set the volume password. An empty password counts as none.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        let password = Zeroizing::new(password.into());
        self.password = (!password.is_empty()).then_some(password);
        self
    }

    /// Set the keyfile path.
    #[must_use]
    pub fn with_keyfile(mut self, keyfile: impl Into<PathBuf>) -> Self {
        self.keyfile = Some(keyfile.into());
        self
    }

    /// Replace the mount identifier.
    #[must_use]
    pub fn with_mount_id(mut self, mount_id: impl Into<String>) -> Self {
        self.mount_id = MountNamespace::normalize(&mount_id.into());
        self
    }

    /// Path to the encryption tool.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Path to the container file.
    #[must_use]
    pub fn container(&self) -> &Path {
        &self.container
    }

    /// Mount identifier (drive letter), normalized the same way the state
    /// checker resolves mount points.
    #[must_use]
    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    /// Volume password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().map(String::as_str)
    }

    /// Keyfile path, if any.
    #[must_use]
    pub fn keyfile(&self) -> Option<&Path> {
        self.keyfile.as_deref()
    }
}

impl fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerConfig")
            .field("executable", &self.executable)
            .field("container", &self.container)
            .field("mount_id", &self.mount_id)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("keyfile", &self.keyfile)
            .finish()
    }
}
