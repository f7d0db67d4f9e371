//! File configuration.
//!
//! ```toml
//! [container]
//! executable = "C:/Program Files/VeraCrypt/VeraCrypt.exe"
//! path = "D:/vaults/work.hc"
//! mount_id = "T"
//! password = "Password"
//! keyfile = "D:/keys/work.key"
//!
//! [mount]
//! root = "/media/veracrypt"
//!
//! [runner]
//! timeout_secs = 120
//! echo_output = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use cryptvol_common::{CryptvolError, CryptvolResult};
use serde::Deserialize;

use crate::container::ContainerConfig;
use crate::exec::ProcessRunner;
use crate::volume::MountNamespace;

/// Top-level settings file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// The container to manage.
    pub container: ContainerSection,
    /// Mount namespace settings.
    #[serde(default)]
    pub mount: MountSection,
    /// Subprocess runner settings.
    #[serde(default)]
    pub runner: RunnerSection,
}

/// `[container]` table.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerSection {
    /// Path to the encryption tool.
    pub executable: PathBuf,
    /// Path to the container file.
    pub path: PathBuf,
    /// Mount identifier (drive letter).
    pub mount_id: String,
    /// Volume password.
    #[serde(default)]
    pub password: Option<String>,
    /// Keyfile path.
    #[serde(default)]
    pub keyfile: Option<PathBuf>,
}

impl std::fmt::Debug for ContainerSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerSection")
            .field("executable", &self.executable)
            .field("path", &self.path)
            .field("mount_id", &self.mount_id)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("keyfile", &self.keyfile)
            .finish()
    }
}

/// `[mount]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MountSection {
    /// Directory holding one mount point per identifier. Drive letters are
    /// used when unset on Windows.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// `[runner]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSection {
    /// Kill the tool after this many seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Forward the tool's output to the terminal.
    #[serde(default = "default_echo")]
    pub echo_output: bool,
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            echo_output: default_echo(),
        }
    }
}

const fn default_echo() -> bool {
    true
}

impl Settings {
    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file is missing or malformed.
    pub fn load(path: &Path) -> CryptvolResult<Self> {
        tracing::debug!(path = %path.display(), "Loading settings");

        let raw = std::fs::read_to_string(path).map_err(|e| CryptvolError::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml(&raw)
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error on malformed input or an empty
    /// mount identifier.
    pub fn from_toml(raw: &str) -> CryptvolResult<Self> {
        let settings: Self = toml::from_str(raw)?;
        if MountNamespace::normalize(&settings.container.mount_id).is_empty() {
            return Err(CryptvolError::Config {
                message: "container.mount_id must not be empty".into(),
            });
        }
        Ok(settings)
    }

    /// Container configuration described by these settings.
    #[must_use]
    pub fn container_config(&self) -> ContainerConfig {
        let section = &self.container;
        let mut config =
            ContainerConfig::new(&section.executable, &section.path, &section.mount_id);
        if let Some(password) = &section.password {
            config = config.with_password(password.as_str());
        }
        if let Some(keyfile) = &section.keyfile {
            config = config.with_keyfile(keyfile);
        }
        config
    }

    /// Mount namespace described by these settings.
    #[must_use]
    pub fn namespace(&self) -> MountNamespace {
        self.mount
            .root
            .as_ref()
            .map_or_else(MountNamespace::default, MountNamespace::under)
    }

    /// Subprocess runner described by these settings.
    #[must_use]
    pub fn runner(&self) -> ProcessRunner {
        let runner = ProcessRunner::new();
        match self.runner.timeout_secs {
            Some(secs) => runner.with_timeout(Duration::from_secs(secs)),
            None => runner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        [container]
        executable = "/usr/bin/veracrypt"
        path = "/vaults/work.hc"
        mount_id = "T"
        password = "Password"
        keyfile = "/keys/work.key"

        [mount]
        root = "/mnt/vc"

        [runner]
        timeout_secs = 90
        echo_output = false
    "#;

    #[test]
    fn parse_full_settings() {
        let settings = Settings::from_toml(FULL).unwrap();
        let config = settings.container_config();

        assert_eq!(config.mount_id(), "T");
        assert_eq!(config.password(), Some("Password"));
        assert_eq!(config.keyfile(), Some(Path::new("/keys/work.key")));
        assert_eq!(settings.namespace(), MountNamespace::under("/mnt/vc"));
        assert_eq!(settings.runner().timeout(), Some(Duration::from_secs(90)));
        assert!(!settings.runner.echo_output);
    }

    #[test]
    fn minimal_settings_use_defaults() {
        let settings = Settings::from_toml(
            r#"
            [container]
            executable = "vc"
            path = "a.hc"
            mount_id = "Z"
            "#,
        )
        .unwrap();

        assert!(settings.runner.echo_output);
        assert_eq!(settings.runner().timeout(), None);
        assert_eq!(settings.namespace(), MountNamespace::default());
        assert_eq!(settings.container_config().password(), None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_toml(
            r#"
            [container]
            executable = "vc"
            path = "a.hc"
            mount_id = "Z"
            pasword = "typo"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CryptvolError::Config { .. }));
    }

    #[test]
    fn empty_mount_id_is_rejected() {
        let err = Settings::from_toml(
            r#"
            [container]
            executable = "vc"
            path = "a.hc"
            mount_id = "  "
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("mount_id"));
    }

    #[test]
    fn debug_hides_password() {
        let settings = Settings::from_toml(FULL).unwrap();
        assert!(!format!("{settings:?}").contains("Password\""));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CryptvolError::Config { .. }));
    }
}
