//! CLI command definitions and handlers.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, eyre};
use cryptvol_common::{CryptvolError, CryptvolPaths};

use crate::config::Settings;
use crate::container::{ContainerConfig, ContainerController};
use crate::exec::CommandRunner;
use crate::volume::VolumeStateChecker;

/// cryptvol - mount and dismount VeraCrypt containers
#[derive(Parser)]
#[command(name = "cryptvol")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file
    #[arg(short, long, global = true, env = "CRYPTVOL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Append logs to this file instead of the default log file
    #[arg(long, global = true, env = "CRYPTVOL_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log to the console only
    #[arg(long, global = true, conflicts_with = "log_file")]
    pub no_log_file: bool,

    /// Volume password, overriding the settings file
    #[arg(long, global = true, env = "CRYPTVOL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Mount identifier, overriding the settings file
    #[arg(short, long, global = true)]
    pub mount_id: Option<String>,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Helper commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Mount the container
    Mount {
        /// Do not echo the encryption tool's output
        #[arg(short, long)]
        quiet: bool,

        /// If the mount identifier is taken, retry once on the first free one
        #[arg(long)]
        next_free: bool,
    },

    /// Dismount the container
    Dismount {
        /// Do not echo the encryption tool's output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show whether the container's mount point is bound
    Status,

    /// List mount identifiers that are free
    Available,

    /// Print the command that would run, without running it
    Prepare {
        /// Which command to prepare
        #[arg(value_enum)]
        action: Action,
    },
}

/// Operation selector for `prepare`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// The mount command
    Mount,
    /// The dismount command
    Dismount,
}

impl Cli {
    /// Settings file to read.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| CryptvolPaths::new().config_file())
    }

    /// Log file to append to: `--log-file`, else the default under the data
    /// directory (created if needed). `None` with `--no-log-file`.
    ///
    /// # Errors
    ///
    /// Fails if the default directories cannot be created.
    pub fn log_path(&self) -> Result<Option<PathBuf>> {
        if self.no_log_file {
            return Ok(None);
        }
        if let Some(path) = &self.log_file {
            return Ok(Some(path.clone()));
        }
        let paths = CryptvolPaths::new();
        paths.create_dirs()?;
        Ok(Some(paths.log_file()))
    }

    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load(&self.config_path())?;
        let checker = VolumeStateChecker::new(settings.namespace());

        let mut config = settings.container_config();
        if let Some(password) = &self.password {
            config = config.with_password(password.as_str());
        }
        if let Some(mount_id) = &self.mount_id {
            config = config.with_mount_id(mount_id.as_str());
        }

        if matches!(self.command, Commands::Available) {
            for id in checker.available_mount_identifiers()? {
                println!("{id}");
            }
            return Ok(());
        }

        let mut controller = ContainerController::new(config, checker)?;
        let runner = settings.runner();
        let echo = settings.runner.echo_output;

        match self.command {
            Commands::Mount { quiet, next_free } => {
                mount_or_continue(&mut controller, &runner, echo && !quiet, next_free).await
            }

            Commands::Dismount { quiet } => {
                dismount_or_continue(&mut controller, &runner, echo && !quiet).await
            }

            Commands::Status => {
                let config = controller.config();
                let mounted = controller.is_mounted()?;
                println!("container\t{}", config.container().display());
                println!("present\t{}", config.container().exists());
                println!("mount id\t{}", config.mount_id());
                println!(
                    "mount path\t{}",
                    controller.checker().mount_path(config.mount_id()).display()
                );
                println!("mounted\t{mounted}");
                Ok(())
            }

            Commands::Prepare { action } => {
                let command = match action {
                    Action::Mount => controller.prepare_mount()?,
                    Action::Dismount => controller.prepare_dismount()?,
                };
                println!("{}", command.redacted());
                Ok(())
            }

            Commands::Available => Ok(()),
        }
    }
}

/// Mount, treating an already-bound identifier as a warning.
///
/// With `next_free`, the mount is retried once on the first free identifier
/// instead.
///
/// # Errors
///
/// Any non-recoverable controller or runner error.
pub async fn mount_or_continue(
    controller: &mut ContainerController,
    runner: &dyn CommandRunner,
    echo: bool,
    next_free: bool,
) -> Result<()> {
    match controller.mount(runner, echo).await {
        Ok(()) => {
            tracing::info!(mount_id = controller.config().mount_id(), "Container mounted");
            Ok(())
        }
        Err(CryptvolError::AlreadyMounted { mount_id }) if next_free => {
            let next = controller
                .checker()
                .available_mount_identifiers()?
                .into_iter()
                .next()
                .ok_or_else(|| eyre!("{mount_id} is taken and no mount identifier is free"))?;

            tracing::warn!(taken = %mount_id, next = %next, "Mount identifier taken, trying next free one");

            let config: ContainerConfig = controller.config().clone().with_mount_id(next);
            let mut retry = ContainerController::new(config, controller.checker().clone())?;
            retry.mount(runner, echo).await?;
            tracing::info!(mount_id = retry.config().mount_id(), "Container mounted");
            Ok(())
        }
        Err(e) if e.is_recoverable() => {
            tracing::warn!(
                container = %controller.config().container().display(),
                "Container is already mounted. Continuing..."
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Dismount, treating an unbound identifier as a warning.
///
/// # Errors
///
/// Any non-recoverable controller or runner error.
pub async fn dismount_or_continue(
    controller: &mut ContainerController,
    runner: &dyn CommandRunner,
    echo: bool,
) -> Result<()> {
    match controller.dismount(runner, echo).await {
        Ok(()) => {
            tracing::info!(mount_id = controller.config().mount_id(), "Container dismounted");
            Ok(())
        }
        Err(e) if e.is_recoverable() => {
            tracing::warn!(
                container = %controller.config().container().display(),
                "Container is already dismounted. Continuing..."
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_mount_flags() {
        let cli = Cli::try_parse_from([
            "cryptvol",
            "--config",
            "/etc/cryptvol.toml",
            "mount",
            "--quiet",
            "--next-free",
        ])
        .unwrap();

        assert_eq!(cli.config_path(), PathBuf::from("/etc/cryptvol.toml"));
        assert!(matches!(
            cli.command,
            Commands::Mount {
                quiet: true,
                next_free: true
            }
        ));
    }

    #[test]
    fn log_path_follows_flags() {
        let cli = Cli::try_parse_from(["cryptvol", "--log-file", "/var/log/cv.log", "status"]).unwrap();
        assert_eq!(cli.log_path().unwrap(), Some(PathBuf::from("/var/log/cv.log")));

        let cli = Cli::try_parse_from(["cryptvol", "--no-log-file", "status"]).unwrap();
        assert_eq!(cli.log_path().unwrap(), None);

        assert!(Cli::try_parse_from(["cryptvol", "--no-log-file", "--log-file", "x", "status"]).is_err());
    }

    #[test]
    fn parse_prepare_action() {
        let cli = Cli::try_parse_from(["cryptvol", "prepare", "dismount", "-m", "Q"]).unwrap();
        assert_eq!(cli.mount_id.as_deref(), Some("Q"));
        assert!(matches!(
            cli.command,
            Commands::Prepare {
                action: Action::Dismount
            }
        ));
    }
}
