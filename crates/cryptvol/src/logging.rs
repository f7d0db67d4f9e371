//! Tracing subscriber setup for the binary.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter directive used when `RUST_LOG` is unset or empty.
#[must_use]
pub const fn default_directive(debug: bool) -> &'static str {
    if debug { "cryptvol=debug" } else { "cryptvol=info" }
}

/// Build the event filter. Non-empty `env` directives replace the default
/// entirely; `--debug` only raises the default.
///
/// # Errors
///
/// Fails if `env` holds an unparsable directive.
pub fn env_filter(debug: bool, env: Option<&str>) -> Result<EnvFilter> {
    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .wrap_err_with(|| format!("invalid {} value {directives:?}", EnvFilter::DEFAULT_ENV)),
        None => Ok(EnvFilter::new(default_directive(debug))),
    }
}

/// Install the global subscriber.
///
/// Console output goes to stderr without timestamps. The optional log file
/// is appended to, carries timestamps and has ANSI colours disabled.
///
/// # Errors
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = env_filter(debug, std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())?;

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .wrap_err_with(|| format!("creating {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("opening log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .without_time(),
        )
        .with(file_layer)
        .with(filter)
        .try_init()?;

    Ok(())
}
