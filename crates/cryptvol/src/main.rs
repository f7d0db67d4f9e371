//! cryptvol CLI entry point.

use clap::Parser;
use color_eyre::eyre::Result;

use cryptvol::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    cryptvol::logging::init(cli.debug, cli.log_path()?.as_deref())?;

    // Execute command
    cli.execute().await
}
