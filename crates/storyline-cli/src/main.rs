//! Storyline CLI - browse photo and video stories from a story server

mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;
mod output_types;
mod progress;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use errors::CliError;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Runtime::new()?;

    if let Err(error) = runtime.block_on(commands::execute(cli)) {
        if let Some(cli_error) = error.downcast_ref::<CliError>() {
            cli_error.display();
            std::process::exit(1);
        }
        return Err(error);
    }

    Ok(())
}
