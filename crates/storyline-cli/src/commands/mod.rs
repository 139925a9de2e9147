//! Command implementations

mod browse;
mod config;
mod list;
mod show;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::errors;
use crate::output::OutputWriter;
use anyhow::Result;
use std::sync::Arc;
use storyline_core::config::LayeredConfig;
use storyline_core::ports::FragmentStore;
use storyline_loader::HttpLoaders;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let settings = load_config(&cli)?;

    match cli.command {
        Commands::List => list::execute(&settings, &output).await,
        Commands::Show(args) => show::execute(args, &settings, &output).await,
        Commands::Browse(args) => browse::execute(args, &settings, &output).await,
        Commands::Config => config::execute(&settings, &output),
    }
}

/// HTTP loaders for the configured story server
fn connect(settings: &LayeredConfig, fragment: Arc<dyn FragmentStore>) -> Result<HttpLoaders> {
    HttpLoaders::from_config(settings, fragment).map_err(errors::from_loader)
}
