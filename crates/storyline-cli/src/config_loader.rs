//! Configuration loading for CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use storyline_core::config::LayeredConfig;

use crate::cli::Cli;

/// Picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "storyline.toml";

/// Defaults, then the config file, then `STORYLINE_*` variables, then flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    match &cli.config {
        Some(path) => {
            config = config
                .load_from_file(path)
                .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
        }
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            config = config
                .load_from_file(DEFAULT_CONFIG_FILE)
                .context("Failed to load storyline.toml")?;
        }
        None => {}
    }

    let mut config = config.load_from_env();
    config
        .update_from_cli(cli.config_overrides())
        .context("Invalid command-line option")?;

    Ok(config)
}
