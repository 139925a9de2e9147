use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storyline_core::config::CliConfigOverrides;

/// Storyline - photo and video stories with GPS tracks
#[derive(Parser, Debug)]
#[command(name = "storyline")]
#[command(about = "Browse photo and video stories from a story server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Story server base URL (e.g., https://stories.example.com/api)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Configuration file (defaults to ./storyline.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Do not fetch GPS tracks
    #[arg(long, global = true)]
    pub no_map: bool,

    /// Do not append the story revision to asset URLs
    #[arg(long, global = true)]
    pub no_cache_busting: bool,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub http_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Flags that take precedence over file and environment configuration
    pub fn config_overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            api_url: self.api_url.clone(),
            cache_busting: self.no_cache_busting.then_some(false),
            map_features: self.no_map.then_some(false),
            http_timeout_secs: self.http_timeout,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List stories, newest first
    List,

    /// Show the medias and tracks of one story
    Show(ShowArgs),

    /// Page through stories and medias interactively
    Browse(BrowseArgs),

    /// Show the effective configuration and where each value comes from
    Config,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Story identifier
    pub id: String,
}

#[derive(Parser, Debug)]
pub struct BrowseArgs {
    /// Story to open first (defaults to the newest)
    #[arg(long, value_name = "ID")]
    pub story: Option<String>,
}
