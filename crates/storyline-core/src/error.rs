//! Error types for Storyline

use thiserror::Error;

/// Failure of a single HTTP request made through a [`crate::ports::StoryApi`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl FetchError {
    /// URL of the request that failed
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }

    /// HTTP status if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorylineError {
    // Loading errors, one per unit of work that can recover
    #[error("Failed to fetch story catalog: {0}")]
    CatalogFetch(#[source] FetchError),

    #[error("Failed to fetch story '{story_id}': {source}")]
    DetailFetch {
        story_id: String,
        #[source]
        source: FetchError,
    },

    #[error("Asset failed to load: {url} ({reason})")]
    AssetLoad { url: String, reason: String },

    #[error("Failed to fetch track {path} for story '{story_id}': {source}")]
    PathFetch {
        story_id: String,
        path: String,
        #[source]
        source: FetchError,
    },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, StorylineError>;
