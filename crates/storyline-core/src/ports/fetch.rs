use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{Story, StoryDetail};

/// Port for the story backend
#[async_trait]
pub trait StoryApi: Send + Sync {
    /// Fetch the raw, unsorted story list
    async fn fetch_catalog(&self) -> Result<Vec<Story>, FetchError>;

    /// Fetch the raw payload of one story
    async fn fetch_detail(&self, story: &Story) -> Result<StoryDetail, FetchError>;

    /// Fetch the track geometry referenced by a stat's `path_json`
    async fn fetch_path(
        &self,
        story: &Story,
        path_json: &str,
    ) -> Result<serde_json::Value, FetchError>;
}

/// Port for warming up media assets ahead of display
#[async_trait]
pub trait AssetProbe: Send + Sync {
    /// Load an image fully
    async fn probe_image(&self, url: &str) -> Result<(), FetchError>;

    /// Load enough of a video to show its first frame
    async fn probe_video(&self, url: &str) -> Result<(), FetchError>;
}
