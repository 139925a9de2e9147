use std::sync::Arc;
use storyline_core::models::{sort_newest_first, Catalog, Story};
use storyline_core::ports::{AssetProbe, FragmentStore, StoryApi};
use storyline_core::{Result, StorylineError};

use crate::preloader::Preloader;
use crate::urls::MediaUrlBuilder;

/// Loads the story list and picks the story to show first
pub struct CatalogLoader<A, P> {
    api: Arc<A>,
    preloader: Arc<Preloader<P>>,
    urls: MediaUrlBuilder,
    fragment: Arc<dyn FragmentStore>,
}

impl<A, P> CatalogLoader<A, P>
where
    A: StoryApi,
    P: AssetProbe,
{
    pub fn new(
        api: Arc<A>,
        preloader: Arc<Preloader<P>>,
        urls: MediaUrlBuilder,
        fragment: Arc<dyn FragmentStore>,
    ) -> Self {
        Self {
            api,
            preloader,
            urls,
            fragment,
        }
    }

    pub fn preloader(&self) -> &Arc<Preloader<P>> {
        &self.preloader
    }

    /// Fetch, sort newest first, annotate display dates, select the priority
    /// story and preload every cover
    pub async fn load(&self) -> Result<Catalog> {
        let mut stories = self
            .api
            .fetch_catalog()
            .await
            .map_err(StorylineError::CatalogFetch)?;

        sort_newest_first(&mut stories);
        for story in &mut stories {
            story.annotate();
        }

        let priority = self.select_priority(&stories);

        let covers = self.cover_urls(&stories);
        let report = self.preloader.load(&covers).await;

        let catalog = Catalog { stories, priority };
        tracing::info!(
            stories = catalog.len(),
            priority = ?catalog.priority_story().map(|s| s.id.as_str()),
            covers = covers.len(),
            covers_failed = report.failed,
            "catalog loaded"
        );

        Ok(catalog)
    }

    /// Absolute URLs of every story cover
    pub fn cover_urls(&self, stories: &[Story]) -> Vec<String> {
        stories
            .iter()
            .filter_map(|story| {
                story
                    .cover
                    .as_deref()
                    .map(|cover| self.urls.media_url(story, cover))
            })
            .collect()
    }

    /// The fragment wins when it names a known story; otherwise the newest
    /// story is selected and written back to the fragment
    fn select_priority(&self, stories: &[Story]) -> Option<usize> {
        let first = stories.first()?;

        if let Some(requested) = self.fragment.read() {
            if let Some(index) = stories.iter().position(|s| s.id == requested) {
                return Some(index);
            }
            tracing::warn!(story_id = %requested, "linked story not in catalog, showing newest");
        }

        self.fragment.write(&first.id);
        Some(0)
    }
}
