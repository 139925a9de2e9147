use futures::future::join_all;
use std::sync::Arc;
use storyline_core::models::{Story, StoryDetail};
use storyline_core::ports::{AssetProbe, StoryApi};
use storyline_core::{Result, StorylineError};

use crate::preloader::Preloader;
use crate::urls::MediaUrlBuilder;

/// Loads the full payload of one story
pub struct DetailLoader<A, P> {
    api: Arc<A>,
    preloader: Arc<Preloader<P>>,
    urls: MediaUrlBuilder,

    /// Whether the presentation shows maps; without one, tracks are not fetched
    map_features: bool,
}

impl<A, P> DetailLoader<A, P>
where
    A: StoryApi,
    P: AssetProbe,
{
    pub fn new(
        api: Arc<A>,
        preloader: Arc<Preloader<P>>,
        urls: MediaUrlBuilder,
        map_features: bool,
    ) -> Self {
        Self {
            api,
            preloader,
            urls,
            map_features,
        }
    }

    pub fn map_features(&self) -> bool {
        self.map_features
    }

    /// Fetch and normalize the story, preload its media, then attach tracks.
    ///
    /// Only the detail fetch itself can fail. Media and track failures are
    /// logged and leave the story usable.
    pub async fn load(&self, story: &Story) -> Result<StoryDetail> {
        let mut detail = self
            .api
            .fetch_detail(story)
            .await
            .map_err(|source| StorylineError::DetailFetch {
                story_id: story.id.clone(),
                source,
            })?;

        detail.normalize();

        let media_urls = self.media_urls(story, &detail);
        let report = self.preloader.load(&media_urls).await;

        let tracks = if self.map_features {
            self.attach_tracks(story, &mut detail).await
        } else {
            0
        };

        tracing::info!(
            story_id = %story.id,
            medias = detail.medias.len(),
            medias_failed = report.failed,
            tracks,
            "story loaded"
        );

        Ok(detail)
    }

    /// Absolute URLs of every media of a story, in display order
    pub fn media_urls(&self, story: &Story, detail: &StoryDetail) -> Vec<String> {
        detail
            .medias
            .iter()
            .map(|media| self.urls.media_url(story, &media.src))
            .collect()
    }

    /// Fetch every referenced track concurrently and splice each result into
    /// its own stat. Returns the number of tracks attached.
    async fn attach_tracks(&self, story: &Story, detail: &mut StoryDetail) -> usize {
        let requests: Vec<(usize, String)> = detail
            .track_indices()
            .into_iter()
            .filter_map(|index| detail.stats[index].path_json.clone().map(|path| (index, path)))
            .collect();

        if requests.is_empty() {
            return 0;
        }

        let fetches = requests.into_iter().map(|(index, path)| async move {
            let result = self.api.fetch_path(story, &path).await;
            (index, path, result)
        });

        let mut attached = 0;
        for (index, path, result) in join_all(fetches).await {
            match result {
                Ok(geometry) => {
                    detail.stats[index].path = Some(geometry);
                    attached += 1;
                }
                Err(source) => {
                    let error = StorylineError::PathFetch {
                        story_id: story.id.clone(),
                        path,
                        source,
                    };
                    tracing::warn!(%error, "track unavailable");
                }
            }
        }

        attached
    }
}
