//! Fake backend and probe shared by the loader integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyline_core::error::FetchError;
use storyline_core::models::{Story, StoryDetail};
use storyline_core::navigation::NavigationState;
use storyline_core::ports::{AssetProbe, FragmentStore, MemoryFragment, StoryApi};
use storyline_loader::{
    CatalogLoader, DetailLoader, LoadingOrchestrator, MediaUrlBuilder, Preloader,
};

pub const BASE: &str = "http://cdn.test";

/// In-memory story backend that records every request it serves
#[derive(Default)]
pub struct FakeApi {
    pub stories: Vec<Story>,
    pub catalog_status: Option<u16>,
    pub details: HashMap<String, StoryDetail>,
    pub failing_details: HashSet<String>,
    pub paths: HashMap<String, serde_json::Value>,
    pub delay: Duration,
    pub log: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new(stories: Vec<Story>) -> Self {
        Self {
            stories,
            delay: Duration::from_millis(2),
            ..Self::default()
        }
    }

    pub fn with_detail(mut self, id: &str, detail: StoryDetail) -> Self {
        self.details.insert(id.to_string(), detail);
        self
    }

    pub fn with_failing_detail(mut self, id: &str) -> Self {
        self.failing_details.insert(id.to_string());
        self
    }

    pub fn with_path(mut self, path: &str, geometry: serde_json::Value) -> Self {
        self.paths.insert(path.to_string(), geometry);
        self
    }

    pub fn with_catalog_status(mut self, status: u16) -> Self {
        self.catalog_status = Some(status);
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn detail_order_is_empty(&self) -> bool {
        self.log().iter().all(|entry| !entry.starts_with("detail:"))
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl StoryApi for FakeApi {
    async fn fetch_catalog(&self) -> Result<Vec<Story>, FetchError> {
        self.record("catalog".to_string());
        if let Some(status) = self.catalog_status {
            return Err(FetchError::Status {
                url: format!("{}/story", BASE),
                status,
            });
        }
        Ok(self.stories.clone())
    }

    async fn fetch_detail(&self, story: &Story) -> Result<StoryDetail, FetchError> {
        self.record(format!("detail:start:{}", story.id));
        tokio::time::sleep(self.delay).await;
        self.record(format!("detail:end:{}", story.id));

        if self.failing_details.contains(&story.id) {
            return Err(FetchError::Status {
                url: format!("{}/story/{}", BASE, story.id),
                status: 500,
            });
        }
        Ok(self.details.get(&story.id).cloned().unwrap_or_default())
    }

    async fn fetch_path(
        &self,
        story: &Story,
        path_json: &str,
    ) -> Result<serde_json::Value, FetchError> {
        self.record(format!("path:start:{}{}", story.id, path_json));
        tokio::time::sleep(self.delay).await;
        self.record(format!("path:end:{}{}", story.id, path_json));

        self.paths.get(path_json).cloned().ok_or_else(|| FetchError::Status {
            url: format!("{}/story/{}{}", BASE, story.id, path_json),
            status: 404,
        })
    }
}

/// Probe that succeeds for every URL except those containing "broken".
/// Clones share one record of probed URLs.
#[derive(Clone, Default)]
pub struct FakeProbe {
    pub probed: Arc<Mutex<Vec<String>>>,
}

impl FakeProbe {
    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }

    fn record(&self, url: &str) -> Result<(), FetchError> {
        self.probed.lock().unwrap().push(url.to_string());
        if url.contains("broken") {
            Err(FetchError::Transport {
                url: url.to_string(),
                reason: "decode failed".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AssetProbe for FakeProbe {
    async fn probe_image(&self, url: &str) -> Result<(), FetchError> {
        self.record(url)
    }

    async fn probe_video(&self, url: &str) -> Result<(), FetchError> {
        self.record(url)
    }
}

pub struct Harness {
    pub api: Arc<FakeApi>,
    pub preloader: Arc<Preloader<FakeProbe>>,
    pub probe: FakeProbe,
    pub fragment: Arc<MemoryFragment>,
    pub orchestrator: LoadingOrchestrator<FakeApi, FakeProbe>,
}

impl Harness {
    pub fn new(api: FakeApi, fragment: MemoryFragment, map_features: bool) -> Self {
        let api = Arc::new(api);
        let probe = FakeProbe::default();
        let preloader = Arc::new(Preloader::new(probe.clone()));
        let fragment = Arc::new(fragment);
        let urls = MediaUrlBuilder::new(BASE, true).unwrap();

        let catalog = CatalogLoader::new(
            api.clone(),
            preloader.clone(),
            urls.clone(),
            fragment.clone() as Arc<dyn FragmentStore>,
        );
        let detail = DetailLoader::new(api.clone(), preloader.clone(), urls, map_features);
        let state = NavigationState::new(fragment.clone()).into_shared();

        Self {
            api,
            preloader,
            probe,
            fragment,
            orchestrator: LoadingOrchestrator::new(catalog, detail, state),
        }
    }

    pub fn state(&self) -> std::sync::RwLockReadGuard<'_, NavigationState> {
        self.orchestrator.state().read().unwrap()
    }

    pub fn detail_order(&self) -> Vec<String> {
        self.api
            .log()
            .into_iter()
            .filter_map(|entry| entry.strip_prefix("detail:start:").map(str::to_string))
            .collect()
    }
}

pub fn three_stories() -> Vec<Story> {
    vec![
        Story::new("jan", "2024-01-01").with_cover("/cover.jpg"),
        Story::new("mar", "2024-03-01").with_cover("/cover.jpg").with_last_update(7u64),
        Story::new("feb", "2024-02-01"),
    ]
}
