use std::sync::Arc;
use std::time::Duration;
use storyline_core::config::LayeredConfig;
use storyline_core::navigation::SharedNavigation;
use storyline_core::ports::FragmentStore;
use storyline_core::{Result, StorylineError};

use crate::catalog::CatalogLoader;
use crate::detail::DetailLoader;
use crate::http::HttpStoryApi;
use crate::orchestrator::LoadingOrchestrator;
use crate::preloader::Preloader;
use crate::probe::HttpAssetProbe;
use crate::urls::MediaUrlBuilder;

/// Loaders wired to the HTTP backend, sharing one client and one preloader
pub struct HttpLoaders {
    pub catalog: CatalogLoader<HttpStoryApi, HttpAssetProbe>,
    pub detail: DetailLoader<HttpStoryApi, HttpAssetProbe>,
    pub preloader: Arc<Preloader<HttpAssetProbe>>,
}

impl HttpLoaders {
    pub fn from_config(config: &LayeredConfig, fragment: Arc<dyn FragmentStore>) -> Result<Self> {
        let urls = MediaUrlBuilder::new(config.require_api_url()?, config.cache_busting.value)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs.value))
            .build()
            .map_err(|e| StorylineError::ConfigInvalid {
                key: "http_timeout_secs".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        let api = Arc::new(HttpStoryApi::with_client(urls.clone(), client.clone()));
        let preloader = Arc::new(Preloader::new(HttpAssetProbe::new(client)));

        tracing::debug!(
            api_url = urls.base(),
            map_features = config.map_features.value,
            cache_busting = config.cache_busting.value,
            "HTTP loaders ready"
        );

        Ok(Self {
            catalog: CatalogLoader::new(api.clone(), preloader.clone(), urls.clone(), fragment),
            detail: DetailLoader::new(api, preloader.clone(), urls, config.map_features.value),
            preloader,
        })
    }

    pub fn into_orchestrator(
        self,
        state: SharedNavigation,
    ) -> LoadingOrchestrator<HttpStoryApi, HttpAssetProbe> {
        LoadingOrchestrator::new(self.catalog, self.detail, state)
    }
}
