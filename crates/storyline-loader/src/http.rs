use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use storyline_core::error::FetchError;
use storyline_core::models::{Story, StoryDetail};
use storyline_core::ports::StoryApi;

use crate::urls::MediaUrlBuilder;

/// Story backend reached over HTTP
pub struct HttpStoryApi {
    /// URL builder holding the API base
    urls: MediaUrlBuilder,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpStoryApi {
    /// Reuse an existing client (shared connection pool)
    pub fn with_client(urls: MediaUrlBuilder, client: reqwest::Client) -> Self {
        Self { urls, client }
    }

    pub fn urls(&self) -> &MediaUrlBuilder {
        &self.urls
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> std::result::Result<T, FetchError> {
        tracing::debug!(url, "GET");

        let response = self.client.get(url).send().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Decode {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }
}

#[async_trait]
impl StoryApi for HttpStoryApi {
    async fn fetch_catalog(&self) -> std::result::Result<Vec<Story>, FetchError> {
        let envelope: CatalogEnvelope = self.get_json(&self.urls.catalog_url()).await?;
        Ok(envelope.stories)
    }

    async fn fetch_detail(&self, story: &Story) -> std::result::Result<StoryDetail, FetchError> {
        let envelope: DetailEnvelope = self.get_json(&self.urls.detail_url(story)).await?;
        Ok(envelope.data)
    }

    async fn fetch_path(
        &self,
        story: &Story,
        path_json: &str,
    ) -> std::result::Result<serde_json::Value, FetchError> {
        self.get_json(&self.urls.media_url(story, path_json)).await
    }
}

/// Response body of `GET /story`
#[derive(Debug, Deserialize)]
struct CatalogEnvelope {
    #[serde(default)]
    stories: Vec<Story>,
}

/// Response body of `GET /story/{id}`
#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    data: StoryDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_envelope() {
        let envelope: CatalogEnvelope = serde_json::from_str(
            r#"{"stories": [{"id": "a", "date": "2024-01-01"}, {"id": "b", "date": "2023:12:24 18:00:00"}]}"#,
        )
        .unwrap();
        assert_eq!(envelope.stories.len(), 2);

        let empty: CatalogEnvelope = serde_json::from_str("{}").unwrap();
        assert!(empty.stories.is_empty());
    }

    #[test]
    fn test_detail_envelope_requires_data() {
        assert!(serde_json::from_str::<DetailEnvelope>(r#"{"medias": []}"#).is_err());
        let envelope: DetailEnvelope =
            serde_json::from_str(r#"{"data": {"medias": [{"src": "1.jpg", "type": "photo"}]}}"#)
                .unwrap();
        assert_eq!(envelope.data.medias.len(), 1);
    }

    #[test]
    fn test_api_creation() {
        let urls = MediaUrlBuilder::new("http://localhost:3000", true).unwrap();
        let api = HttpStoryApi::with_client(urls, reqwest::Client::new());
        assert_eq!(api.urls().catalog_url(), "http://localhost:3000/story");
    }
}
