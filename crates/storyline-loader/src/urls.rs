//! URL construction for the story API and its media assets

use reqwest::Url;
use storyline_core::models::Story;
use storyline_core::{Result, StorylineError};

/// Builds endpoint and asset URLs below the API base
#[derive(Debug, Clone)]
pub struct MediaUrlBuilder {
    base: Url,
    cache_busting: bool,
}

impl MediaUrlBuilder {
    /// `cache_busting` appends `?v={last_update}` to asset URLs of stories that carry one
    pub fn new(base: &str, cache_busting: bool) -> Result<Self> {
        let base = Url::parse(base.trim_end_matches('/')).map_err(|e| {
            StorylineError::ConfigInvalid {
                key: "api_url".to_string(),
                reason: format!("Invalid API URL {}: {}", base, e),
            }
        })?;

        if base.cannot_be_a_base() {
            return Err(StorylineError::ConfigInvalid {
                key: "api_url".to_string(),
                reason: format!("API URL {} cannot carry a path", base),
            });
        }

        Ok(Self {
            base,
            cache_busting,
        })
    }

    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    /// `{base}/story`
    pub fn catalog_url(&self) -> String {
        self.with_segments(&["story"]).to_string()
    }

    /// `{base}/story/{id}`
    pub fn detail_url(&self, story: &Story) -> String {
        self.with_segments(&["story", &story.id]).to_string()
    }

    /// `{base}/story/{id}{media_path}[?v={last_update}]`
    pub fn media_url(&self, story: &Story, media_path: &str) -> String {
        let mut url = self.with_segments(&["story", &story.id]);

        let separator = if media_path.starts_with('/') { "" } else { "/" };
        let path = format!("{}{}{}", url.path(), separator, media_path);
        url.set_path(&path);

        if self.cache_busting {
            if let Some(revision) = &story.last_update {
                url.query_pairs_mut().append_pair("v", &revision.to_string());
            }
        }

        url.to_string()
    }

    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // checked in new(): the base can carry a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story() -> Story {
        Story::new("road trip/2024", "2024-01-01").with_last_update(1714640000u64)
    }

    #[test]
    fn test_endpoint_urls() {
        let urls = MediaUrlBuilder::new("https://api.example.com/", true).unwrap();
        assert_eq!(urls.catalog_url(), "https://api.example.com/story");
        assert_eq!(
            urls.detail_url(&story()),
            "https://api.example.com/story/road%20trip%2F2024"
        );
    }

    #[test]
    fn test_base_with_path_prefix() {
        let urls = MediaUrlBuilder::new("https://cdn.example.com/v1", false).unwrap();
        assert_eq!(urls.catalog_url(), "https://cdn.example.com/v1/story");
    }

    #[test]
    fn test_media_url_with_cache_busting() {
        let urls = MediaUrlBuilder::new("https://api.example.com", true).unwrap();
        assert_eq!(
            urls.media_url(&story(), "/medias/IMG_1.jpg"),
            "https://api.example.com/story/road%20trip%2F2024/medias/IMG_1.jpg?v=1714640000"
        );
    }

    #[test]
    fn test_media_url_without_cache_busting() {
        let urls = MediaUrlBuilder::new("https://api.example.com", false).unwrap();
        assert_eq!(
            urls.media_url(&Story::new("lisbon", ""), "cover.jpg"),
            "https://api.example.com/story/lisbon/cover.jpg"
        );
    }

    #[test]
    fn test_media_url_without_revision() {
        let urls = MediaUrlBuilder::new("https://api.example.com", true).unwrap();
        assert_eq!(
            urls.media_url(&Story::new("lisbon", ""), "/track.json"),
            "https://api.example.com/story/lisbon/track.json"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(MediaUrlBuilder::new("not a url", true).is_err());
        assert!(MediaUrlBuilder::new("mailto:someone@example.com", true).is_err());
    }
}
