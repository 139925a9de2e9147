use async_trait::async_trait;
use reqwest::header::RANGE;
use storyline_core::error::FetchError;
use storyline_core::ports::AssetProbe;

/// Bytes requested to warm up a video: container metadata plus the first frames
pub const VIDEO_PROBE_BYTES: u64 = 512 * 1024;

/// Warms up assets by downloading them
pub struct HttpAssetProbe {
    client: reqwest::Client,
    video_probe_bytes: u64,
}

impl HttpAssetProbe {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            video_probe_bytes: VIDEO_PROBE_BYTES,
        }
    }

    pub fn with_video_probe_bytes(mut self, bytes: u64) -> Self {
        self.video_probe_bytes = bytes.max(1);
        self
    }

    async fn get(
        &self,
        url: &str,
        range: Option<u64>,
    ) -> Result<reqwest::Response, FetchError> {
        let mut request = self.client.get(url);
        if let Some(bytes) = range {
            request = request.header(RANGE, format!("bytes=0-{}", bytes - 1));
        }

        let response = request.send().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl AssetProbe for HttpAssetProbe {
    async fn probe_image(&self, url: &str) -> Result<(), FetchError> {
        let response = self.get(url, None).await?;
        response.bytes().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    async fn probe_video(&self, url: &str) -> Result<(), FetchError> {
        let mut response = self.get(url, Some(self.video_probe_bytes)).await?;

        // Servers that ignore Range answer 200 with the whole file; stop early
        let mut received = 0u64;
        while received < self.video_probe_bytes {
            let chunk = response.chunk().await.map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            match chunk {
                Some(bytes) => received += bytes.len() as u64,
                None => break,
            }
        }

        if received == 0 {
            return Err(FetchError::Decode {
                url: url.to_string(),
                reason: "empty video response".to_string(),
            });
        }

        Ok(())
    }
}
