//! View count lookup against the YouTube Data API v3
//!
//! ```text
//! GET {base}/videos?part=statistics&id={video}&key={key}
//!   → {"items": [{"statistics": {"viewCount": "1234567"}}]}
//! ```
//!
//! The count arrives as a decimal string. Every failure mode (transport,
//! status, decode, empty result, missing field) is returned as a
//! [`FetchError`]; nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, trace};

use crate::error::FetchError;

/// Anything that can report the current view count of a video
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch_view_count(&self, video_id: &str) -> Result<u64, FetchError>;
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

/// Client for the `videos.list` endpoint
#[derive(Clone)]
pub struct YouTubeClient {
    /// HTTP client (reused across requests)
    client: reqwest::Client,

    api_key: String,

    /// Base URL without trailing slash
    base_url: String,
}

impl YouTubeClient {
    /// Client relying on reqwest's transport defaults (no request timeout).
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> reqwest::Result<Self> {
        Self::from_builder(api_key, base_url, reqwest::Client::builder())
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        Self::from_builder(api_key, base_url, reqwest::Client::builder().timeout(timeout))
    }

    fn from_builder(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        builder: reqwest::ClientBuilder,
    ) -> reqwest::Result<Self> {
        let base_url: String = base_url.into();
        Ok(Self {
            client: builder.build()?,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MetricsSource for YouTubeClient {
    #[instrument(skip(self))]
    async fn fetch_view_count(&self, video_id: &str) -> Result<u64, FetchError> {
        let url = format!("{}/videos", self.base_url);

        trace!("requesting statistics from {url}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "statistics"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Request(e.without_url().to_string()))?;

        if !response.status().is_success() {
            debug!("metrics provider answered {}", response.status());
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.without_url().to_string()))?;

        let count = parse_view_count(&body)?;
        trace!("video {video_id} has {count} views");
        Ok(count)
    }
}

/// Extract the view count of the first item of a `videos.list` response.
pub fn parse_view_count(body: &str) -> Result<u64, FetchError> {
    let response: VideoListResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let item = response
        .items
        .into_iter()
        .next()
        .ok_or(FetchError::EmptyResult)?;

    let raw = item
        .statistics
        .and_then(|statistics| statistics.view_count)
        .ok_or(FetchError::MissingField("statistics.viewCount"))?;

    raw.trim()
        .parse::<u64>()
        .map_err(|_| FetchError::InvalidCount(raw))
}
