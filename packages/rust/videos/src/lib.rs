//! Video search against the YouTube Data API v3.
//!
//! One `GET /search` per query, filtered server-side to medium-length HD
//! videos ordered by relevance. Each result item becomes a [`VideoDescriptor`].

use std::future::Future;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use coursegen_shared::{CourseGenError, Credentials, Result, VideoDescriptor, YouTubeConfig};

/// User-Agent string for search requests.
const USER_AGENT: &str = concat!("CourseGen/", env!("CARGO_PKG_VERSION"));

/// Most results requested per query, whatever the config asks for.
pub const MAX_RESULTS_PER_QUERY: u32 = 2;

/// Prefix for embeddable player URLs.
const EMBED_BASE: &str = "https://www.youtube.com/embed/";

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Looks up a handful of videos for a search query.
pub trait VideoSearch: Send + Sync {
    /// Search for `query`. Errors are per-query and meant to be absorbed by the caller.
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<VideoDescriptor>>> + Send;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: ItemId,
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    #[serde(rename = "default")]
    lowest: Option<Thumbnail>,
}

impl Thumbnails {
    /// Highest resolution available: high, then medium, then default.
    fn best(self) -> Option<String> {
        self.high
            .or(self.medium)
            .or(self.lowest)
            .map(|t| t.url)
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

// ---------------------------------------------------------------------------
// YouTube client
// ---------------------------------------------------------------------------

/// YouTube Data API search client.
pub struct YouTubeClient {
    client: Client,
    search_url: Url,
    api_key: String,
    max_results: u32,
}

impl YouTubeClient {
    /// Create a client with an explicit API key.
    pub fn new(config: &YouTubeConfig, api_key: impl Into<String>) -> Result<Self> {
        let base = config.base_url.trim_end_matches('/');
        let search_url = Url::parse(&format!("{base}/search")).map_err(|e| {
            CourseGenError::config(format!("invalid YouTube base URL '{}': {e}", config.base_url))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| CourseGenError::Network(format!("failed to build HTTP client: {e}")))?;

        let max_results = config.max_results.clamp(1, MAX_RESULTS_PER_QUERY);
        if max_results != config.max_results {
            warn!(
                configured = config.max_results,
                used = max_results,
                "youtube.max_results out of range, clamped"
            );
        }

        Ok(Self {
            client,
            search_url,
            api_key: api_key.into(),
            max_results,
        })
    }

    /// Create a client if a YouTube key was configured.
    ///
    /// A missing key is a supported degraded mode: returns `Ok(None)` and logs
    /// a single warning, so this should be called once at startup.
    pub fn from_credentials(
        config: &YouTubeConfig,
        credentials: &Credentials,
    ) -> Result<Option<Self>> {
        match &credentials.youtube_api_key {
            Some(key) => Self::new(config, key.clone()).map(Some),
            None => {
                warn!(
                    env = %config.api_key_env,
                    "YouTube API key not set, video search disabled"
                );
                Ok(None)
            }
        }
    }
}

impl VideoSearch for YouTubeClient {
    #[instrument(skip(self), fields(max_results = self.max_results))]
    async fn search(&self, query: &str) -> Result<Vec<VideoDescriptor>> {
        let max_results = self.max_results.to_string();
        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[
                ("key", self.api_key.as_str()),
                ("type", "video"),
                ("part", "snippet"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("order", "relevance"),
                ("videoDuration", "medium"),
                ("videoDefinition", "high"),
            ])
            .send()
            .await
            .map_err(|e| CourseGenError::Network(format!("YouTube search failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CourseGenError::Network(format!("failed to read YouTube body: {e}")))?;

        if !status.is_success() {
            let preview: String = body.chars().take(200).collect();
            return Err(CourseGenError::Enrichment(format!(
                "YouTube search HTTP {status}: {preview}"
            )));
        }

        let videos = parse_search_response(&body)?;
        debug!(count = videos.len(), "videos found");
        Ok(videos)
    }
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Map a search response body to descriptors. Items without a video ID are skipped.
fn parse_search_response(body: &str) -> Result<Vec<VideoDescriptor>> {
    let parsed: SearchResponse = serde_json::from_str(body)
        .map_err(|e| CourseGenError::Enrichment(format!("invalid YouTube response: {e}")))?;

    Ok(parsed.items.into_iter().filter_map(to_descriptor).collect())
}

fn to_descriptor(item: SearchItem) -> Option<VideoDescriptor> {
    let video_id = item.id.video_id.filter(|id| !id.is_empty())?;
    let snippet = item.snippet;

    Some(VideoDescriptor {
        title: decode_entities(&snippet.title),
        channel: decode_entities(&snippet.channel_title),
        thumbnail_url: snippet.thumbnails.best(),
        embed_url: format!("{EMBED_BASE}{video_id}"),
        published_at: snippet.published_at,
    })
}

/// Undo the HTML entity encoding YouTube applies to snippet text.
fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
