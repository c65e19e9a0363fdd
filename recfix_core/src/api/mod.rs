//! Video platform API surface.
//!
//! [`VideoPlatform`] is the seam between the core and the network: the
//! fetcher, orchestrator and playlist writer only ever talk to this trait, and
//! [`YouTubeClient`] is the production implementation over the YouTube Data
//! API v3.

pub mod types;
mod youtube;

pub use youtube::{YouTubeClient, DEFAULT_API_BASE_URL};

use crate::credentials::BearerToken;
use crate::error::{RecFixError, Result};
use crate::models::VideoId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::ApiErrorBody;

/// Metadata of a single video as returned by the details endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub id: VideoId,
    pub title: String,
    pub channel: String,
    pub category_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// One search result. Every field except the id may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub video_id: Option<String>,
    /// False when the API returned the item without a snippet.
    pub has_snippet: bool,
    pub title: Option<String>,
    pub channel: Option<String>,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<String>,
}

/// Keyword search scoped to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub category_id: Option<String>,
    pub max_results: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlaylist {
    pub title: String,
    pub description: String,
    pub default_language: String,
    pub privacy: Privacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Private,
    Unlisted,
    Public,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Private => "private",
            Privacy::Unlisted => "unlisted",
            Privacy::Public => "public",
        }
    }
}

#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Look up metadata for a set of ids. Unknown ids are simply absent from
    /// the result.
    async fn video_details(&self, ids: &[VideoId]) -> Result<Vec<VideoDetails>>;

    /// Keyword search restricted to video results, ranked by relevance, with
    /// content-safety filtering disabled.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>>;

    /// Create a playlist on the authenticated account, returning its id.
    async fn create_playlist(&self, token: &BearerToken, playlist: &NewPlaylist)
        -> Result<String>;

    /// Append a video to a playlist, returning the playlist item id.
    async fn insert_playlist_item(
        &self,
        token: &BearerToken,
        playlist_id: &str,
        video_id: &VideoId,
    ) -> Result<String>;

    /// Cheap authenticated read used to validate an API key. Returns the
    /// number of items the probe produced.
    async fn probe_key(&self) -> Result<usize>;
}

/// Translate an API error payload (or a bare HTTP status) into a user-facing
/// [`RecFixError::Upstream`].
pub fn map_api_error(body: Option<&ApiErrorBody>, status: u16, status_text: &str) -> RecFixError {
    if let Some(detail) = body.and_then(|b| b.errors.first()) {
        let reason = detail.reason.clone().unwrap_or_default();
        let message = match reason.as_str() {
            "quotaExceeded" => "YouTube API quota exceeded. Please try again tomorrow.".to_string(),
            "keyInvalid" => {
                "The API key is invalid. Please check your YouTube Data API v3 key.".to_string()
            }
            "keyExpired" => {
                "The API key has expired. Please update your YouTube Data API v3 key.".to_string()
            }
            _ => detail
                .message
                .clone()
                .or_else(|| body.and_then(|b| b.message.clone()))
                .unwrap_or_else(|| format!("YouTube API error: {}", reason)),
        };
        return RecFixError::upstream(reason, message);
    }

    let code = body.and_then(|b| b.code).unwrap_or(status);
    let fallback = body
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| status_text.to_string());
    let message = match code {
        403 => "Access denied. Please check if YouTube Data API v3 is enabled for your API key."
            .to_string(),
        400 => "Invalid request. Please check the video IDs are correct.".to_string(),
        429 => "Too many requests. Please try again later.".to_string(),
        _ => format!("API error ({}): {}", code, fallback),
    };
    RecFixError::upstream(format!("http_{}", code), message)
}
