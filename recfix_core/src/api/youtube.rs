use super::types::{
    CreatedResource, ErrorEnvelope, ListResponse, PlaylistInsertBody, PlaylistItemInsertBody,
    PlaylistItemSnippetBody, PlaylistSnippetBody, PlaylistStatusBody, ResourceIdBody,
    SearchResource, VideoResource,
};
use super::{map_api_error, NewPlaylist, SearchHit, SearchQuery, VideoDetails, VideoPlatform};
use crate::credentials::BearerToken;
use crate::error::{RecFixError, Result};
use crate::models::VideoId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API v3 client.
///
/// Reads are authorised with the API key; writes with the caller's bearer
/// credential. No per-request timeout is set beyond reqwest's defaults.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .finish()
    }
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_API_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RecFixError::Config(
                "YouTube API key is missing. Please add your API key in the configuration."
                    .to_string(),
            ));
        }
        let client = Client::builder()
            .user_agent(concat!("recfix/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RecFixError::HttpRequest)?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let started = Instant::now();
        let resp = self
            .client
            .get(self.endpoint(path))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(RecFixError::HttpRequest)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(RecFixError::HttpRequest)?;
        let body: ListResponse<T> = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(map_api_error(
                    None,
                    status.as_u16(),
                    status.canonical_reason().unwrap_or(""),
                ))
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(
            endpoint = path,
            status = status.as_u16(),
            items = body.items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "YouTube API read"
        );

        if !status.is_success() || body.error.is_some() {
            return Err(map_api_error(
                body.error.as_ref(),
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
            ));
        }
        Ok(body.items)
    }

    async fn post_authorized<B: Serialize>(
        &self,
        path: &str,
        part: &str,
        token: &BearerToken,
        body: &B,
    ) -> Result<CreatedResource> {
        let resp = self
            .client
            .post(self.endpoint(path))
            .query(&[("part", part)])
            .header(AUTHORIZATION, token.authorization_header())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(RecFixError::HttpRequest)?;
        let status = resp.status();
        if status.is_success() {
            return read_json(resp).await;
        }

        let text = resp.text().await.unwrap_or_default();
        let envelope: ErrorEnvelope = serde_json::from_str(&text).unwrap_or_default();
        tracing::warn!(
            endpoint = path,
            status = status.as_u16(),
            body = %text,
            "YouTube API write rejected"
        );
        if status.as_u16() == 401 {
            return Err(RecFixError::Authentication(format!(
                "credential rejected ({}). Please sign in again.",
                status
            )));
        }
        Err(map_api_error(
            envelope.error.as_ref(),
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
        ))
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let bytes = resp.bytes().await.map_err(RecFixError::HttpRequest)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn parse_published(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn video_details(&self, ids: &[VideoId]) -> Result<Vec<VideoDetails>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(",");
        let items: Vec<VideoResource> = self
            .get_list(
                "videos",
                &[("part", "snippet".to_string()), ("id", joined)],
            )
            .await?;

        Ok(items
            .into_iter()
            .filter_map(|item| {
                let snippet = item.snippet?;
                Some(VideoDetails {
                    id: VideoId::new(item.id),
                    title: snippet.title.unwrap_or_default(),
                    channel: snippet.channel_title.unwrap_or_default(),
                    category_id: snippet.category_id,
                    thumbnail_url: snippet.thumbnails.as_ref().and_then(|t| t.preferred()),
                    published_at: parse_published(snippet.published_at.as_deref()),
                })
            })
            .collect())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("q", query.text.clone()),
            ("type", "video".to_string()),
            ("maxResults", query.max_results.to_string()),
            ("order", "relevance".to_string()),
            ("safeSearch", "none".to_string()),
        ];
        if let Some(category) = &query.category_id {
            params.push(("videoCategoryId", category.clone()));
        }

        let items: Vec<SearchResource> = self.get_list("search", &params).await?;
        Ok(items
            .into_iter()
            .map(|item| {
                let video_id = item.id.and_then(|id| id.video_id);
                match item.snippet {
                    Some(snippet) => SearchHit {
                        video_id,
                        has_snippet: true,
                        title: snippet.title,
                        channel: snippet.channel_title,
                        thumbnail_url: snippet.thumbnails.as_ref().and_then(|t| t.preferred()),
                        published_at: snippet.published_at,
                    },
                    None => SearchHit {
                        video_id,
                        ..Default::default()
                    },
                }
            })
            .collect())
    }

    async fn create_playlist(
        &self,
        token: &BearerToken,
        playlist: &NewPlaylist,
    ) -> Result<String> {
        let body = PlaylistInsertBody {
            snippet: PlaylistSnippetBody {
                title: &playlist.title,
                description: &playlist.description,
                default_language: &playlist.default_language,
            },
            status: PlaylistStatusBody {
                privacy_status: playlist.privacy.as_str(),
            },
        };
        let created = self
            .post_authorized("playlists", "snippet,status", token, &body)
            .await?;
        Ok(created.id)
    }

    async fn insert_playlist_item(
        &self,
        token: &BearerToken,
        playlist_id: &str,
        video_id: &VideoId,
    ) -> Result<String> {
        let body = PlaylistItemInsertBody {
            snippet: PlaylistItemSnippetBody {
                playlist_id,
                resource_id: ResourceIdBody {
                    kind: "youtube#video",
                    video_id: video_id.as_str(),
                },
            },
        };
        let created = self
            .post_authorized("playlistItems", "snippet", token, &body)
            .await?;
        Ok(created.id)
    }

    async fn probe_key(&self) -> Result<usize> {
        let items: Vec<VideoResource> = self
            .get_list(
                "videos",
                &[
                    ("part", "snippet".to_string()),
                    ("chart", "mostPopular".to_string()),
                    ("maxResults", "1".to_string()),
                    ("regionCode", "US".to_string()),
                ],
            )
            .await?;
        Ok(items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_key() {
        let err = YouTubeClient::new("  ").unwrap_err();
        assert_eq!(err.code_str(), "config_error");
    }

    #[test]
    fn test_base_url_is_normalised() {
        let client = YouTubeClient::with_base_url("k", "http://localhost:9000/v3/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/v3");
        assert_eq!(client.endpoint("search"), "http://localhost:9000/v3/search");
    }

    #[test]
    fn test_debug_hides_key() {
        let client = YouTubeClient::new("secret-key").unwrap();
        assert!(!format!("{:?}", client).contains("secret-key"));
    }

    #[test]
    fn test_parse_published() {
        let dt = parse_published(Some("2024-01-02T03:04:05Z")).unwrap();
        assert_eq!(dt.timestamp(), 1_704_164_645);
        assert!(parse_published(Some("yesterday")).is_none());
        assert!(parse_published(None).is_none());
    }
}
