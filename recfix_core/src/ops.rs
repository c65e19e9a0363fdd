//! Typed request/response surface over the whole pipeline.
//!
//! One [`Request`] variant per capability; every outcome, failures included,
//! comes back as a [`Response`].

use crate::api::{VideoPlatform, YouTubeClient};
use crate::cache::RelatedCache;
use crate::config::{validate_api_key_format, RecFixConfig};
use crate::credentials::{BearerToken, CredentialProvider};
use crate::error::{RecFixError, Result};
use crate::fetcher::RelatedFetcher;
use crate::models::{AggregateStats, SaveSummary, VideoCandidate, VideoId};
use crate::orchestrator::BatchOrchestrator;
use crate::playlist::PlaylistWriter;
use crate::ranker;
use crate::resolver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    /// Whether an API key is configured.
    CheckApiKey,
    /// Format-check `api_key` when given; otherwise probe the configured key
    /// against the live API.
    ValidateApiKey {
        #[serde(default)]
        api_key: Option<String>,
    },
    /// The pasted videos themselves followed by the first one's related
    /// videos.
    ProcessManualUrls { urls: Vec<String> },
    /// Aggregate and rank related videos for the selected seeds. Entries may
    /// be ids or URLs.
    FixFeed { selected_videos: Vec<String> },
    Rank { candidates: Vec<VideoCandidate> },
    SaveRecommendations {
        recommendations: Vec<VideoId>,
        #[serde(default)]
        access_token: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Response {
    ApiKeyStatus {
        has_key: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        valid: Option<bool>,
    },
    ManualUrls {
        recommendations: Vec<VideoCandidate>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        rejected: Vec<String>,
    },
    Recommendations {
        recommendations: Vec<VideoCandidate>,
        stats: AggregateStats,
    },
    Ranked { recommendations: Vec<VideoCandidate> },
    PlaylistSaved(SaveSummary),
    Error { code: String, message: String },
}

impl Response {
    pub fn error(err: &RecFixError) -> Self {
        Response::Error {
            code: err.code_str().to_string(),
            message: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

/// The pipeline wired together: fetcher and cache, orchestrator, ranker and
/// playlist writer over one [`VideoPlatform`].
pub struct RecFixService<P: VideoPlatform> {
    orchestrator: BatchOrchestrator<P>,
    writer: PlaylistWriter<P>,
    credentials: Option<Arc<dyn CredentialProvider>>,
    has_api_key: bool,
    rank_limit: usize,
}

impl RecFixService<YouTubeClient> {
    /// Production service over the YouTube Data API.
    pub fn from_config(config: &RecFixConfig) -> Result<Self> {
        let client = YouTubeClient::with_base_url(config.require_api_key()?, &config.api_base_url)?;
        Ok(Self::new(Arc::new(client), config))
    }
}

impl<P: VideoPlatform> RecFixService<P> {
    pub fn new(platform: Arc<P>, config: &RecFixConfig) -> Self {
        let fetcher = RelatedFetcher::with_cache(platform.clone(), RelatedCache::new(config.cache_ttl()))
            .limits(config.fetch_limits());
        let orchestrator = BatchOrchestrator::new(fetcher)
            .with_retry(config.retry_policy())
            .with_config(config.batch_config());
        let writer = PlaylistWriter::new(platform)
            .with_retry(config.retry_policy())
            .with_item_pacing(config.item_pacing());
        Self {
            orchestrator,
            writer,
            credentials: None,
            has_api_key: config.api_key.is_some(),
            rank_limit: config.rank_limit,
        }
    }

    /// Where to get a bearer token when a save request carries none.
    pub fn with_credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    pub fn orchestrator(&self) -> &BatchOrchestrator<P> {
        &self.orchestrator
    }

    pub fn writer(&self) -> &PlaylistWriter<P> {
        &self.writer
    }

    /// Never fails: errors come back as [`Response::Error`].
    pub async fn handle(&self, request: Request) -> Response {
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(code = e.code_str(), error = %e, "Request failed");
                Response::error(&e)
            }
        }
    }

    /// Parse one JSON request and handle it.
    pub async fn handle_json(&self, raw: &str) -> Response {
        match serde_json::from_str::<Request>(raw) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse request");
                Response::Error {
                    code: "parse_error".to_string(),
                    message: format!("Invalid request: {}", e),
                }
            }
        }
    }

    async fn dispatch(&self, request: Request) -> Result<Response> {
        match request {
            Request::CheckApiKey => Ok(Response::ApiKeyStatus {
                has_key: self.has_api_key,
                valid: None,
            }),
            Request::ValidateApiKey { api_key: Some(key) } => {
                validate_api_key_format(&key)?;
                Ok(Response::ApiKeyStatus {
                    has_key: true,
                    valid: Some(true),
                })
            }
            Request::ValidateApiKey { api_key: None } => {
                let probe = self.orchestrator.fetcher().platform().probe_key().await;
                Ok(Response::ApiKeyStatus {
                    has_key: self.has_api_key,
                    valid: Some(probe.is_ok()),
                })
            }
            Request::ProcessManualUrls { urls } => self.process_manual_urls(&urls).await,
            Request::FixFeed { selected_videos } => self.fix_feed(&selected_videos).await,
            Request::Rank { candidates } => Ok(Response::Ranked {
                recommendations: ranker::rank_with_limit(&candidates, self.rank_limit)?,
            }),
            Request::SaveRecommendations {
                recommendations,
                access_token,
            } => {
                let token = self.bearer(access_token).await?;
                let summary = self.writer.save_playlist(&recommendations, &token).await?;
                Ok(Response::PlaylistSaved(summary))
            }
        }
    }

    async fn process_manual_urls(&self, urls: &[String]) -> Result<Response> {
        let resolved = resolver::resolve_all(urls, false);
        tracing::info!(
            total = urls.len(),
            valid = resolved.ids.len(),
            invalid = resolved.rejected.len(),
            "Processing manual URLs"
        );
        let first = resolved
            .ids
            .first()
            .ok_or_else(|| RecFixError::InvalidInput("No valid YouTube URLs found".to_string()))?;

        let fetcher = self.orchestrator.fetcher();
        let mut recommendations = fetcher.video_details(&resolved.ids).await?;
        recommendations.extend(fetcher.fetch_related(first).await?);

        Ok(Response::ManualUrls {
            recommendations,
            rejected: resolved.rejected,
        })
    }

    async fn fix_feed(&self, selected: &[String]) -> Result<Response> {
        let resolved = resolver::resolve_all(selected, true);
        if resolved.ids.is_empty() {
            return Err(RecFixError::InvalidInput("No videos selected".to_string()));
        }
        let report = self.orchestrator.aggregate_report(&resolved.ids).await;
        let recommendations = ranker::rank_with_limit(&report.candidates, self.rank_limit)?;
        Ok(Response::Recommendations {
            recommendations,
            stats: report.stats,
        })
    }

    async fn bearer(&self, explicit: Option<String>) -> Result<BearerToken> {
        if let Some(raw) = explicit {
            return BearerToken::new(raw);
        }
        match &self.credentials {
            Some(provider) => provider.bearer_token().await,
            None => Err(RecFixError::Authentication(
                "Not authenticated. Please sign in and try again.".to_string(),
            )),
        }
    }
}
