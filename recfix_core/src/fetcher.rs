//! Related-video lookup for a single seed.

use crate::api::{SearchHit, SearchQuery, VideoPlatform};
use crate::cache::RelatedCache;
use crate::error::{RecFixError, Result};
use crate::models::{VideoCandidate, VideoId};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    /// Result cap sent with the search request.
    pub search_results: u32,
    /// Candidates kept per seed after filtering.
    pub keep: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            search_results: 25,
            keep: 15,
        }
    }
}

/// Finds candidates related to a seed video by searching for the seed's
/// title and channel within its category.
///
/// Owns its [`RelatedCache`]; a hit younger than the TTL never touches the
/// network. No retries happen here.
pub struct RelatedFetcher<P: VideoPlatform> {
    platform: Arc<P>,
    cache: RelatedCache,
    limits: FetchLimits,
}

impl<P: VideoPlatform> RelatedFetcher<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self::with_cache(platform, RelatedCache::default())
    }

    pub fn with_cache(platform: Arc<P>, cache: RelatedCache) -> Self {
        Self {
            platform,
            cache,
            limits: FetchLimits::default(),
        }
    }

    pub fn limits(mut self, limits: FetchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn cache(&self) -> &RelatedCache {
        &self.cache
    }

    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }

    pub async fn fetch_related(&self, seed: &VideoId) -> Result<Vec<VideoCandidate>> {
        if let Some(cached) = self.cache.get(seed) {
            tracing::debug!(seed = %seed, count = cached.len(), "Using cached related videos");
            return Ok(cached);
        }

        let details = self
            .platform
            .video_details(std::slice::from_ref(seed))
            .await
            .map_err(|e| {
                tracing::debug!(seed = %seed, error = %e, "Seed metadata lookup failed");
                RecFixError::NotFound(seed.clone())
            })?;
        let meta = details
            .into_iter()
            .next()
            .ok_or_else(|| RecFixError::NotFound(seed.clone()))?;

        let query = SearchQuery {
            text: format!("{} {}", meta.title, meta.channel),
            category_id: meta.category_id.clone(),
            max_results: self.limits.search_results,
        };
        let hits = self.platform.search(&query).await.map_err(into_upstream)?;
        let total = hits.len();

        let candidates: Vec<VideoCandidate> = hits
            .into_iter()
            .filter_map(|hit| candidate_from_hit(hit, seed, meta.category_id.as_deref()))
            .take(self.limits.keep)
            .collect();

        tracing::info!(
            seed = %seed,
            total_items = total,
            kept = candidates.len(),
            "Related videos fetched"
        );

        if candidates.is_empty() {
            return Err(RecFixError::NoResults(
                "No valid related videos found for this video".to_string(),
            ));
        }

        self.cache.insert(seed.clone(), candidates.clone());
        Ok(candidates)
    }

    /// Metadata for explicitly named videos, in the order the platform
    /// returns them. Unknown ids are dropped.
    pub async fn video_details(&self, ids: &[VideoId]) -> Result<Vec<VideoCandidate>> {
        let details = self.platform.video_details(ids).await.map_err(into_upstream)?;
        Ok(details
            .into_iter()
            .map(|d| {
                let mut candidate = VideoCandidate::new(d.id, d.title, d.channel);
                if let Some(thumb) = d.thumbnail_url {
                    candidate.thumbnail_url = thumb;
                }
                candidate.published_at = d.published_at;
                candidate.category_id = d.category_id;
                candidate
            })
            .collect())
    }
}

/// Transport and decode failures surface as upstream errors; already
/// classified errors pass through.
fn into_upstream(err: RecFixError) -> RecFixError {
    match err {
        e @ (RecFixError::Upstream { .. } | RecFixError::Authentication(_)) => e,
        other => RecFixError::upstream("transport", other.to_string()),
    }
}

fn candidate_from_hit(hit: SearchHit, seed: &VideoId, category: Option<&str>) -> Option<VideoCandidate> {
    let id = VideoId::new(hit.video_id.filter(|id| !id.is_empty())?);
    if &id == seed || !hit.has_snippet {
        return None;
    }
    let title = hit.title.filter(|t| !t.is_empty()).unwrap_or_else(|| "Untitled".to_string());
    let channel = hit
        .channel
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "Unknown Channel".to_string());

    let mut candidate = VideoCandidate::new(id, title, channel);
    if let Some(thumb) = hit.thumbnail_url {
        candidate.thumbnail_url = thumb;
    }
    candidate.published_at = hit
        .published_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));
    candidate.category_id = category.map(str::to_string);
    Some(candidate)
}
