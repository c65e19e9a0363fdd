//! Shared data types that flow between the fetcher, orchestrator, ranker and
//! playlist writer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque platform-assigned video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VideoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for VideoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A video discovered as potentially relevant.
///
/// Identity is by `id` alone; the remaining fields are display metadata and
/// may differ slightly between two fetches of the same video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCandidate {
    pub id: VideoId,
    pub title: String,
    pub channel: String,
    pub thumbnail_url: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl VideoCandidate {
    /// Candidate with deterministic url and thumbnail derived from the id.
    pub fn new(id: VideoId, title: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            url: Self::watch_url(&id),
            thumbnail_url: Self::fallback_thumbnail(&id),
            id,
            title: title.into(),
            channel: channel.into(),
            published_at: None,
            category_id: None,
        }
    }

    pub fn watch_url(id: &VideoId) -> String {
        format!("https://www.youtube.com/watch?v={}", id)
    }

    pub fn fallback_thumbnail(id: &VideoId) -> String {
        format!("https://i.ytimg.com/vi/{}/default.jpg", id)
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_thumbnail(mut self, thumbnail_url: impl Into<String>) -> Self {
        self.thumbnail_url = thumbnail_url.into();
        self
    }
}

/// What happened to one seed during an aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedOutcome {
    pub seed: VideoId,
    pub candidates: Vec<VideoCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SeedOutcome {
    pub fn is_degraded(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Seeds submitted.
    pub total: usize,
    /// Seeds that produced at least one candidate.
    pub processed: usize,
    /// Seeds that degraded to an empty sequence.
    pub failed: usize,
}

/// Full result of an orchestrator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Concatenation of every seed's candidates in seed-submission order.
    pub candidates: Vec<VideoCandidate>,
    pub outcomes: Vec<SeedOutcome>,
    pub stats: AggregateStats,
}

impl AggregateReport {
    pub fn from_outcomes(outcomes: Vec<SeedOutcome>) -> Self {
        let processed = outcomes.iter().filter(|o| !o.is_degraded()).count();
        let stats = AggregateStats {
            total: outcomes.len(),
            processed,
            failed: outcomes.len() - processed,
        };
        let candidates = outcomes
            .iter()
            .flat_map(|o| o.candidates.iter().cloned())
            .collect();
        Self {
            candidates,
            outcomes,
            stats,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    pub video_id: VideoId,
    pub error: String,
}

/// Outcome of a playlist export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSummary {
    pub playlist_id: String,
    pub playlist_url: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ItemFailure>,
}
