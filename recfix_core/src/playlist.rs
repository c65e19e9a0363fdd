//! Export of a recommendation list as a private playlist.

use crate::api::{NewPlaylist, Privacy, VideoPlatform};
use crate::credentials::BearerToken;
use crate::error::{RecFixError, Result};
use crate::models::{ItemFailure, SaveSummary, VideoId};
use crate::retry::RetryPolicy;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use std::time::Duration;

pub const PLAYLIST_DESCRIPTION: &str = "Curated recommendations by RecFix";

pub fn playlist_title(date: NaiveDate) -> String {
    format!("RecFix Recommendations {}", date.format("%Y-%m-%d"))
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={}", playlist_id)
}

pub struct PlaylistWriter<P: VideoPlatform> {
    platform: Arc<P>,
    retry: RetryPolicy,
    item_pacing: Duration,
}

impl<P: VideoPlatform> PlaylistWriter<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self {
            platform,
            retry: RetryPolicy::default(),
            item_pacing: Duration::from_millis(500),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_item_pacing(mut self, pacing: Duration) -> Self {
        self.item_pacing = pacing;
        self
    }

    /// Create a private playlist stamped with today's date and append `ids`
    /// to it one at a time.
    ///
    /// Items whose append still fails after retries are recorded in
    /// [`SaveSummary::failures`] and skipped; only a failed creation or a run
    /// where nothing was added is an error.
    pub async fn save_playlist(&self, ids: &[VideoId], token: &BearerToken) -> Result<SaveSummary> {
        if ids.is_empty() {
            return Err(RecFixError::InvalidInput("No videos selected".to_string()));
        }

        let request = NewPlaylist {
            title: playlist_title(Local::now().date_naive()),
            description: PLAYLIST_DESCRIPTION.to_string(),
            default_language: "en".to_string(),
            privacy: Privacy::Private,
        };
        let playlist_id = self
            .retry
            .run("create_playlist", || self.platform.create_playlist(token, &request))
            .await
            .map_err(|e| RecFixError::PlaylistCreateFailed(e.to_string()))?;
        tracing::info!(playlist_id = %playlist_id, title = %request.title, "Created playlist");

        let mut succeeded = 0usize;
        let mut failures = Vec::new();
        for (index, video_id) in ids.iter().enumerate() {
            if index > 0 && !self.item_pacing.is_zero() {
                tokio::time::sleep(self.item_pacing).await;
            }
            let label = format!("insert_playlist_item({})", video_id);
            let outcome = self
                .retry
                .run(&label, || {
                    self.platform
                        .insert_playlist_item(token, &playlist_id, video_id)
                })
                .await;
            match outcome {
                Ok(item_id) => {
                    tracing::debug!(video_id = %video_id, item_id = %item_id, "Added video to playlist");
                    succeeded += 1;
                }
                Err(e) => {
                    tracing::warn!(video_id = %video_id, error = %e, "Failed to add video after retries");
                    failures.push(ItemFailure {
                        video_id: video_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            playlist_id = %playlist_id,
            total = ids.len(),
            succeeded,
            failed = failures.len(),
            "Playlist export finished"
        );

        if succeeded == 0 {
            return Err(RecFixError::AllItemsFailed { attempted: ids.len() });
        }

        Ok(SaveSummary {
            playlist_url: playlist_url(&playlist_id),
            playlist_id,
            total: ids.len(),
            succeeded,
            failed: failures.len(),
            failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SearchHit, SearchQuery, VideoDetails};
    use async_trait::async_trait;

    struct RevokedToken;

    #[async_trait]
    impl VideoPlatform for RevokedToken {
        async fn video_details(&self, _ids: &[VideoId]) -> Result<Vec<VideoDetails>> {
            Ok(Vec::new())
        }
        async fn search(&self, _query: &SearchQuery) -> Result<Vec<SearchHit>> {
            Ok(Vec::new())
        }
        async fn create_playlist(&self, _: &BearerToken, _: &NewPlaylist) -> Result<String> {
            Err(RecFixError::Authentication("credential rejected".into()))
        }
        async fn insert_playlist_item(
            &self,
            _: &BearerToken,
            _: &str,
            _: &VideoId,
        ) -> Result<String> {
            unreachable!("no playlist was created")
        }
        async fn probe_key(&self) -> Result<usize> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_rejected_credential_fails_creation() {
        let writer = PlaylistWriter::new(Arc::new(RevokedToken)).with_retry(RetryPolicy::none());
        let token = BearerToken::new("ya29.old").unwrap();
        let err = writer
            .save_playlist(&[VideoId::from("v1")], &token)
            .await
            .unwrap_err();
        assert_eq!(err.code_str(), "playlist_create_failed");
        assert!(err.to_string().contains("credential rejected"));
    }

    #[test]
    fn test_title_and_url() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(playlist_title(date), "RecFix Recommendations 2024-03-09");
        assert_eq!(
            playlist_url("PL123"),
            "https://www.youtube.com/playlist?list=PL123"
        );
    }
}
