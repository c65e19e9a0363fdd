//! Fans seed videos out to the fetcher in paced, bounded batches.

use crate::api::VideoPlatform;
use crate::fetcher::RelatedFetcher;
use crate::models::{AggregateReport, SeedOutcome, VideoCandidate, VideoId};
use crate::retry::RetryPolicy;
use futures::future::join_all;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Seeds fetched concurrently per batch.
    pub batch_size: usize,
    /// Pause between consecutive batches, not after the last one.
    pub pacing: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 4,
            pacing: Duration::from_millis(500),
        }
    }
}

pub struct BatchOrchestrator<P: VideoPlatform> {
    fetcher: RelatedFetcher<P>,
    retry: RetryPolicy,
    config: BatchConfig,
}

impl<P: VideoPlatform> BatchOrchestrator<P> {
    pub fn new(fetcher: RelatedFetcher<P>) -> Self {
        Self {
            fetcher,
            retry: RetryPolicy::default(),
            config: BatchConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn fetcher(&self) -> &RelatedFetcher<P> {
        &self.fetcher
    }

    /// Concatenation of every seed's related videos in seed-submission
    /// order. Unranked and possibly containing duplicates.
    pub async fn aggregate(&self, seeds: &[VideoId]) -> Vec<VideoCandidate> {
        self.aggregate_report(seeds).await.candidates
    }

    /// Same run as [`aggregate`](Self::aggregate), keeping per-seed outcomes.
    ///
    /// A seed whose fetch still fails after retries contributes an empty
    /// sequence; it never aborts the batch or the run.
    pub async fn aggregate_report(&self, seeds: &[VideoId]) -> AggregateReport {
        let started = Instant::now();
        let batch_size = self.config.batch_size.max(1);
        let batch_count = seeds.len().div_ceil(batch_size);
        let mut outcomes = Vec::with_capacity(seeds.len());

        for (index, batch) in seeds.chunks(batch_size).enumerate() {
            tracing::debug!(batch = index + 1, of = batch_count, size = batch.len(), "Processing batch");

            let results = join_all(batch.iter().map(|seed| self.fetch_seed(seed))).await;
            outcomes.extend(results);

            if index + 1 < batch_count && !self.config.pacing.is_zero() {
                tokio::time::sleep(self.config.pacing).await;
            }
        }

        let report = AggregateReport::from_outcomes(outcomes);
        tracing::info!(
            seeds = report.stats.total,
            processed = report.stats.processed,
            failed = report.stats.failed,
            candidates = report.candidates.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregation finished"
        );
        report
    }

    async fn fetch_seed(&self, seed: &VideoId) -> SeedOutcome {
        let label = format!("fetch_related({})", seed);
        match self.retry.run(&label, || self.fetcher.fetch_related(seed)).await {
            Ok(candidates) => SeedOutcome {
                seed: seed.clone(),
                candidates,
                error: None,
            },
            Err(e) => {
                tracing::warn!(seed = %seed, error = %e, "Failed to fetch related videos");
                SeedOutcome {
                    seed: seed.clone(),
                    candidates: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
