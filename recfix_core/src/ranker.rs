//! Deduplication and frequency/recency ranking of aggregated candidates.

use crate::error::{RecFixError, Result};
use crate::models::{VideoCandidate, VideoId};
use std::collections::HashMap;

/// Maximum number of recommendations returned by [`rank`].
pub const MAX_RECOMMENDATIONS: usize = 50;

/// Rank with the default cap of [`MAX_RECOMMENDATIONS`].
pub fn rank(raw: &[VideoCandidate]) -> Result<Vec<VideoCandidate>> {
    rank_with_limit(raw, MAX_RECOMMENDATIONS)
}

/// Deduplicate by id, score each unique video and keep the best `limit`.
///
/// The kept representative for an id is the last one seen, placed at the
/// position where the id was first encountered. Score is
/// `frequency * 10 + published_ms / 1e9`, a missing publish date counting as
/// the epoch. Ties keep encounter order.
pub fn rank_with_limit(raw: &[VideoCandidate], limit: usize) -> Result<Vec<VideoCandidate>> {
    let mut slots: HashMap<&VideoId, usize> = HashMap::with_capacity(raw.len());
    let mut unique: Vec<(&VideoCandidate, u32)> = Vec::new();

    for candidate in raw {
        match slots.get(&candidate.id) {
            Some(&slot) => {
                let entry = &mut unique[slot];
                entry.0 = candidate;
                entry.1 += 1;
            }
            None => {
                slots.insert(&candidate.id, unique.len());
                unique.push((candidate, 1));
            }
        }
    }

    let mut scored: Vec<(f64, &VideoCandidate)> = unique
        .into_iter()
        .map(|(candidate, frequency)| (score(candidate, frequency), candidate))
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let ranked: Vec<VideoCandidate> = scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.clone())
        .collect();

    tracing::debug!(
        total = raw.len(),
        unique = slots.len(),
        kept = ranked.len(),
        "Ranked candidates"
    );

    if ranked.is_empty() {
        return Err(RecFixError::NoRecommendations);
    }
    Ok(ranked)
}

fn score(candidate: &VideoCandidate, frequency: u32) -> f64 {
    let published_ms = candidate
        .published_at
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0);
    f64::from(frequency) * 10.0 + published_ms as f64 / 1_000_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn cand(id: &str) -> VideoCandidate {
        VideoCandidate::new(id.into(), id, "c")
    }

    fn ids(v: &[VideoCandidate]) -> Vec<&str> {
        v.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_empty_is_no_recommendations() {
        assert!(matches!(rank(&[]), Err(RecFixError::NoRecommendations)));
    }

    #[test]
    fn test_frequency_decides_between_close_dates() {
        // 30 days apart is worth ~2.6 points, less than one extra occurrence.
        let older = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let raw = vec![
            cand("b").with_published_at(newer),
            cand("a").with_published_at(older),
            cand("a").with_published_at(older),
        ];
        assert_eq!(ids(&rank(&raw).unwrap()), vec!["a", "b"]);
    }

    #[test]
    fn test_years_of_recency_outweigh_frequency() {
        let old = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
        let new = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let raw = vec![
            cand("b").with_published_at(new),
            cand("a").with_published_at(old),
            cand("a").with_published_at(old),
        ];
        assert_eq!(ids(&rank(&raw).unwrap()), vec!["b", "a"]);
    }

    #[test]
    fn test_recency_breaks_frequency_ties() {
        let old = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
        let new = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let raw = vec![
            cand("undated"),
            cand("old").with_published_at(old),
            cand("new").with_published_at(new),
        ];
        assert_eq!(ids(&rank(&raw).unwrap()), vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_equal_scores_keep_encounter_order() {
        let raw = vec![cand("x"), cand("y"), cand("z")];
        assert_eq!(ids(&rank(&raw).unwrap()), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_last_seen_representative_wins() {
        let raw = vec![
            VideoCandidate::new("a".into(), "first", "c"),
            cand("b"),
            VideoCandidate::new("a".into(), "second", "c"),
        ];
        let out = rank(&raw).unwrap();
        assert_eq!(out[0].title, "second");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_truncates_to_limit() {
        let raw: Vec<_> = (0..80).map(|i| cand(&format!("v{}", i))).collect();
        assert_eq!(rank(&raw).unwrap().len(), MAX_RECOMMENDATIONS);
        assert_eq!(rank_with_limit(&raw, 5).unwrap().len(), 5);
    }
}
