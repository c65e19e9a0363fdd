//! In-memory, time-boxed cache of related-video results keyed by seed id.
//!
//! Expiry is lazy: a stale entry is treated as absent when read, and is only
//! physically dropped when overwritten or by an explicit [`RelatedCache::purge_expired`].

use crate::models::{VideoCandidate, VideoId};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Default time-to-live: 30 minutes.
pub const DEFAULT_TTL_SECS: i64 = 30 * 60;

#[derive(Debug, Clone)]
struct CacheEntry {
    candidates: Vec<VideoCandidate>,
    fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct RelatedCache {
    entries: Mutex<HashMap<VideoId, CacheEntry>>,
    ttl: Duration,
}

impl Default for RelatedCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECS))
    }
}

impl RelatedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, seed: &VideoId) -> Option<Vec<VideoCandidate>> {
        self.get_at(seed, Utc::now())
    }

    /// Fresh entry for `seed` as of `now`; `now - fetched_at` must be
    /// strictly below the TTL.
    pub fn get_at(&self, seed: &VideoId, now: DateTime<Utc>) -> Option<Vec<VideoCandidate>> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(seed)?;
        if now - entry.fetched_at < self.ttl {
            Some(entry.candidates.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, seed: VideoId, candidates: Vec<VideoCandidate>) {
        self.insert_at(seed, candidates, Utc::now());
    }

    /// Last writer wins.
    pub fn insert_at(&self, seed: VideoId, candidates: Vec<VideoCandidate>, now: DateTime<Utc>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                seed,
                CacheEntry {
                    candidates,
                    fetched_at: now,
                },
            );
        }
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Drop every entry that is stale as of `now`; returns how many went.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, e| now - e.fetched_at < ttl);
        before - entries.len()
    }
}
