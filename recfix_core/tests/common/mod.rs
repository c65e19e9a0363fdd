#![allow(dead_code)]

use async_trait::async_trait;
use recfix_core::api::{NewPlaylist, SearchHit, SearchQuery, VideoDetails, VideoPlatform};
use recfix_core::credentials::BearerToken;
use recfix_core::error::{RecFixError, Result};
use recfix_core::models::VideoId;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// In-memory platform. A seed's metadata title is the seed id itself, so the
/// search text `"{id} {channel}"` tells the fake which seed is searching.
pub struct FakePlatform {
    related: HashMap<String, Vec<SearchHit>>,
    search_failures: Mutex<HashMap<String, u32>>,
    failing_items: HashSet<String>,
    create_failures: Mutex<u32>,
    search_latency: Duration,
    started: Instant,
    events: Mutex<Vec<(Duration, String)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    pub playlists: Mutex<Vec<NewPlaylist>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            related: HashMap::new(),
            search_failures: Mutex::new(HashMap::new()),
            failing_items: HashSet::new(),
            create_failures: Mutex::new(0),
            search_latency: Duration::from_millis(10),
            started: Instant::now(),
            events: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            playlists: Mutex::new(Vec::new()),
        }
    }

    /// `seed` knows these related ids, all published at `published_at`.
    pub fn with_related(mut self, seed: &str, ids: &[&str], published_at: &str) -> Self {
        let hits = ids
            .iter()
            .map(|id| SearchHit {
                video_id: Some(id.to_string()),
                has_snippet: true,
                title: Some(format!("Title {}", id)),
                channel: Some("Channel".to_string()),
                thumbnail_url: Some(format!("https://img/{}.jpg", id)),
                published_at: Some(published_at.to_string()),
            })
            .collect();
        self.related.insert(seed.to_string(), hits);
        self
    }

    /// The first `times` searches for `seed` fail with a quota error.
    pub fn failing_search(self, seed: &str, times: u32) -> Self {
        self.search_failures
            .lock()
            .unwrap()
            .insert(seed.to_string(), times);
        self
    }

    /// Appending `id` to a playlist always fails.
    pub fn failing_item(mut self, id: &str) -> Self {
        self.failing_items.insert(id.to_string());
        self
    }

    /// The first `times` playlist creations fail.
    pub fn failing_create(self, times: u32) -> Self {
        *self.create_failures.lock().unwrap() = times;
        self
    }

    pub fn events(&self) -> Vec<(Duration, String)> {
        self.events.lock().unwrap().clone()
    }

    pub fn events_with_prefix(&self, prefix: &str) -> Vec<(Duration, String)> {
        self.events()
            .into_iter()
            .filter(|(_, e)| e.starts_with(prefix))
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, event: String) {
        self.events
            .lock()
            .unwrap()
            .push((self.started.elapsed(), event));
    }
}

fn quota_error() -> RecFixError {
    RecFixError::upstream(
        "quotaExceeded",
        "YouTube API quota exceeded. Please try again tomorrow.",
    )
}

#[async_trait]
impl VideoPlatform for FakePlatform {
    async fn video_details(&self, ids: &[VideoId]) -> Result<Vec<VideoDetails>> {
        Ok(ids
            .iter()
            .filter(|id| self.related.contains_key(id.as_str()))
            .map(|id| VideoDetails {
                id: id.clone(),
                title: id.to_string(),
                channel: "Channel".to_string(),
                category_id: Some("10".to_string()),
                thumbnail_url: None,
                published_at: None,
            })
            .collect())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let seed = query.text.split(' ').next().unwrap_or_default().to_string();
        self.record(format!("search:{}", seed));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        sleep(self.search_latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        {
            let mut failures = self.search_failures.lock().unwrap();
            if let Some(left) = failures.get_mut(&seed) {
                if *left > 0 {
                    *left -= 1;
                    return Err(quota_error());
                }
            }
        }
        Ok(self.related.get(&seed).cloned().unwrap_or_default())
    }

    async fn create_playlist(&self, _token: &BearerToken, playlist: &NewPlaylist) -> Result<String> {
        self.record("create".to_string());
        {
            let mut left = self.create_failures.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(RecFixError::upstream("http_403", "Access denied."));
            }
        }
        self.playlists.lock().unwrap().push(playlist.clone());
        Ok("PLfake".to_string())
    }

    async fn insert_playlist_item(
        &self,
        _token: &BearerToken,
        playlist_id: &str,
        video_id: &VideoId,
    ) -> Result<String> {
        self.record(format!("insert:{}", video_id));
        if self.failing_items.contains(video_id.as_str()) {
            return Err(RecFixError::upstream(
                "videoNotFound",
                format!("Video not found: {}", video_id),
            ));
        }
        Ok(format!("{}-{}", playlist_id, video_id))
    }

    async fn probe_key(&self) -> Result<usize> {
        Ok(1)
    }
}

pub fn token() -> BearerToken {
    BearerToken::new("ya29.test-token").unwrap()
}
