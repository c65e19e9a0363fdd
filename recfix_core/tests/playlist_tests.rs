mod common;

use common::{token, FakePlatform};
use recfix_core::api::Privacy;
use recfix_core::error::RecFixError;
use recfix_core::models::VideoId;
use recfix_core::playlist::PlaylistWriter;
use std::sync::Arc;
use std::time::Duration;

fn ids(raw: &[&str]) -> Vec<VideoId> {
    raw.iter().map(|s| VideoId::from(*s)).collect()
}

#[tokio::test(start_paused = true)]
async fn test_one_failing_item_is_a_partial_success() {
    let platform = Arc::new(FakePlatform::new().failing_item("v2"));
    let writer = PlaylistWriter::new(platform.clone());

    let summary = writer
        .save_playlist(&ids(&["v1", "v2", "v3"]), &token())
        .await
        .unwrap();

    assert_eq!(summary.playlist_id, "PLfake");
    assert_eq!(
        summary.playlist_url,
        "https://www.youtube.com/playlist?list=PLfake"
    );
    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].video_id.as_str(), "v2");

    let inserts: Vec<String> = platform
        .events_with_prefix("insert:")
        .into_iter()
        .map(|(_, e)| e)
        .collect();
    assert_eq!(
        inserts,
        vec!["insert:v1", "insert:v2", "insert:v2", "insert:v2", "insert:v3"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_playlist_is_private_and_dated() {
    let platform = Arc::new(FakePlatform::new());
    PlaylistWriter::new(platform.clone())
        .save_playlist(&ids(&["v1"]), &token())
        .await
        .unwrap();

    let created = platform.playlists.lock().unwrap()[0].clone();
    assert!(created.title.starts_with("RecFix Recommendations "));
    assert_eq!(created.title.len(), "RecFix Recommendations YYYY-MM-DD".len());
    assert_eq!(created.description, "Curated recommendations by RecFix");
    assert_eq!(created.default_language, "en");
    assert_eq!(created.privacy, Privacy::Private);
}

#[tokio::test(start_paused = true)]
async fn test_appends_are_sequential_and_paced() {
    let platform = Arc::new(FakePlatform::new());
    PlaylistWriter::new(platform.clone())
        .save_playlist(&ids(&["v1", "v2", "v3"]), &token())
        .await
        .unwrap();

    let times: Vec<Duration> = platform
        .events_with_prefix("insert:")
        .into_iter()
        .map(|(t, _)| t)
        .collect();
    assert_eq!(times.len(), 3);
    assert_eq!(times[1] - times[0], Duration::from_millis(500));
    assert_eq!(times[2] - times[1], Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_every_item_failing() {
    let platform = Arc::new(FakePlatform::new().failing_item("v1").failing_item("v2"));
    let err = PlaylistWriter::new(platform)
        .save_playlist(&ids(&["v1", "v2"]), &token())
        .await
        .unwrap_err();
    assert!(matches!(err, RecFixError::AllItemsFailed { attempted: 2 }));
}

#[tokio::test(start_paused = true)]
async fn test_creation_failure_attempts_no_items() {
    let platform = Arc::new(FakePlatform::new().failing_create(u32::MAX));
    let err = PlaylistWriter::new(platform.clone())
        .save_playlist(&ids(&["v1"]), &token())
        .await
        .unwrap_err();

    assert_eq!(err.code_str(), "playlist_create_failed");
    assert_eq!(platform.events_with_prefix("create").len(), 3);
    assert!(platform.events_with_prefix("insert:").is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_creation_recovers_within_retries() {
    let platform = Arc::new(FakePlatform::new().failing_create(2));
    let summary = PlaylistWriter::new(platform.clone())
        .save_playlist(&ids(&["v1"]), &token())
        .await
        .unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(platform.events_with_prefix("create").len(), 3);
}

#[tokio::test]
async fn test_empty_selection_is_rejected() {
    let platform = Arc::new(FakePlatform::new());
    let err = PlaylistWriter::new(platform.clone())
        .save_playlist(&[], &token())
        .await
        .unwrap_err();
    assert_eq!(err.code_str(), "invalid_input");
    assert!(platform.events().is_empty());
}
