//! Video identifier resolution from arbitrary user input.
//!
//! Two URL shapes are recognised:
//!
//! - `youtube.com` (and its subdomains such as `www.`, `m.`, `music.`) with the
//!   id in the `v` query parameter
//! - `youtu.be` short links with the id as the first path segment
//!
//! # Example
//!
//! ```rust
//! use recfix_core::resolver::resolve;
//!
//! assert_eq!(resolve("https://www.youtube.com/watch?v=abc123").unwrap().as_str(), "abc123");
//! assert_eq!(resolve("https://youtu.be/abc123").unwrap().as_str(), "abc123");
//! assert!(resolve("https://example.com/x").is_none());
//! ```

use crate::models::VideoId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

static BARE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

/// Which URL shape produced an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlKind {
    /// `youtube.com/watch?v=...`
    Watch,
    /// `youtu.be/...`
    ShortLink,
}

/// Extract the video id from a URL string.
///
/// Returns `None` on malformed input, unsupported hosts, or when the id
/// parameter / path segment is missing. Never panics.
pub fn resolve(input: &str) -> Option<VideoId> {
    resolve_with_kind(input).map(|(id, _)| id)
}

/// Like [`resolve`], also reporting which URL shape matched.
pub fn resolve_with_kind(input: &str) -> Option<(VideoId, UrlKind)> {
    let url = parse_lenient(input)?;
    let host = url.host_str()?.to_ascii_lowercase();

    if host_matches(&host, "youtube.com") {
        let id = url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())?;
        return Some((VideoId::new(id), UrlKind::Watch));
    }

    if host_matches(&host, "youtu.be") {
        let id = url
            .path_segments()?
            .next()
            .filter(|s| !s.is_empty())?
            .to_string();
        return Some((VideoId::new(id), UrlKind::ShortLink));
    }

    None
}

/// True when `input` looks like a bare 11-character video id.
pub fn is_video_id(input: &str) -> bool {
    BARE_ID.is_match(input.trim())
}

/// Result of resolving a batch of pasted inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedInputs {
    /// Unique ids in first-seen order.
    pub ids: Vec<VideoId>,
    /// Inputs that produced no id.
    pub rejected: Vec<String>,
}

/// Resolve many inputs at once, keeping submission order and dropping
/// duplicate ids. Bare ids are accepted when `allow_bare_ids` is set.
pub fn resolve_all<I, S>(inputs: I, allow_bare_ids: bool) -> ResolvedInputs
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = ResolvedInputs::default();

    for raw in inputs {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            continue;
        }
        let id = resolve(raw).or_else(|| {
            if allow_bare_ids && is_video_id(raw) {
                Some(VideoId::from(raw))
            } else {
                None
            }
        });
        match id {
            Some(id) => {
                if seen.insert(id.clone()) {
                    out.ids.push(id);
                }
            }
            None => {
                tracing::debug!(input = raw, "Could not extract video ID");
                out.rejected.push(raw.to_string());
            }
        }
    }

    out
}

fn parse_lenient(input: &str) -> Option<Url> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match Url::parse(input) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", input)).ok()
        }
        Err(_) => None,
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_urls() {
        let cases = [
            "https://www.youtube.com/watch?v=abc123",
            "http://youtube.com/watch?v=abc123",
            "https://m.youtube.com/watch?v=abc123&t=42s",
            "https://music.youtube.com/watch?list=PL1&v=abc123",
            "www.youtube.com/watch?v=abc123",
        ];
        for case in cases {
            assert_eq!(resolve(case), Some(VideoId::from("abc123")), "{}", case);
        }
    }

    #[test]
    fn test_short_links() {
        assert_eq!(
            resolve_with_kind("https://youtu.be/abc123?t=10"),
            Some((VideoId::from("abc123"), UrlKind::ShortLink))
        );
        assert_eq!(resolve("youtu.be/abc123"), Some(VideoId::from("abc123")));
    }

    #[test]
    fn test_rejects() {
        assert!(resolve("https://example.com/x").is_none());
        assert!(resolve("https://www.youtube.com/feed/subscriptions").is_none());
        assert!(resolve("https://www.youtube.com/watch?v=").is_none());
        assert!(resolve("https://youtu.be/").is_none());
        assert!(resolve("https://notyoutube.com/watch?v=abc").is_none());
        assert!(resolve("").is_none());
        assert!(resolve("::not a url::").is_none());
    }

    #[test]
    fn test_bare_ids() {
        assert!(is_video_id("dQw4w9WgXcQ"));
        assert!(!is_video_id("short"));
        assert!(!is_video_id("has space!!"));
    }

    #[test]
    fn test_resolve_all_dedups_and_keeps_order() {
        let out = resolve_all(
            [
                "https://youtu.be/bbbbbbbbbbb",
                "https://www.youtube.com/watch?v=aaaaaaaaaaa",
                "garbage",
                "bbbbbbbbbbb",
                "",
            ],
            true,
        );
        assert_eq!(
            out.ids,
            vec![VideoId::from("bbbbbbbbbbb"), VideoId::from("aaaaaaaaaaa")]
        );
        assert_eq!(out.rejected, vec!["garbage".to_string()]);
    }

    #[test]
    fn test_resolve_all_without_bare_ids() {
        let out = resolve_all(["dQw4w9WgXcQ"], false);
        assert!(out.ids.is_empty());
        assert_eq!(out.rejected.len(), 1);
    }
}
