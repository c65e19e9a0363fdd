//! Video discovery from a rendered YouTube page.
//!
//! Page markup is unstable and results are best-effort: anchors that cannot
//! be resolved to an id and a title are silently skipped.

use crate::error::{RecFixError, Result};
use crate::models::{VideoCandidate, VideoId};
use crate::resolver;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;
use url::Url;

const PAGE_BASE: &str = "https://www.youtube.com";

/// Supplies the videos currently visible to the user.
pub trait VideoSource {
    fn scrape_visible_videos(&self) -> Result<Vec<VideoCandidate>>;
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static VIDEO_LINK: Lazy<Selector> =
    Lazy::new(|| selector(r#"a[href*="watch?v="], a[href*="youtu.be/"]"#));
static VIDEO_TITLE: Lazy<Selector> = Lazy::new(|| selector("#video-title"));
static FORMATTED: Lazy<Selector> = Lazy::new(|| selector("yt-formatted-string"));
static TITLED: Lazy<Selector> = Lazy::new(|| selector("[title]"));
static CHANNEL_LINKS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        r#"a[href*="/channel/"]"#,
        r#"a[href*="/user/"]"#,
        r#"a[href*="/@"]"#,
        "#channel-name a",
        "#byline a",
        "ytd-channel-name a",
    ]
    .iter()
    .map(|css| selector(css))
    .collect()
});

const RENDERERS: &[&str] = &[
    "ytd-rich-item-renderer",
    "ytd-compact-video-renderer",
    "ytd-grid-video-renderer",
    "ytd-video-renderer",
];

/// A saved page's HTML.
pub struct HtmlPageSource {
    html: String,
}

impl HtmlPageSource {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }
}

impl VideoSource for HtmlPageSource {
    fn scrape_visible_videos(&self) -> Result<Vec<VideoCandidate>> {
        let document = Html::parse_document(&self.html);
        let base = Url::parse(PAGE_BASE).map_err(|e| RecFixError::Config(e.to_string()))?;

        let mut seen = std::collections::HashSet::new();
        let mut videos = Vec::new();
        let mut links = 0usize;

        for link in document.select(&VIDEO_LINK) {
            links += 1;
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let Some(url) = base.join(href).ok() else {
                continue;
            };
            let Some(id) = resolver::resolve(url.as_str()) else {
                continue;
            };
            if seen.contains(&id) {
                continue;
            }
            let containers = containers(link);
            let Some(title) = title_for(link, &containers) else {
                continue;
            };

            let channel = channel_for(&containers).unwrap_or_else(|| "Unknown Channel".to_string());
            let thumbnail = hq_thumbnail(&id);
            let mut candidate = VideoCandidate::new(id.clone(), title, channel).with_thumbnail(thumbnail);
            candidate.url = url.to_string();
            seen.insert(id);
            videos.push(candidate);
        }

        tracing::debug!(links, videos = videos.len(), "Scraped page");

        if videos.is_empty() {
            return Err(RecFixError::NoResults(if links == 0 {
                "No video links found on the page".to_string()
            } else {
                "No valid recommendations could be scraped".to_string()
            }));
        }
        Ok(videos)
    }
}

pub fn hq_thumbnail(id: &VideoId) -> String {
    format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id)
}

fn non_empty(text: impl AsRef<str>) -> Option<String> {
    let t = text.as_ref().trim();
    (!t.is_empty()).then(|| t.to_string())
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn has_video_marker(el: &ElementRef<'_>) -> bool {
    let v = el.value();
    v.attr("id").is_some_and(|id| id.contains("video"))
        || v.attr("class").is_some_and(|c| c.contains("video"))
}

/// Enclosing elements to search for metadata, closest renderer first and the
/// immediate parent last.
fn containers(link: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let ancestors: Vec<ElementRef<'_>> = link.ancestors().filter_map(ElementRef::wrap).collect();
    let mut out = Vec::new();

    for name in RENDERERS {
        if let Some(el) = ancestors.iter().find(|a| a.value().name() == *name) {
            out.push(*el);
        }
    }
    if let Some(el) = ancestors.iter().find(|a| has_video_marker(a)) {
        out.push(*el);
    }
    if let Some(parent) = ancestors.first() {
        out.push(*parent);
    }
    out.dedup_by(|a, b| a.id() == b.id());
    out
}

fn title_for(link: ElementRef<'_>, containers: &[ElementRef<'_>]) -> Option<String> {
    if let Some(t) = link.value().attr("title").and_then(non_empty) {
        return Some(t);
    }
    for sel in [&*VIDEO_TITLE, &*FORMATTED] {
        if let Some(t) = link.select(sel).next().and_then(|el| non_empty(text_of(el))) {
            return Some(t);
        }
    }
    for container in containers.iter().filter(|c| has_video_marker(c)) {
        if let Some(t) = container
            .select(&TITLED)
            .find_map(|el| el.value().attr("title").and_then(non_empty))
        {
            return Some(t);
        }
    }
    non_empty(text_of(link))
}

fn channel_for(containers: &[ElementRef<'_>]) -> Option<String> {
    containers.iter().find_map(|container| {
        CHANNEL_LINKS
            .iter()
            .find_map(|sel| container.select(sel).find_map(|el| non_empty(text_of(el))))
    })
}
