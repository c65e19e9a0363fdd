//! Wire types for the YouTube Data API v3 endpoints this crate talks to.
//!
//! Only the fields that are read are modelled; everything is optional because
//! the API omits fields freely (deleted videos, missing thumbnails, etc.).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResource {
    #[serde(default)]
    pub id: Option<SearchResourceId>,
    #[serde(default)]
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResourceId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

impl Thumbnails {
    /// Medium first, then default.
    pub fn preferred(&self) -> Option<String> {
        self.medium
            .as_ref()
            .or(self.default.as_ref())
            .map(|t| t.url.clone())
    }
}

/// Created resource; only the id matters to callers.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResource {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistInsertBody<'a> {
    pub snippet: PlaylistSnippetBody<'a>,
    pub status: PlaylistStatusBody<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippetBody<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub default_language: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStatusBody<'a> {
    pub privacy_status: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemInsertBody<'a> {
    pub snippet: PlaylistItemSnippetBody<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippetBody<'a> {
    pub playlist_id: &'a str,
    pub resource_id: ResourceIdBody<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceIdBody<'a> {
    pub kind: &'a str,
    pub video_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_response_tolerates_missing_fields() {
        let raw = json!({
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "a"}, "snippet": {"title": "A"}},
                {"id": {"kind": "youtube#channel"}},
                {"snippet": {"title": "orphan"}}
            ]
        });
        let parsed: ListResponse<SearchResource> = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.items.len(), 3);
        assert_eq!(
            parsed.items[0].id.as_ref().unwrap().video_id.as_deref(),
            Some("a")
        );
        assert!(parsed.items[1].id.as_ref().unwrap().video_id.is_none());
        assert!(parsed.items[2].id.is_none());
    }

    #[test]
    fn test_error_payload() {
        let raw = json!({
            "error": {
                "code": 403,
                "message": "quota",
                "errors": [{"reason": "quotaExceeded", "domain": "youtube.quota"}]
            }
        });
        let parsed: ListResponse<VideoResource> = serde_json::from_value(raw).unwrap();
        let err = parsed.error.unwrap();
        assert_eq!(err.code, Some(403));
        assert_eq!(err.errors[0].reason.as_deref(), Some("quotaExceeded"));
    }

    #[test]
    fn test_thumbnail_preference() {
        let t: Thumbnails = serde_json::from_value(json!({
            "default": {"url": "d"},
            "medium": {"url": "m"}
        }))
        .unwrap();
        assert_eq!(t.preferred().as_deref(), Some("m"));

        let t: Thumbnails = serde_json::from_value(json!({"default": {"url": "d"}})).unwrap();
        assert_eq!(t.preferred().as_deref(), Some("d"));
    }

    #[test]
    fn test_playlist_item_body_shape() {
        let body = PlaylistItemInsertBody {
            snippet: PlaylistItemSnippetBody {
                playlist_id: "PL1",
                resource_id: ResourceIdBody {
                    kind: "youtube#video",
                    video_id: "v1",
                },
            },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["snippet"]["playlistId"], "PL1");
        assert_eq!(v["snippet"]["resourceId"]["videoId"], "v1");
    }
}
