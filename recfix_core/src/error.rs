// src/error.rs
use crate::models::VideoId;

#[derive(Debug, thiserror::Error)]
pub enum RecFixError {
    #[error("Video not found: {0}")]
    NotFound(VideoId),

    #[error("{message}")]
    Upstream { reason: String, message: String },

    #[error("{0}")]
    NoResults(String),

    #[error("Could not generate any recommendations. Please try different videos.")]
    NoRecommendations,

    #[error("Failed to create playlist: {0}")]
    PlaylistCreateFailed(String),

    #[error("Failed to add any videos to the playlist ({attempted} attempted)")]
    AllItemsFailed { attempted: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RecFixError>;

impl RecFixError {
    pub fn upstream(reason: impl Into<String>, message: impl Into<String>) -> Self {
        RecFixError::Upstream {
            reason: reason.into(),
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        match self {
            RecFixError::NotFound(_) => "not_found",
            RecFixError::Upstream { .. } => "upstream_error",
            RecFixError::NoResults(_) => "no_results",
            RecFixError::NoRecommendations => "no_recommendations",
            RecFixError::PlaylistCreateFailed(_) => "playlist_create_failed",
            RecFixError::AllItemsFailed { .. } => "all_items_failed",
            RecFixError::InvalidInput(_) => "invalid_input",
            RecFixError::Authentication(_) => "auth_failed",
            RecFixError::Config(_) => "config_error",
            RecFixError::HttpRequest(_) => "upstream_error",
            RecFixError::SerdeJson(_) => "parse_error",
            RecFixError::Io(_) => "internal_error",
        }
    }

    /// Whole-operation failures that callers surface to the user as-is.
    ///
    /// Everything else is a component-local failure that the orchestrator or
    /// playlist writer degrades into a per-item soft failure. Fatal errors
    /// are never retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RecFixError::NoRecommendations
                | RecFixError::PlaylistCreateFailed(_)
                | RecFixError::AllItemsFailed { .. }
                | RecFixError::InvalidInput(_)
                | RecFixError::Authentication(_)
                | RecFixError::Config(_)
        )
    }
}
