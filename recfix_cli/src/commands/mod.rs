pub mod auth;
pub mod config;
pub mod recommend;
pub mod related;
pub mod resolve;
pub mod save;
pub mod scrape;
pub mod serve;

use indicatif::{ProgressBar, ProgressStyle};
use recfix_core::api::YouTubeClient;
use recfix_core::credentials::{BearerToken, CredentialProvider, StoredCredential};
use recfix_core::error::RecFixError;
use recfix_core::RecFixConfig;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Core(#[from] RecFixError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

pub fn load_config() -> Result<RecFixConfig> {
    Ok(RecFixConfig::load_default()?)
}

pub fn client(config: &RecFixConfig) -> Result<YouTubeClient> {
    Ok(YouTubeClient::with_base_url(
        config.require_api_key()?,
        &config.api_base_url,
    )?)
}

/// An explicit `--token` wins over the stored credential.
pub async fn bearer(explicit: Option<&str>) -> Result<BearerToken> {
    match explicit {
        Some(raw) => Ok(BearerToken::new(raw)?),
        None => Ok(StoredCredential::new_default().bearer_token().await?),
    }
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
