//! User configuration, persisted as TOML under the platform config dir.

use crate::api::DEFAULT_API_BASE_URL;
use crate::cache::DEFAULT_TTL_SECS;
use crate::error::{RecFixError, Result};
use crate::fetcher::FetchLimits;
use crate::orchestrator::BatchConfig;
use crate::ranker::MAX_RECOMMENDATIONS;
use crate::retry::RetryPolicy;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";
pub const API_BASE_URL_ENV: &str = "RECFIX_API_BASE_URL";

static API_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid api key regex"));

/// `~/.config/recfix` on Linux, the platform equivalent elsewhere.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recfix")
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_jitter_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 1000,
            max_jitter_ms: 1000,
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(s: &RetrySettings) -> Self {
        RetryPolicy {
            max_retries: s.max_retries,
            initial_delay: Duration::from_millis(s.initial_delay_ms),
            max_jitter: Duration::from_millis(s.max_jitter_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecFixConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub api_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_client_id: Option<String>,
    pub cache_ttl_secs: u64,
    pub batch_size: usize,
    pub batch_pacing_ms: u64,
    pub item_pacing_ms: u64,
    pub retry: RetrySettings,
    pub search_results: u32,
    pub related_keep: usize,
    pub rank_limit: usize,
}

impl Default for RecFixConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            oauth_client_id: None,
            cache_ttl_secs: DEFAULT_TTL_SECS as u64,
            batch_size: 4,
            batch_pacing_ms: 500,
            item_pacing_ms: 500,
            retry: RetrySettings::default(),
            search_results: 25,
            related_keep: 15,
            rank_limit: MAX_RECOMMENDATIONS,
        }
    }
}

impl RecFixConfig {
    /// Read the config file if it exists, then apply environment overrides.
    pub fn load_default() -> Result<Self> {
        let mut config = Self::load_from(&default_config_path())?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).map_err(|e| {
                RecFixError::Config(format!("invalid config file {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = lookup(API_BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| RecFixError::Config(format!("serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, raw)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                RecFixError::Config(
                    "YouTube API key is missing. Please add your API key in the configuration."
                        .to_string(),
                )
            })
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs.min(i64::MAX as u64) as i64)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.retry)
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            batch_size: self.batch_size.max(1),
            pacing: Duration::from_millis(self.batch_pacing_ms),
        }
    }

    pub fn fetch_limits(&self) -> FetchLimits {
        FetchLimits {
            search_results: self.search_results,
            keep: self.related_keep,
        }
    }

    pub fn item_pacing(&self) -> Duration {
        Duration::from_millis(self.item_pacing_ms)
    }
}

/// Shape check only: non-empty, letters, digits, `_` and `-`.
pub fn validate_api_key_format(key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(RecFixError::Config("Please enter an API key".to_string()));
    }
    if !API_KEY_RE.is_match(key) {
        return Err(RecFixError::Config("Invalid API key format".to_string()));
    }
    Ok(())
}
