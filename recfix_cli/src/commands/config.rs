use crate::cli::{Cli, ConfigAction};
use crate::commands::{load_config, spinner, Result};
use crate::output::{format_output, OutputData};
use recfix_core::api::{VideoPlatform, YouTubeClient};
use recfix_core::config::{default_config_path, validate_api_key_format, RecFixConfig};
use serde_json::{json, Value};

pub async fn run(cli: &Cli, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::SetKey { key, skip_check } => set_key(cli, &key, skip_check).await,
        ConfigAction::Path => {
            println!("{}", default_config_path().display());
            Ok(())
        }
    }
}

fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config()?;
    format_output(&OutputData::ConfigInfo(config_json(&config)?), &cli.format())
}

/// Config as JSON with the API key masked.
fn config_json(config: &RecFixConfig) -> Result<Value> {
    let mut value = serde_json::to_value(config)?;
    if let Some(obj) = value.as_object_mut() {
        let masked = config.api_key.as_deref().map(mask);
        obj.insert("api_key".to_string(), json!(masked));
        obj.insert(
            "path".to_string(),
            json!(default_config_path().display().to_string()),
        );
    }
    Ok(value)
}

fn mask(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}…({} chars)", visible, key.chars().count())
}

async fn set_key(cli: &Cli, key: &str, skip_check: bool) -> Result<()> {
    let key = key.trim();
    validate_api_key_format(key)?;

    let path = default_config_path();
    let mut config = RecFixConfig::load_from(&path)?;

    if !skip_check {
        let client = YouTubeClient::with_base_url(key, &config.api_base_url)?;
        let progress = spinner("Checking the API key against the YouTube Data API...");
        let probe = client.probe_key().await;
        progress.finish_and_clear();
        probe?;
    }

    config.api_key = Some(key.to_string());
    config.save_to(&path)?;
    tracing::info!(path = %path.display(), "Saved API key");

    format_output(
        &OutputData::ConfigInfo(json!({
            "saved": true,
            "checked": !skip_check,
            "path": path.display().to_string(),
        })),
        &cli.format(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_hides_key() {
        let masked = mask("AIzaSyExampleKey");
        assert!(masked.starts_with("AIza"));
        assert!(!masked.contains("Example"));
    }

    #[test]
    fn test_config_json_masks_key() {
        let config = RecFixConfig {
            api_key: Some("AIzaSySecret".into()),
            ..Default::default()
        };
        let v = config_json(&config).unwrap();
        assert!(!v["api_key"].as_str().unwrap().contains("Secret"));
        assert_eq!(v["batch_size"], 4);
    }
}
