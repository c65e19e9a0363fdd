use crate::cli::{AuthAction, Cli};
use crate::commands::{load_config, CommandError, Result};
use crate::output::{format_output, OutputData};
use recfix_core::auth_store::{AuthDetails, AuthStore, FileAuthStore};
use recfix_core::credentials::{
    authorize_url, token_from_redirect, BearerToken, STORE_PROVIDER,
};
use serde_json::json;

pub async fn run(cli: &Cli, action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Url {
            client_id,
            redirect_uri,
        } => print_url(cli, client_id, &redirect_uri),
        AuthAction::SetToken { token } => set_token(cli, &token),
        AuthAction::Status => status(cli),
        AuthAction::Logout => logout(cli),
    }
}

fn print_url(cli: &Cli, client_id: Option<String>, redirect_uri: &str) -> Result<()> {
    let client_id = match client_id {
        Some(id) => id,
        None => load_config()?.oauth_client_id.ok_or_else(|| {
            CommandError::InvalidInput(
                "No OAuth client id. Pass --client-id or set oauth_client_id in the config."
                    .to_string(),
            )
        })?,
    };
    let url = authorize_url(&client_id, redirect_uri)?;
    let info = json!({
        "authorize_url": url.as_str(),
        "next_step": "Open the URL, sign in, then run `recfix auth set-token <REDIRECT_URL>`",
    });
    format_output(&OutputData::AuthInfo(info), &cli.format())
}

/// Accepts a raw token or the full redirect URL with the token in its
/// fragment.
fn set_token(cli: &Cli, raw: &str) -> Result<()> {
    let token = if raw.contains('#') && raw.contains("access_token=") {
        token_from_redirect(raw)?
    } else {
        BearerToken::new(raw)?
    };

    let store = FileAuthStore::new_default();
    let mut auth = store.load(STORE_PROVIDER).unwrap_or_default();
    auth.insert("access_token".to_string(), token.secret().to_string());
    store
        .save(STORE_PROVIDER, &auth)
        .map_err(recfix_core::RecFixError::from)?;

    tracing::info!(token = ?token, "Stored access token");
    let info = json!({
        "stored": true,
        "path": store.config_path().display().to_string(),
    });
    format_output(&OutputData::AuthInfo(info), &cli.format())
}

fn status(cli: &Cli) -> Result<()> {
    let store = FileAuthStore::new_default();
    let stored: Option<AuthDetails> = store.load(STORE_PROVIDER);
    let has_token = stored
        .as_ref()
        .is_some_and(|a| a.get("access_token").is_some_and(|t| !t.is_empty()));
    let info = json!({
        "authenticated": has_token,
        "path": store.config_path().display().to_string(),
    });
    format_output(&OutputData::AuthInfo(info), &cli.format())
}

fn logout(cli: &Cli) -> Result<()> {
    let store = FileAuthStore::new_default();
    let removed = store
        .remove(STORE_PROVIDER)
        .map_err(recfix_core::RecFixError::from)?;
    format_output(
        &OutputData::AuthInfo(json!({ "removed": removed })),
        &cli.format(),
    )
}
