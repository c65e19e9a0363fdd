//! Bearer credentials for the write path.
//!
//! The OAuth redirect flow itself is owned by whoever embeds this crate (a
//! browser, a desktop shell); the core only needs "a bearer token for the
//! YouTube scopes". [`authorize_url`] and [`token_from_redirect`] are the two
//! pure helpers an embedder needs to drive the implicit-grant flow.

use crate::auth_store::{AuthStore, FileAuthStore};
use crate::error::{RecFixError, Result};
use async_trait::async_trait;
use std::fmt;
use url::Url;

pub const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/auth";

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/youtube",
    "https://www.googleapis.com/auth/youtube.force-ssl",
];

/// Environment fallback for the access token.
pub const ACCESS_TOKEN_ENV: &str = "RECFIX_ACCESS_TOKEN";

/// Provider key under which the token lives in the credential store.
pub const STORE_PROVIDER: &str = "youtube";

/// Opaque OAuth access token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Accepts a raw token or a full `Bearer ...` header value.
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let raw = raw.as_ref().trim();
        let token = raw
            .strip_prefix("Bearer ")
            .or_else(|| raw.strip_prefix("bearer "))
            .unwrap_or(raw)
            .trim();
        if token.is_empty() {
            return Err(RecFixError::Authentication(
                "Not authenticated. Please sign in and try again.".to_string(),
            ));
        }
        Ok(Self(token.to_string()))
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "BearerToken({}…, len={})", prefix, self.0.len())
    }
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<BearerToken>;
}

/// A token handed over by the caller.
#[derive(Debug, Clone)]
pub struct StaticCredential(BearerToken);

impl StaticCredential {
    pub fn new(token: BearerToken) -> Self {
        Self(token)
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn bearer_token(&self) -> Result<BearerToken> {
        Ok(self.0.clone())
    }
}

/// Token read from the credential store, falling back to
/// [`ACCESS_TOKEN_ENV`].
pub struct StoredCredential<S: AuthStore = FileAuthStore> {
    store: S,
}

impl StoredCredential<FileAuthStore> {
    pub fn new_default() -> Self {
        Self {
            store: FileAuthStore::new_default(),
        }
    }
}

impl<S: AuthStore> StoredCredential<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: AuthStore> CredentialProvider for StoredCredential<S> {
    async fn bearer_token(&self) -> Result<BearerToken> {
        let stored = self
            .store
            .load(STORE_PROVIDER)
            .and_then(|m| m.get("access_token").cloned());
        match stored.or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok()) {
            Some(raw) => BearerToken::new(raw),
            None => Err(RecFixError::Authentication(format!(
                "No access token configured. Run `recfix auth set-token <TOKEN>` or set {}.",
                ACCESS_TOKEN_ENV
            ))),
        }
    }
}

/// Implicit-grant authorisation URL for the YouTube scopes.
pub fn authorize_url(client_id: &str, redirect_uri: &str) -> Result<Url> {
    if client_id.trim().is_empty() {
        return Err(RecFixError::Config("OAuth client id is missing".to_string()));
    }
    let mut url = Url::parse(AUTHORIZE_ENDPOINT)
        .map_err(|e| RecFixError::Config(format!("authorize endpoint: {}", e)))?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("response_type", "token")
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", &SCOPES.join(" "));
    Ok(url)
}

/// Pull `access_token` out of the redirect URL's fragment.
pub fn token_from_redirect(redirect: &str) -> Result<BearerToken> {
    let fragment = redirect
        .split_once('#')
        .map(|(_, f)| f)
        .ok_or_else(|| {
            RecFixError::Authentication("No access token found in response".to_string())
        })?;
    let token = url::form_urlencoded::parse(fragment.as_bytes())
        .find(|(k, _)| k == "access_token")
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| {
            RecFixError::Authentication("No access token found in response".to_string())
        })?;
    BearerToken::new(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth_store::{AuthDetails, MemoryAuthStore};

    #[test]
    fn test_bearer_prefix_is_stripped() {
        let t = BearerToken::new("Bearer ya29.abc").unwrap();
        assert_eq!(t.secret(), "ya29.abc");
        assert_eq!(t.authorization_header(), "Bearer ya29.abc");
        assert!(BearerToken::new("   ").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let t = BearerToken::new("ya29.supersecret").unwrap();
        let dbg = format!("{:?}", t);
        assert!(!dbg.contains("supersecret"));
        assert!(dbg.starts_with("BearerToken(ya29"));
    }

    #[test]
    fn test_authorize_url() {
        let url = authorize_url("client-1", "https://example.org/cb").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("response_type".into(), "token".into())));
        assert!(pairs.contains(&(
            "scope".into(),
            "https://www.googleapis.com/auth/youtube https://www.googleapis.com/auth/youtube.force-ssl"
                .into()
        )));
        assert!(authorize_url("", "x").is_err());
    }

    #[test]
    fn test_token_from_redirect() {
        let t = token_from_redirect(
            "https://abc.extensions.allizom.org/#access_token=ya29.x&token_type=Bearer&expires_in=3599",
        )
        .unwrap();
        assert_eq!(t.secret(), "ya29.x");
        assert!(token_from_redirect("https://cb/?code=1").is_err());
        assert!(token_from_redirect("https://cb/#error=access_denied").is_err());
    }

    #[tokio::test]
    async fn test_stored_credential_reads_store() {
        let store = MemoryAuthStore::new();
        let mut auth = AuthDetails::new();
        auth.insert("access_token".into(), "ya29.stored".into());
        store.save(STORE_PROVIDER, &auth).unwrap();

        let provider = StoredCredential::with_store(store);
        assert_eq!(provider.bearer_token().await.unwrap().secret(), "ya29.stored");
    }

    #[tokio::test]
    async fn test_static_credential() {
        let provider = StaticCredential::new(BearerToken::new("abc").unwrap());
        assert_eq!(provider.bearer_token().await.unwrap().secret(), "abc");
    }
}
