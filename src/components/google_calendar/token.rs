use super::oauth::{self, default_token_uri, ApplicationSecret, TokenResponse};
use crate::config::Config;
use crate::error::{Error, MigrateResult};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Seconds before the recorded expiry at which a token counts as expired
const EXPIRY_SKEW_SECONDS: i64 = 10;

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN: i64 = 3600;

/// Stored OAuth credential.
///
/// Field names follow Google's authorized-user token file, so a token file
/// written by Google's own client libraries can be reused as is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credential {
    #[serde(rename = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    pub(crate) fn from_token_response(
        response: TokenResponse,
        secret: &ApplicationSecret,
        requested_scopes: &[String],
    ) -> Self {
        let scopes = match &response.scope {
            Some(granted) => granted.split_whitespace().map(str::to_string).collect(),
            None => requested_scopes.to_vec(),
        };

        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_uri: secret.token_uri.clone(),
            client_id: secret.client_id.clone(),
            client_secret: secret.client_secret.clone(),
            scopes,
            expiry: Some(expiry_from(response.expires_in)),
        }
    }

    /// Apply a refresh response, keeping the refresh token unless a new one was issued
    pub(crate) fn refreshed(&self, response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or_else(|| self.refresh_token.clone()),
            expiry: Some(expiry_from(response.expires_in)),
            ..self.clone()
        }
    }

    /// Whether the access token is past its expiry. Tokens without an expiry never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .map(|expiry| now >= expiry - Duration::seconds(EXPIRY_SKEW_SECONDS))
            .unwrap_or(false)
    }

    /// Whether the access token can be used as is
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && !self.is_expired(now)
    }

    /// Whether every required scope was granted. Unrecorded scopes are trusted.
    pub fn has_scopes(&self, required: &[String]) -> bool {
        self.scopes.is_empty() || required.iter().all(|scope| self.scopes.contains(scope))
    }

    /// Whether the credential can be refreshed without user interaction
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

fn expiry_from(expires_in: Option<i64>) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(expires_in.unwrap_or(DEFAULT_EXPIRES_IN))
}

/// Credential persisted as a JSON file
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored credential, if there is one
    pub fn load(&self) -> MigrateResult<Option<Credential>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let credential = serde_json::from_str(&content).map_err(|e| {
            Error::Serialization(format!(
                "Failed to parse token file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Some(credential))
    }

    /// Write the credential, replacing any previous one
    pub fn save(&self, credential: &Credential) -> MigrateResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(credential)?;
        fs::write(&self.path, json)?;

        debug!("Saved token to {}", self.path.display());
        Ok(())
    }
}

/// Obtains a usable credential from the token file, a refresh, or the browser
#[derive(Clone)]
pub struct TokenManager {
    store: TokenStore,
    client_secret_file: PathBuf,
    client_id: Option<String>,
    client_secret: Option<String>,
    client: Client,
}

impl TokenManager {
    pub fn new(config: &Config) -> Self {
        Self {
            store: TokenStore::new(config.token_file.clone()),
            client_secret_file: config.client_secret_file.clone(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            client: Client::new(),
        }
    }

    /// Get a credential carrying `required_scopes`, refreshing or
    /// authorizing as needed. The token file is rewritten whenever a new
    /// token is obtained.
    pub async fn acquire_credentials(&self, required_scopes: &[String]) -> MigrateResult<Credential> {
        let now = Utc::now();

        match self.store.load()? {
            Some(credential) if !credential.has_scopes(required_scopes) => {
                warn!("Stored token lacks required scopes, authorizing again");
            }
            Some(credential) if credential.is_valid(now) => {
                debug!("Using stored token from {}", self.store.path().display());
                return Ok(credential);
            }
            Some(credential) if credential.is_expired(now) && credential.can_refresh() => {
                info!("Stored token expired, refreshing");
                let refreshed = self.refresh_credential(&credential).await?;
                self.store.save(&refreshed)?;
                return Ok(refreshed);
            }
            Some(_) => {
                info!("Stored token cannot be refreshed, authorizing again");
            }
            None => {
                info!("No stored token at {}", self.store.path().display());
            }
        }

        let secret = oauth::load_application_secret(
            &self.client_secret_file,
            self.client_id.as_deref(),
            self.client_secret.as_deref(),
        )?;
        let credential = oauth::run_installed_flow(&self.client, &secret, required_scopes).await?;
        self.store.save(&credential)?;

        Ok(credential)
    }

    /// Exchange the refresh token for a new access token
    pub async fn refresh_credential(&self, credential: &Credential) -> MigrateResult<Credential> {
        let refresh_token = credential
            .refresh_token
            .as_deref()
            .ok_or_else(|| Error::TokenRefresh("No refresh token in token data".to_string()))?;

        let response = oauth::request_token(
            &self.client,
            &credential.token_uri,
            &[
                ("client_id", credential.client_id.as_str()),
                ("client_secret", credential.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ],
        )
        .await
        .map_err(Error::TokenRefresh)?;

        Ok(credential.refreshed(response))
    }
}
