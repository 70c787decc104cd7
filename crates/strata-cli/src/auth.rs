//! Registry credentials and the `X-Registry-Auth` header value.
//!
//! Credentials live in `auth.json` under the strata home, keyed by registry
//! address. A missing file, a missing entry or an unreadable file all mean
//! "no credentials": the daemon then tries the registry anonymously.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Credentials for one registry, in the daemon's wire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server_address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identity_token: String,
}

impl AuthConfig {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// File-backed map of registry address to [`AuthConfig`].
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, if a home directory is known.
    pub fn default_location() -> Option<Self> {
        crate::paths::auth_path().map(Self::new)
    }

    /// Credentials for `server`, if stored.
    pub fn get(&self, server: &str) -> Result<Option<AuthConfig>> {
        let mut entries = self.load()?;
        Ok(entries.remove(server))
    }

    fn load(&self) -> Result<HashMap<String, AuthConfig>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }
}

/// URL-safe base64 of the JSON-encoded credentials.
pub fn encode_auth(config: &AuthConfig) -> Result<String> {
    let json = serde_json::to_vec(config).context("Failed to encode credentials")?;
    Ok(URL_SAFE.encode(json))
}

/// Header value for `server`; empty when there is nothing usable to send.
pub fn registry_auth(store: Option<&CredentialStore>, server: &str) -> String {
    let Some(store) = store else {
        return String::new();
    };
    let config = match store.get(server) {
        Ok(Some(config)) if !config.is_empty() => config,
        Ok(_) => return String::new(),
        Err(e) => {
            debug!(server, error = %e, "ignoring unreadable credentials");
            return String::new();
        }
    };
    encode_auth(&config).unwrap_or_default()
}
