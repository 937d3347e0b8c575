// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use crate::auth::{HashScheme, SigningKey, Subject, DEFAULT_TOKEN_TTL, HMAC_FAMILY, MAX_TOKEN_TTL};
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use jsonwebtoken::Algorithm;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "gatekeeper.toml";

/// Prefix of environment overrides; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "GATEKEEPER_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Token signing and cookie settings
    pub auth: AuthSettings,
    /// Credential store settings
    pub store: StoreSettings,
    /// Identity inserted at startup when the store is empty
    pub seed: Option<SeedIdentity>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Session token settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HMAC secret; required
    pub signing_key: SigningKey,
    /// Signing algorithm (HS256, HS384 or HS512)
    pub algorithm: Algorithm,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
    /// Cookie carrying the token
    pub cookie_name: String,
    /// Mark the cookie `Secure`
    pub cookie_secure: bool,
    /// Redirect target for unauthenticated requests; 401 when unset
    pub login_redirect: Option<String>,
}

/// Credential store settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// JSON file with identity records
    pub path: Option<PathBuf>,
    /// Scheme used when the store hashes new secrets
    pub password_scheme: HashScheme,
}

/// Bootstrap identity
#[derive(Clone, Deserialize)]
pub struct SeedIdentity {
    pub id: Subject,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub claims: Map<String, Value>,
}

impl fmt::Debug for SeedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedIdentity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("claims", &self.claims)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            auth: AuthSettings::default(),
            store: StoreSettings::default(),
            seed: None,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            signing_key: SigningKey::default(),
            algorithm: Algorithm::HS256,
            token_ttl_secs: DEFAULT_TOKEN_TTL.as_secs(),
            cookie_name: "jwt".to_string(),
            cookie_secure: false,
            login_redirect: None,
        }
    }
}

impl AuthSettings {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

impl Settings {
    /// Load settings from `gatekeeper.toml` (or `path`) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} does not exist", path.display());
                }
                path.to_path_buf()
            }
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let settings: Settings = Figment::new()
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        if self.auth.signing_key.is_empty() {
            bail!("auth.signing_key must be set");
        }
        if !HMAC_FAMILY.contains(&self.auth.algorithm) {
            bail!("auth.algorithm must be HS256, HS384 or HS512");
        }
        if self.auth.token_ttl_secs == 0 {
            bail!("auth.token_ttl_secs must be positive");
        }
        if self.auth.token_ttl_secs > MAX_TOKEN_TTL.as_secs() {
            bail!(
                "auth.token_ttl_secs must not exceed {}",
                MAX_TOKEN_TTL.as_secs()
            );
        }
        if self.auth.cookie_name.is_empty()
            || !self
                .auth
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("invalid cookie name: {}", self.auth.cookie_name);
        }
        if let Some(target) = &self.auth.login_redirect {
            if !target.starts_with('/') {
                bail!("auth.login_redirect must be a local path");
            }
        }
        Ok(())
    }
}
