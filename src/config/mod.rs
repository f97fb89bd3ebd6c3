use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub http_client: HttpClientConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on how long a single inbound request may run
    #[serde(default = "default_request_timeout", with = "duration_serde::duration")]
    pub request_timeout: Duration,
    /// Maximum number of distinct game ids accepted by one batch lookup
    #[serde(default = "default_max_ids_per_request")]
    pub max_ids_per_request: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    #[serde(default = "default_connect_timeout", with = "duration_serde::duration")]
    pub connect_timeout: Duration,
    /// Total timeout for one upstream call
    #[serde(default = "default_upstream_timeout", with = "duration_serde::duration")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Bound on cached covers. Unset means the cache grows for the life of the process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    /// IGDB image size token substituted for `t_thumb` (e.g. "cover_big").
    /// Unset keeps the provider URL as returned.
    #[serde(default = "default_cover_size", skip_serializing_if = "Option::is_none")]
    pub cover_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Igdb,
    Rawg,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(default)]
    pub igdb: IgdbConfig,
    #[serde(default)]
    pub rawg: RawgConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgdbConfig {
    #[serde(default)]
    pub client_id: String,
    /// When set, app tokens are fetched from Twitch with the client-credentials grant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Static bearer token, used when no client secret is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default = "default_igdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawgConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_rawg_base_url")]
    pub base_url: String,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_timeout() -> Duration {
    duration_serde::parse(DEFAULT_REQUEST_TIMEOUT).unwrap_or(Duration::from_secs(30))
}

fn default_max_ids_per_request() -> usize {
    DEFAULT_MAX_IDS_PER_REQUEST
}

// HTTP client defaults
fn default_connect_timeout() -> Duration {
    duration_serde::parse(DEFAULT_CONNECT_TIMEOUT).unwrap_or(Duration::from_secs(10))
}

fn default_upstream_timeout() -> Duration {
    duration_serde::parse(DEFAULT_UPSTREAM_TIMEOUT).unwrap_or(Duration::from_secs(15))
}

// Cache defaults
fn default_cover_size() -> Option<String> {
    Some(DEFAULT_COVER_SIZE.to_string())
}

// Provider defaults
fn default_igdb_base_url() -> String {
    DEFAULT_IGDB_BASE_URL.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TWITCH_TOKEN_URL.to_string()
}

fn default_rawg_base_url() -> String {
    DEFAULT_RAWG_BASE_URL.to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            max_ids_per_request: default_max_ids_per_request(),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            timeout: default_upstream_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: None,
            cover_size: default_cover_size(),
        }
    }
}

impl Default for IgdbConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            access_token: None,
            base_url: default_igdb_base_url(),
            token_url: default_token_url(),
        }
    }
}

impl Default for RawgConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_rawg_base_url(),
        }
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            Ok(default_config)
        }
    }

    /// Apply provider secrets from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply provider secrets from an arbitrary lookup; empty values are ignored
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(client_id) = non_empty(ENV_IGDB_CLIENT_ID) {
            self.provider.igdb.client_id = client_id;
        }
        if let Some(secret) = non_empty(ENV_IGDB_CLIENT_SECRET) {
            self.provider.igdb.client_secret = Some(secret);
        }
        if let Some(token) = non_empty(ENV_IGDB_ACCESS_TOKEN) {
            self.provider.igdb.access_token = Some(token);
        }
        if let Some(key) = non_empty(ENV_RAWG_API_KEY) {
            self.provider.rawg.api_key = key;
        }
    }

    /// Reject configurations the selected provider cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.web.max_ids_per_request == 0 {
            bail!("web.max_ids_per_request must be greater than zero");
        }
        if self.cache.max_entries == Some(0) {
            bail!("cache.max_entries must be greater than zero when set");
        }

        match self.provider.kind {
            ProviderKind::Igdb => {
                let igdb = &self.provider.igdb;
                if igdb.client_id.trim().is_empty() {
                    bail!("provider.igdb.client_id is required (or set {ENV_IGDB_CLIENT_ID})");
                }
                if igdb.client_secret.is_none() && igdb.access_token.is_none() {
                    bail!(
                        "provider.igdb needs either client_secret or access_token (or set {ENV_IGDB_CLIENT_SECRET} / {ENV_IGDB_ACCESS_TOKEN})"
                    );
                }
            }
            ProviderKind::Rawg => {
                if self.provider.rawg.api_key.trim().is_empty() {
                    bail!("provider.rawg.api_key is required (or set {ENV_RAWG_API_KEY})");
                }
            }
        }

        Ok(())
    }
}
