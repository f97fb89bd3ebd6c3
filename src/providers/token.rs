//! Twitch app access tokens for IGDB
//!
//! IGDB authenticates with a Twitch application token. With a client secret
//! configured the token is obtained through the client-credentials grant and
//! kept until shortly before it expires. A statically configured token is
//! used verbatim and never refreshed.

use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::defaults::TOKEN_EXPIRY_MARGIN_SECS;
use crate::errors::{ProviderError, ProviderResult};
use crate::utils::UrlUtils;

const PROVIDER: &str = "twitch";

#[derive(Debug, Clone)]
enum TokenSource {
    Static(String),
    ClientCredentials {
        client_secret: String,
        token_url: String,
    },
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

pub struct TwitchTokenManager {
    client: Client,
    client_id: String,
    source: TokenSource,
    current: RwLock<Option<CachedToken>>,
}

impl TwitchTokenManager {
    /// Use a fixed bearer token
    pub fn with_static_token(client: Client, client_id: String, access_token: String) -> Self {
        Self {
            client,
            client_id,
            source: TokenSource::Static(access_token),
            current: RwLock::new(None),
        }
    }

    /// Fetch and refresh tokens with the client-credentials grant
    pub fn with_client_credentials(
        client: Client,
        client_id: String,
        client_secret: String,
        token_url: String,
    ) -> Self {
        Self {
            client,
            client_id,
            source: TokenSource::ClientCredentials {
                client_secret,
                token_url,
            },
            current: RwLock::new(None),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Current bearer token, fetching a new one when missing or about to expire
    pub async fn bearer_token(&self) -> ProviderResult<String> {
        let (client_secret, token_url) = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::ClientCredentials {
                client_secret,
                token_url,
            } => (client_secret, token_url),
        };

        if let Some(token) = self.current.read().await.as_ref()
            && token.is_fresh()
        {
            return Ok(token.access_token.clone());
        }

        let mut current = self.current.write().await;
        // Another caller may have refreshed while we waited for the write lock
        if let Some(token) = current.as_ref()
            && token.is_fresh()
        {
            return Ok(token.access_token.clone());
        }

        let fetched = self.fetch_token(client_secret, token_url).await?;
        let access_token = fetched.access_token.clone();
        *current = Some(fetched);
        Ok(access_token)
    }

    /// Drop the cached token after the provider rejected it
    pub async fn invalidate(&self) {
        if matches!(self.source, TokenSource::ClientCredentials { .. }) {
            let mut current = self.current.write().await;
            if current.take().is_some() {
                info!("Discarded cached IGDB access token after rejection");
            }
        } else {
            warn!("IGDB rejected the configured static access token");
        }
    }

    async fn fetch_token(
        &self,
        client_secret: &str,
        token_url: &str,
    ) -> ProviderResult<CachedToken> {
        debug!(
            "Requesting Twitch app token from {}",
            UrlUtils::obfuscate_credentials(token_url)
        );

        let response = self
            .client
            .post(token_url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", client_secret),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| {
                ProviderError::auth_failed(
                    PROVIDER,
                    UrlUtils::obfuscate_credentials(&e.to_string()),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::auth_failed(
                PROVIDER,
                format!(
                    "token endpoint returned {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::parse(PROVIDER, format!("invalid token response: {e}")))?;

        let lifetime =
            Duration::from_secs(body.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS));
        info!(
            "Obtained Twitch app token valid for {}",
            humantime::format_duration(lifetime)
        );

        Ok(CachedToken {
            access_token: body.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}
