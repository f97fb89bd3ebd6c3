//! Builds the configured cover provider

use reqwest::Client;
use std::sync::Arc;
use tracing::info;

use super::{CoverProvider, IgdbCoverProvider, RawgCoverProvider, TwitchTokenManager};
use crate::config::{Config, HttpClientConfig, ProviderKind};
use crate::errors::{AppError, AppResult};

/// Factory for the provider selected by `provider.kind`
pub struct ProviderFactory;

impl ProviderFactory {
    /// Shared outbound HTTP client with the configured timeouts
    pub fn http_client(config: &HttpClientConfig) -> AppResult<Client> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AppError::configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(client)
    }

    pub fn create(config: &Config) -> AppResult<Arc<dyn CoverProvider>> {
        let client = Self::http_client(&config.http_client)?;
        Self::create_with_client(config, client)
    }

    pub fn create_with_client(
        config: &Config,
        client: Client,
    ) -> AppResult<Arc<dyn CoverProvider>> {
        match config.provider.kind {
            ProviderKind::Igdb => {
                let igdb = &config.provider.igdb;
                let tokens = match (&igdb.client_secret, &igdb.access_token) {
                    (Some(secret), _) => TwitchTokenManager::with_client_credentials(
                        client.clone(),
                        igdb.client_id.clone(),
                        secret.clone(),
                        igdb.token_url.clone(),
                    ),
                    (None, Some(token)) => TwitchTokenManager::with_static_token(
                        client.clone(),
                        igdb.client_id.clone(),
                        token.clone(),
                    ),
                    (None, None) => {
                        return Err(AppError::configuration(
                            "IGDB provider needs a client_secret or an access_token",
                        ));
                    }
                };

                let provider = IgdbCoverProvider::new(client, &igdb.base_url, tokens)?;
                info!("Using IGDB cover provider at {}", igdb.base_url);
                Ok(Arc::new(provider))
            }
            ProviderKind::Rawg => {
                let rawg = &config.provider.rawg;
                if rawg.api_key.trim().is_empty() {
                    return Err(AppError::configuration("RAWG provider needs an api_key"));
                }
                info!("Using RAWG cover provider at {}", rawg.base_url);
                Ok(Arc::new(RawgCoverProvider::new(
                    client,
                    rawg.base_url.clone(),
                    rawg.api_key.clone(),
                )))
            }
        }
    }
}
