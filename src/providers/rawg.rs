//! RAWG cover lookups via `GET /games/{id}`; `background_image` is the cover.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{CoverProvider, is_valid_game_id};
use crate::errors::{ProviderError, ProviderResult};
use crate::utils::UrlUtils;

const PROVIDER: &str = "rawg";

#[derive(Debug, Deserialize)]
struct RawgGame {
    #[serde(default)]
    background_image: Option<String>,
}

pub struct RawgCoverProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RawgCoverProvider {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    fn game_url(&self, game_id: &str) -> ProviderResult<String> {
        UrlUtils::join(&self.base_url, &format!("games/{game_id}")).map_err(|e| {
            ProviderError::not_configured(format!("invalid RAWG base url '{}': {e}", self.base_url))
        })
    }
}

#[async_trait]
impl CoverProvider for RawgCoverProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn cover_url(&self, game_id: &str) -> ProviderResult<Option<String>> {
        if !is_valid_game_id(game_id) {
            return Err(ProviderError::parse(
                PROVIDER,
                format!("game id '{game_id}' is not a positive integer"),
            ));
        }

        let url = self.game_url(game_id)?;
        debug!(game_id = %game_id, "Querying RAWG game");

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.without_url()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let game: RawgGame = response
            .json()
            .await
            .map_err(|e| ProviderError::parse(PROVIDER, format!("invalid game response: {e}")))?;

        Ok(game
            .background_image
            .filter(|image| !image.trim().is_empty()))
    }
}
