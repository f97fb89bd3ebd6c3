//! IGDB cover lookups
//!
//! Covers live on the `/covers` endpoint and are queried with an Apicalypse
//! body, e.g. `fields url; where game = 1942; limit 1;`.

use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use serde::Deserialize;
use tracing::debug;

use super::{CoverProvider, TwitchTokenManager, is_valid_game_id};
use crate::errors::{ProviderError, ProviderResult};
use crate::utils::UrlUtils;

const PROVIDER: &str = "igdb";

#[derive(Debug, Deserialize)]
struct IgdbCover {
    #[serde(default)]
    url: Option<String>,
}

pub struct IgdbCoverProvider {
    client: Client,
    covers_url: String,
    tokens: TwitchTokenManager,
}

impl IgdbCoverProvider {
    pub fn new(client: Client, base_url: &str, tokens: TwitchTokenManager) -> ProviderResult<Self> {
        let covers_url = UrlUtils::join(base_url, "covers").map_err(|e| {
            ProviderError::not_configured(format!("invalid IGDB base url '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            covers_url,
            tokens,
        })
    }

    /// Apicalypse query selecting the cover of one game
    fn cover_query(game_id: &str) -> String {
        format!("fields url; where game = {game_id}; limit 1;")
    }

    async fn query_cover(&self, game_id: &str) -> ProviderResult<Option<String>> {
        let token = self.tokens.bearer_token().await?;

        let response = self
            .client
            .post(&self.covers_url)
            .header("Client-ID", self.tokens.client_id())
            .header(ACCEPT, "application/json")
            .bearer_auth(token)
            .body(Self::cover_query(game_id))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let covers: Vec<IgdbCover> = response
            .json()
            .await
            .map_err(|e| ProviderError::parse(PROVIDER, format!("invalid covers response: {e}")))?;

        Ok(covers
            .into_iter()
            .find_map(|cover| cover.url.filter(|url| !url.trim().is_empty())))
    }
}

#[async_trait]
impl CoverProvider for IgdbCoverProvider {
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

        debug!(game_id = %game_id, "Querying IGDB cover");
        let result = self.query_cover(game_id).await;

        if let Err(ref e) = result
            && e.is_unauthorized()
        {
            self.tokens.invalidate().await;
        }

        result
    }
}
