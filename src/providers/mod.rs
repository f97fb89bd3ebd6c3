//! Cover metadata providers
//!
//! A provider answers one question: "what is the cover image URL for this game
//! id?". The cover cache calls it once per missing id and never retries.

use async_trait::async_trait;

use crate::errors::ProviderResult;

pub mod factory;
pub mod igdb;
pub mod rawg;
pub mod token;

pub use factory::ProviderFactory;
pub use igdb::IgdbCoverProvider;
pub use rawg::RawgCoverProvider;
pub use token::TwitchTokenManager;

/// Upstream collaborator that resolves a game id to its cover URL
///
/// `Ok(None)` means the provider knows of no cover for the id. Neither
/// `Ok(None)` nor `Err(_)` is cached by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoverProvider: Send + Sync {
    /// Short provider name used in logs and stats
    fn name(&self) -> &'static str;

    /// Look up the raw (unnormalized) cover URL for a game id
    async fn cover_url(&self, game_id: &str) -> ProviderResult<Option<String>>;
}

/// Game ids are positive integers carried as strings
pub fn is_valid_game_id(game_id: &str) -> bool {
    canonical_game_id(game_id).is_some()
}

/// Decimal form of a game id without leading zeros, so `007` and `7` share a key
pub fn canonical_game_id(game_id: &str) -> Option<String> {
    if game_id.is_empty() || !game_id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    game_id
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .map(|id| id.to_string())
}
