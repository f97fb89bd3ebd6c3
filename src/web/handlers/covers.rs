//! Cover lookup HTTP handlers

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::errors::{AppError, AppResult};
use crate::models::{CoverMap, CoverResponse};
use crate::providers::canonical_game_id;
use crate::web::{AppState, extractors::GameIds, responses::ok};

/// Batch cover lookup
///
/// `GET /api/v1/covers?ids=1,2,3` answers with `{ "1": "https://..", "2": null, .. }`.
/// Ids the provider cannot resolve map to `null`; they never fail the request.
pub async fn get_covers(State(state): State<AppState>, GameIds(ids): GameIds) -> Json<CoverMap> {
    Json(state.cover_cache.lookup(&ids).await)
}

/// Single cover lookup
pub async fn get_cover(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> AppResult<Json<CoverResponse>> {
    let raw = game_id.trim();
    let Some(game_id) = canonical_game_id(raw) else {
        return Err(AppError::validation(format!(
            "Game id must be a positive integer, got: {raw}"
        )));
    };

    let url = state.cover_cache.lookup_one(&game_id).await;
    Ok(Json(CoverResponse { game_id, url }))
}

/// Cache counters
pub async fn get_cover_stats(State(state): State<AppState>) -> impl IntoResponse {
    ok(state.cover_cache.stats().await)
}
