//! Request extractors and validation

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::collections::HashSet;

use super::AppState;
use super::responses::{ValidationErrorResponse, validation_error};
use crate::errors::AppError;
use crate::providers::canonical_game_id;

/// Raw `?ids=` query string
#[derive(Debug, Clone, Deserialize)]
pub struct CoverIdsParams {
    #[serde(default)]
    pub ids: Option<String>,
}

/// Distinct, validated game ids from `?ids=1,2,3`, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameIds(pub Vec<String>);

impl GameIds {
    /// Parse a comma-separated id list
    ///
    /// Ids are canonicalized (`007` becomes `7`) before deduplication. Missing
    /// parameter, invalid ids and oversized batches are rejected. An empty
    /// parameter is a valid request for zero ids.
    pub fn parse(raw: Option<&str>, max_ids: usize) -> Result<Self, Response> {
        let Some(raw) = raw else {
            return Err(AppError::validation(
                "Missing required query parameter 'ids' (comma-separated game ids)",
            )
            .into_response());
        };

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        let mut invalid = Vec::new();

        for id in raw.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            match canonical_game_id(id) {
                Some(id) => {
                    if seen.insert(id.clone()) {
                        ids.push(id);
                    }
                }
                None => invalid.push(id.to_string()),
            }
        }

        if !invalid.is_empty() {
            return Err(validation_error(vec![ValidationErrorResponse {
                field: "ids".to_string(),
                message: format!(
                    "Game ids must be positive integers, got: {}",
                    invalid.join(", ")
                ),
            }]));
        }

        if ids.len() > max_ids {
            return Err(AppError::validation(format!(
                "Too many game ids: {} requested, at most {} allowed",
                ids.len(),
                max_ids
            ))
            .into_response());
        }

        Ok(Self(ids))
    }
}

impl FromRequestParts<AppState> for GameIds {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(params): Query<CoverIdsParams> = Query::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("Invalid query parameters").into_response())?;

        Self::parse(params.ids.as_deref(), state.config.web.max_ids_per_request)
    }
}
