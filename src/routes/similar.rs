use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{MediaKind, SimilarList};
use crate::routes::AppState;
use crate::services::similar;

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Handler for the similar-items endpoint
///
/// Both parameters are required; missing or unparseable values fail with
/// 400 before any upstream call happens.
pub async fn similar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SimilarQuery>,
) -> AppResult<Json<SimilarList>> {
    let id = params
        .id
        .ok_or_else(|| AppError::InvalidInput("id parameter is required".to_string()))?
        .parse::<u64>()
        .map_err(|_| AppError::InvalidInput("id must be a numeric identifier".to_string()))?;

    let kind = params
        .kind
        .ok_or_else(|| AppError::InvalidInput("type parameter is required".to_string()))?
        .parse::<MediaKind>()
        .map_err(AppError::InvalidInput)?;

    let results = similar::get_similar(
        &state.cache,
        state.provider.as_ref(),
        state.strategy,
        kind,
        id,
    )
    .await?;

    Ok(Json(results))
}
