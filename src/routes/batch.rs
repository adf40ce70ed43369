use axum::extract::State;
use std::sync::Arc;

use crate::error::AppResult;
use crate::routes::AppState;
use crate::services::batch;

/// Handler for the scheduler-driven batch step
///
/// Takes no parameters and returns a plain-text status line describing the
/// unit of work performed.
pub async fn step(State(state): State<Arc<AppState>>) -> AppResult<String> {
    batch::run_step(&state.cache, state.provider.as_ref()).await
}
