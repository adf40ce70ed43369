use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Cache;
use crate::services::candidates::CandidateStrategy;
use crate::services::catalog::CatalogProvider;

pub mod batch;
pub mod similar;

/// Shared application state
pub struct AppState {
    pub cache: Cache,
    pub provider: Arc<dyn CatalogProvider>,
    pub strategy: CandidateStrategy,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/similar", get(similar::similar))
        .route("/batch/step", post(batch::step))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
