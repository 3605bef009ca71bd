//! Route table.

use crate::cors::{apply_cors, CorsPolicy};
use crate::handlers;
use crate::state::AppState;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

/// Build the application router with CORS applied to every route
pub fn build(state: AppState, cors: CorsPolicy) -> Router {
    Router::new()
        .route("/run", post(handlers::run))
        .route("/status", get(handlers::status))
        .route("/output", get(handlers::output))
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(cors, apply_cors))
        .with_state(state)
}
