//! Endpoint handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use digest_pipeline::{AgentReport, OutputSnapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub agents: Vec<AgentReport>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// `POST /run`
pub async fn run(
    State(state): State<AppState>,
    body: Result<Json<RunRequest>, JsonRejection>,
) -> Result<Json<RunResponse>, ApiError> {
    let Json(req) = body?;
    // The launch handle is dropped on purpose; status polls observe progress
    let _handle = state.controller.start_run(&req.content).await?;
    Ok(Json(RunResponse {
        status: "started".to_string(),
    }))
}

/// `GET /status`
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let agents = state.controller.status().await?;
    Ok(Json(StatusResponse { agents }))
}

/// `GET /output`
pub async fn output(State(state): State<AppState>) -> Result<Json<OutputSnapshot>, ApiError> {
    Ok(Json(state.controller.output().await?))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
