//! # digest-server
//!
//! HTTP surface of the digest pipeline service:
//!
//! - `POST /run` - persist content and launch the pipeline
//! - `GET /status` - per-agent progress
//! - `GET /output` - the generated digest, once present
//! - `GET /health` - liveness

pub mod cors;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use cors::CorsPolicy;
pub use error::ApiError;
pub use router::build as build_router;
pub use state::AppState;

use digest_foundation::{Error, ServiceConfig};
use digest_pipeline::PipelineController;

/// Router for a Docker-backed controller built from `config`
pub fn app(config: ServiceConfig) -> Result<axum::Router, Error> {
    let cors = CorsPolicy::new(&config.cors_origin)
        .map_err(|e| Error::Config(format!("invalid CORS origin {:?}: {}", config.cors_origin, e)))?;
    let controller = PipelineController::docker(config);
    Ok(build_router(AppState::new(controller), cors))
}
