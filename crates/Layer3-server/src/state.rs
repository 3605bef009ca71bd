//! Shared handler state.

use digest_pipeline::PipelineController;
use std::sync::Arc;

/// State cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<PipelineController>,
}

impl AppState {
    pub fn new(controller: PipelineController) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}
