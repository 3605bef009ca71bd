//! # digest-pipeline
//!
//! Control of the external multi-agent pipeline for the digest service.
//!
//! ## Features
//!
//! - Docker connection with ordered socket fallback
//! - Per-agent status derived from container state and exit code
//! - Fire-and-forget `docker compose up --build` launch
//! - `PipelineController` tying files, runtime and launcher together

pub mod controller;
pub mod launcher;
pub mod runtime;
pub mod status;

pub use controller::{OutputSnapshot, PipelineController, EMPTY_CONTENT_MESSAGE};
pub use launcher::{ComposeLauncher, LaunchHandle, PipelineLauncher};
pub use runtime::{
    ContainerRuntime, DockerConnector, DockerRuntime, RuntimeConnector, SocketEndpoint,
};
pub use status::{AgentReport, AgentStatus, ContainerLifecycle, ContainerSnapshot};
