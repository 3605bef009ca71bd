//! Pipeline controller
//!
//! Implements the three runtime-facing operations of the service:
//! start a run, poll per-agent status, and fetch the output artifact.
//! Runs are implicit: there is no run id and nothing survives between
//! requests except the two files and the containers themselves.

use crate::launcher::{ComposeLauncher, LaunchHandle, PipelineLauncher};
use crate::runtime::{DockerConnector, RuntimeConnector};
use crate::status::{AgentReport, AgentStatus};
use digest_foundation::{Error, Result, ServiceConfig, WorkspaceFiles};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Error message for empty run content
pub const EMPTY_CONTENT_MESSAGE: &str = "Content cannot be empty";

/// Current state of the output artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSnapshot {
    pub ready: bool,
    pub content: String,
}

impl OutputSnapshot {
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            content: String::new(),
        }
    }

    pub fn ready(content: String) -> Self {
        Self {
            ready: true,
            content,
        }
    }
}

/// Drives the external pipeline through a container runtime and the filesystem
pub struct PipelineController {
    config: Arc<ServiceConfig>,
    files: WorkspaceFiles,
    connector: Arc<dyn RuntimeConnector>,
    launcher: Arc<dyn PipelineLauncher>,
    /// Present only when `serialize_runs` is enabled
    run_lock: Option<Mutex<()>>,
}

impl PipelineController {
    pub fn new(
        config: ServiceConfig,
        connector: Arc<dyn RuntimeConnector>,
        launcher: Arc<dyn PipelineLauncher>,
    ) -> Self {
        let files = WorkspaceFiles::from_config(&config);
        let run_lock = config.serialize_runs.then(|| Mutex::new(()));
        Self {
            config: Arc::new(config),
            files,
            connector,
            launcher,
            run_lock,
        }
    }

    /// Controller backed by the local Docker daemon and the compose CLI
    pub fn docker(config: ServiceConfig) -> Self {
        let connector = Arc::new(DockerConnector::from_config(&config));
        let launcher = Arc::new(ComposeLauncher::new(config.compose.clone()));
        Self::new(config, connector, launcher)
    }

    // ========================================================================
    // Start run
    // ========================================================================

    /// Persist `content`, clear stale state and launch the pipeline.
    ///
    /// Returns as soon as the compose process is spawned. The handle can be
    /// dropped; the pipeline keeps running.
    pub async fn start_run(&self, content: &str) -> Result<LaunchHandle> {
        if content.trim().is_empty() {
            return Err(Error::validation(EMPTY_CONTENT_MESSAGE));
        }

        let _guard = match &self.run_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        self.files.ensure_dirs().await?;
        self.files.write_input(content).await?;
        self.files.clear_output().await?;

        let runtime = self.connector.connect().await?;
        for name in &self.config.agents {
            // Exited containers from the last run would block compose from
            // recreating them
            if runtime.inspect(name).await?.is_some() {
                runtime.remove(name, true).await?;
                info!("Removed stale container {}", name);
            }
        }

        let handle = self.launcher.launch(&self.config.base_dir)?;
        info!("Pipeline started");
        Ok(handle)
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Live status of every agent, in pipeline order
    pub async fn status(&self) -> Result<Vec<AgentReport>> {
        let runtime = self.connector.connect().await?;

        let mut reports = Vec::with_capacity(self.config.agents.len());
        for name in &self.config.agents {
            let snapshot = runtime.inspect(name).await?;
            let status = AgentStatus::from_snapshot(snapshot.as_ref());
            debug!(agent = %name, %status, "Polled agent");
            reports.push(AgentReport::new(self.config.agent_label(name), status));
        }
        Ok(reports)
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// The output artifact, or not-ready while the pipeline has not written it
    pub async fn output(&self) -> Result<OutputSnapshot> {
        Ok(match self.files.read_output().await? {
            Some(content) => OutputSnapshot::ready(content),
            None => OutputSnapshot::not_ready(),
        })
    }
}
