//! Container runtime access
//!
//! The service never holds a long-lived Docker client: every request that
//! needs the runtime connects again, trying each configured socket in order.

use crate::status::{ContainerLifecycle, ContainerSnapshot};
use async_trait::async_trait;
use bollard::container::{InspectContainerOptions, RemoveContainerOptions};
use bollard::errors::Error as BollardError;
use bollard::models::ContainerStateStatusEnum;
use bollard::{Docker, API_DEFAULT_VERSION};
use digest_foundation::{ConnectAttempt, Error, Result, ServiceConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Seconds bollard waits on a socket before giving up
const SOCKET_TIMEOUT_SECS: u64 = 120;

/// Operations the controller needs from a connected runtime
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Inspect a container by name; `None` when it does not exist
    async fn inspect(&self, name: &str) -> Result<Option<ContainerSnapshot>>;

    /// Remove a container by name. Removing a missing container succeeds.
    async fn remove(&self, name: &str, force: bool) -> Result<()>;
}

/// Produces a live runtime handle, or explains why none is reachable
#[async_trait]
pub trait RuntimeConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn ContainerRuntime>>;
}

// ============================================================================
// Docker
// ============================================================================

/// Docker reached over a local unix socket
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }
}

fn is_not_found(err: &BollardError) -> bool {
    matches!(
        err,
        BollardError::DockerResponseServerError {
            status_code: 404,
            ..
        }
    )
}

fn lifecycle(status: Option<ContainerStateStatusEnum>) -> ContainerLifecycle {
    match status {
        Some(ContainerStateStatusEnum::CREATED) => ContainerLifecycle::Created,
        Some(ContainerStateStatusEnum::RUNNING) => ContainerLifecycle::Running,
        Some(ContainerStateStatusEnum::PAUSED) => ContainerLifecycle::Paused,
        Some(ContainerStateStatusEnum::RESTARTING) => ContainerLifecycle::Restarting,
        Some(ContainerStateStatusEnum::REMOVING) => ContainerLifecycle::Removing,
        Some(ContainerStateStatusEnum::EXITED) => ContainerLifecycle::Exited,
        Some(ContainerStateStatusEnum::DEAD) => ContainerLifecycle::Dead,
        _ => ContainerLifecycle::Unknown,
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn inspect(&self, name: &str) -> Result<Option<ContainerSnapshot>> {
        match self
            .docker
            .inspect_container(name, None::<InspectContainerOptions>)
            .await
        {
            Ok(response) => {
                let (status, exit_code) = response
                    .state
                    .map(|s| (s.status, s.exit_code))
                    .unwrap_or((None, None));
                Ok(Some(ContainerSnapshot::new(lifecycle(status), exit_code)))
            }
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(Error::Runtime(format!(
                "Failed to inspect container {}: {}",
                name, e
            ))),
        }
    }

    async fn remove(&self, name: &str, force: bool) -> Result<()> {
        let options = RemoveContainerOptions {
            force,
            ..Default::default()
        };

        match self.docker.remove_container(name, Some(options)).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) => Ok(()),
            Err(e) => Err(Error::Runtime(format!(
                "Failed to remove container {}: {}",
                name, e
            ))),
        }
    }
}

/// A candidate socket path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEndpoint {
    path: PathBuf,
}

impl SocketEndpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Display for SocketEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unix://{}", self.path.display())
    }
}

/// Tries each socket in order and keeps the first that answers a ping
pub struct DockerConnector {
    endpoints: Vec<SocketEndpoint>,
}

impl DockerConnector {
    pub fn new(endpoints: Vec<SocketEndpoint>) -> Self {
        Self { endpoints }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            config
                .docker_sockets
                .iter()
                .map(SocketEndpoint::new)
                .collect(),
        )
    }

    pub fn endpoints(&self) -> &[SocketEndpoint] {
        &self.endpoints
    }

    async fn try_endpoint(endpoint: &SocketEndpoint) -> std::result::Result<Docker, String> {
        let path = endpoint.path().to_string_lossy();
        let docker = Docker::connect_with_socket(&path, SOCKET_TIMEOUT_SECS, API_DEFAULT_VERSION)
            .map_err(|e| e.to_string())?;
        docker.ping().await.map_err(|e| e.to_string())?;
        Ok(docker)
    }
}

#[async_trait]
impl RuntimeConnector for DockerConnector {
    async fn connect(&self) -> Result<Arc<dyn ContainerRuntime>> {
        let mut attempts = Vec::with_capacity(self.endpoints.len());

        for endpoint in &self.endpoints {
            debug!("Trying Docker socket {}", endpoint);
            match Self::try_endpoint(endpoint).await {
                Ok(docker) => {
                    info!("Connected to Docker at {}", endpoint);
                    return Ok(Arc::new(DockerRuntime::new(docker)));
                }
                Err(reason) => {
                    debug!("Docker socket {} unavailable: {}", endpoint, reason);
                    attempts.push(ConnectAttempt::new(endpoint.to_string(), reason));
                }
            }
        }

        warn!(
            attempts = attempts.len(),
            "No Docker socket responded to ping"
        );
        Err(Error::RuntimeUnavailable { attempts })
    }
}
