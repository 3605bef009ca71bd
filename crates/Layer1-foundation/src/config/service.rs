//! Service Config - 파이프라인 서비스 설정
//!
//! 고정 경로, 에이전트 목록, Docker 소켓, compose 명령을 하나로 관리

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// 설정 파일명 (base 디렉토리 기준)
pub const SERVICE_CONFIG_FILE: &str = "digest.json";

/// Container names of the pipeline stages, in execution order
pub const DEFAULT_AGENTS: [&str; 4] = [
    "agent_ingestor",
    "agent_summarizer",
    "agent_prioritizer",
    "agent_formatter",
];

/// Prefix stripped from container names to build agent labels
pub const DEFAULT_AGENT_PREFIX: &str = "agent_";

/// Only origin allowed to make cross-origin requests
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

// ============================================================================
// Compose Command
// ============================================================================

/// External command that builds and starts every agent container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ComposeCommand {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            args: vec!["compose".to_string(), "up".to_string(), "--build".to_string()],
        }
    }
}

impl ComposeCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Shell-like rendering for logs
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ============================================================================
// Service Config
// ============================================================================

/// Immutable configuration handed to the controller and router at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    /// Working directory of the compose project; other paths resolve against it
    pub base_dir: PathBuf,

    /// Input document, relative to `base_dir`
    pub input_file: PathBuf,

    /// Output artifact written by the formatter stage, relative to `base_dir`
    pub output_file: PathBuf,

    /// Container names, in the order they are reported
    pub agents: Vec<String>,

    pub agent_prefix: String,

    /// Runtime sockets, tried in order
    pub docker_sockets: Vec<PathBuf>,

    pub compose: ComposeCommand,

    pub cors_origin: String,

    pub bind: SocketAddr,

    /// Serialize overlapping run requests behind a lock.
    /// Off by default: two runs started back to back may interleave.
    pub serialize_runs: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            input_file: PathBuf::from("data").join("input").join("input.txt"),
            output_file: PathBuf::from("output").join("daily_digest.md"),
            agents: DEFAULT_AGENTS.iter().map(|a| a.to_string()).collect(),
            agent_prefix: DEFAULT_AGENT_PREFIX.to_string(),
            docker_sockets: default_docker_sockets(),
            compose: ComposeCommand::default(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            bind: DEFAULT_BIND
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8000))),
            serialize_runs: false,
        }
    }
}

/// Default runtime socket, then the per-user Docker Desktop locations
pub fn default_docker_sockets() -> Vec<PathBuf> {
    let mut sockets = vec![PathBuf::from("/var/run/docker.sock")];
    if let Some(home) = dirs::home_dir() {
        sockets.push(home.join(".docker").join("run").join("docker.sock"));
        sockets.push(
            home.join("Library")
                .join("Containers")
                .join("com.docker.docker")
                .join("Data")
                .join("docker.sock"),
        );
    }
    sockets
}

impl ServiceConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// Load configuration for a base directory.
    ///
    /// An explicit file must exist. Without one, `digest.json` inside
    /// `base_dir` is used when present; otherwise defaults apply. Fields
    /// missing from the file keep their defaults, and `base_dir` always
    /// ends up as the directory passed in.
    pub fn load(base_dir: impl Into<PathBuf>, explicit: Option<&Path>) -> Result<Self> {
        let base_dir = base_dir.into();
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = base_dir.join(SERVICE_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.base_dir = base_dir;
        config.validate()?;
        Ok(config)
    }

    /// JSON 파일에서 로드
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.agents.is_empty() {
            return Err(Error::Config("at least one agent is required".to_string()));
        }
        if self.compose.program.trim().is_empty() {
            return Err(Error::Config("compose program must not be empty".to_string()));
        }
        if self.input_file.as_os_str().is_empty() || self.output_file.as_os_str().is_empty() {
            return Err(Error::Config(
                "input and output files must be set".to_string(),
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Builders (CLI overrides)
    // ========================================================================

    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }

    pub fn with_serialize_runs(mut self, enabled: bool) -> Self {
        self.serialize_runs = enabled;
        self
    }

    pub fn with_docker_sockets(mut self, sockets: Vec<PathBuf>) -> Self {
        self.docker_sockets = sockets;
        self
    }

    // ========================================================================
    // Paths
    // ========================================================================

    pub fn input_path(&self) -> PathBuf {
        self.base_dir.join(&self.input_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.base_dir.join(&self.output_file)
    }

    /// Label reported for a container name (`agent_formatter` -> `formatter`)
    pub fn agent_label<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(self.agent_prefix.as_str()).unwrap_or(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = ServiceConfig::new("/srv/digest");
        assert_eq!(
            config.input_path(),
            PathBuf::from("/srv/digest/data/input/input.txt")
        );
        assert_eq!(
            config.output_path(),
            PathBuf::from("/srv/digest/output/daily_digest.md")
        );
        assert_eq!(config.bind.port(), 8000);
        assert!(!config.serialize_runs);
    }

    #[test]
    fn test_agent_labels() {
        let config = ServiceConfig::default();
        let labels: Vec<_> = config.agents.iter().map(|a| config.agent_label(a)).collect();
        assert_eq!(labels, ["ingestor", "summarizer", "prioritizer", "formatter"]);
        assert_eq!(config.agent_label("sidecar"), "sidecar");
    }

    #[test]
    fn test_default_sockets_start_with_system_socket() {
        let sockets = default_docker_sockets();
        assert_eq!(sockets[0], PathBuf::from("/var/run/docker.sock"));
        assert!(sockets.len() <= 3);
    }

    #[test]
    fn test_compose_display() {
        assert_eq!(ComposeCommand::default().display(), "docker compose up --build");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.base_dir, dir.path());
        assert_eq!(config.agents.len(), 4);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SERVICE_CONFIG_FILE),
            r#"{ "corsOrigin": "http://localhost:5173", "serializeRuns": true }"#,
        )
        .unwrap();

        let config = ServiceConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert!(config.serialize_runs);
        assert_eq!(config.compose, ComposeCommand::default());
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = ServiceConfig::load(dir.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_rejects_empty_agent_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "agents": [] }"#).unwrap();

        let err = ServiceConfig::load(dir.path(), Some(&path)).unwrap_err();
        assert!(err.to_string().contains("at least one agent"));
    }
}
