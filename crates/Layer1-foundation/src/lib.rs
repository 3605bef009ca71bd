//! # digest-foundation
//!
//! Foundation layer for the digest pipeline service:
//! - Error: 에러 타입 (thiserror)
//! - Config: ServiceConfig (경로, 에이전트, 소켓, compose 명령)
//! - Storage: 입력/출력 파일 (WorkspaceFiles)

pub mod config;
pub mod error;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{ConnectAttempt, Error, Result, RUNTIME_REMEDIATION};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    default_docker_sockets, ComposeCommand, ServiceConfig, DEFAULT_AGENTS, DEFAULT_AGENT_PREFIX,
    DEFAULT_BIND, DEFAULT_CORS_ORIGIN, SERVICE_CONFIG_FILE,
};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::WorkspaceFiles;
