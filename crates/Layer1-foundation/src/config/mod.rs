//! Config - 서비스 설정 관리
//!
//! - `service.rs` - ServiceConfig 통합 설정

mod service;

pub use service::{
    default_docker_sockets, ComposeCommand, ServiceConfig, DEFAULT_AGENTS, DEFAULT_AGENT_PREFIX,
    DEFAULT_BIND, DEFAULT_CORS_ORIGIN, SERVICE_CONFIG_FILE,
};
