//! Error types for the digest service
//!
//! 모든 에러를 중앙에서 관리

use std::fmt;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when no container runtime socket answers.
pub const RUNTIME_REMEDIATION: &str =
    "Docker is not running. Please start Docker Desktop and try again.";

/// One failed attempt to reach the container runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectAttempt {
    /// Socket the attempt targeted
    pub endpoint: String,
    /// Why it failed (connect or ping error)
    pub reason: String,
}

impl ConnectAttempt {
    pub fn new(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConnectAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.endpoint, self.reason)
    }
}

fn summarize(attempts: &[ConnectAttempt]) -> String {
    if attempts.is_empty() {
        return "no sockets configured".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Digest service error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 요청 검증
    // ========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    // ========================================================================
    // 컨테이너 런타임
    // ========================================================================
    #[error("{} (tried {})", RUNTIME_REMEDIATION, summarize(.attempts))]
    RuntimeUnavailable { attempts: Vec<ConnectAttempt> },

    #[error("Container runtime error: {0}")]
    Runtime(String),

    #[error("Failed to launch pipeline: {0}")]
    Launch(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Validation 에러 생성 헬퍼
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Whether the caller sent bad input (as opposed to an infrastructure failure)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Message suitable for an API response body.
    ///
    /// Validation errors return the bare message so clients can show it as-is.
    pub fn detail(&self) -> String {
        match self {
            Error::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
