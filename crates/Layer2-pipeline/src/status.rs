//! Agent status mapping

use serde::{Deserialize, Serialize};

/// Lifecycle state of a container as reported by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerLifecycle {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Unknown,
}

/// What one inspection of a container returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSnapshot {
    pub state: ContainerLifecycle,
    pub exit_code: Option<i64>,
}

impl ContainerSnapshot {
    pub fn new(state: ContainerLifecycle, exit_code: Option<i64>) -> Self {
        Self { state, exit_code }
    }

    pub fn running() -> Self {
        Self::new(ContainerLifecycle::Running, None)
    }

    pub fn exited(code: i64) -> Self {
        Self::new(ContainerLifecycle::Exited, Some(code))
    }
}

/// Progress of one pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Container not created yet, or in a transitional state
    Pending,
    Running,
    /// Exited with code 0
    Done,
    /// Exited with any other code
    Error,
}

impl AgentStatus {
    /// Map a container observation to a stage status.
    ///
    /// A missing container is pending. Only `running` and `exited` are
    /// distinguished; every other state reads as pending.
    pub fn from_snapshot(snapshot: Option<&ContainerSnapshot>) -> Self {
        let Some(snapshot) = snapshot else {
            return AgentStatus::Pending;
        };
        match snapshot.state {
            ContainerLifecycle::Running => AgentStatus::Running,
            ContainerLifecycle::Exited if snapshot.exit_code == Some(0) => AgentStatus::Done,
            ContainerLifecycle::Exited => AgentStatus::Error,
            _ => AgentStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Pending => "pending",
            AgentStatus::Running => "running",
            AgentStatus::Done => "done",
            AgentStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a status poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReport {
    /// Container name with the agent prefix stripped
    pub agent: String,
    pub status: AgentStatus,
}

impl AgentReport {
    pub fn new(agent: impl Into<String>, status: AgentStatus) -> Self {
        Self {
            agent: agent.into(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_container_is_pending() {
        assert_eq!(AgentStatus::from_snapshot(None), AgentStatus::Pending);
    }

    #[test]
    fn test_running_and_exit_codes() {
        assert_eq!(
            AgentStatus::from_snapshot(Some(&ContainerSnapshot::running())),
            AgentStatus::Running
        );
        assert_eq!(
            AgentStatus::from_snapshot(Some(&ContainerSnapshot::exited(0))),
            AgentStatus::Done
        );
        assert_eq!(
            AgentStatus::from_snapshot(Some(&ContainerSnapshot::exited(137))),
            AgentStatus::Error
        );
        assert_eq!(
            AgentStatus::from_snapshot(Some(&ContainerSnapshot::new(
                ContainerLifecycle::Exited,
                None
            ))),
            AgentStatus::Error
        );
    }

    #[test]
    fn test_other_states_are_pending() {
        for state in [
            ContainerLifecycle::Created,
            ContainerLifecycle::Paused,
            ContainerLifecycle::Restarting,
            ContainerLifecycle::Removing,
            ContainerLifecycle::Dead,
            ContainerLifecycle::Unknown,
        ] {
            let snapshot = ContainerSnapshot::new(state, Some(0));
            assert_eq!(
                AgentStatus::from_snapshot(Some(&snapshot)),
                AgentStatus::Pending,
                "{state:?}"
            );
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let report = AgentReport::new("formatter", AgentStatus::Done);
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"agent":"formatter","status":"done"}"#);
    }
}
