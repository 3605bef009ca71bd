//! Compose launcher - starts the agent containers without waiting on them

use digest_foundation::{ComposeCommand, Error, Result};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Handle to a launched pipeline process.
///
/// Dropping it detaches the process; the background task still reaps it.
#[derive(Debug)]
pub struct LaunchHandle {
    pid: Option<u32>,
    task: JoinHandle<Option<ExitStatus>>,
}

impl LaunchHandle {
    pub fn new(pid: Option<u32>, task: JoinHandle<Option<ExitStatus>>) -> Self {
        Self { pid, task }
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Wait for the process to exit. Only tests and tooling do this;
    /// request handlers never wait.
    pub async fn wait(self) -> Option<ExitStatus> {
        self.task.await.ok().flatten()
    }
}

/// Starts the external pipeline
pub trait PipelineLauncher: Send + Sync {
    /// Spawn the pipeline in `workdir` and return immediately
    fn launch(&self, workdir: &Path) -> Result<LaunchHandle>;
}

/// Runs the compose command (`docker compose up --build` by default)
#[derive(Debug, Clone, Default)]
pub struct ComposeLauncher {
    command: ComposeCommand,
}

impl ComposeLauncher {
    pub fn new(command: ComposeCommand) -> Self {
        Self { command }
    }
}

impl PipelineLauncher for ComposeLauncher {
    fn launch(&self, workdir: &Path) -> Result<LaunchHandle> {
        let command_line = self.command.display();

        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Launch(format!("{}: {}", command_line, e)))?;

        let pid = child.id();
        info!(pid = ?pid, "Launched `{}` in {}", command_line, workdir.display());

        let task = tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {
                    info!("`{}` exited cleanly", command_line);
                    Some(status)
                }
                Ok(status) => {
                    warn!(code = ?status.code(), "`{}` exited with failure", command_line);
                    Some(status)
                }
                Err(e) => {
                    warn!("Failed to wait on `{}`: {}", command_line, e);
                    None
                }
            }
        });

        Ok(LaunchHandle::new(pid, task))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ComposeLauncher {
        ComposeLauncher::new(ComposeCommand::new(
            "sh",
            vec!["-c".to_string(), script.to_string()],
        ))
    }

    #[tokio::test]
    async fn test_launch_runs_in_workdir() {
        let dir = tempfile::tempdir().unwrap();
        let handle = sh("echo up > launched.txt").launch(dir.path()).unwrap();
        assert!(handle.pid().is_some());

        let status = handle.wait().await.expect("process reaped");
        assert!(status.success());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("launched.txt")).unwrap(),
            "up\n"
        );
    }

    #[tokio::test]
    async fn test_launch_returns_before_process_exits() {
        let dir = tempfile::tempdir().unwrap();
        let started = std::time::Instant::now();
        let handle = sh("sleep 2").launch(dir.path()).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        drop(handle);
    }

    #[tokio::test]
    async fn test_failing_process_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let status = sh("exit 3").launch(dir.path()).unwrap().wait().await.unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[tokio::test]
    async fn test_missing_program_is_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = ComposeLauncher::new(ComposeCommand::new(
            "definitely-not-a-real-binary-1f3a",
            vec![],
        ));
        let err = launcher.launch(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Launch(_)));
    }
}
