//! 파이프라인 입력/출력 파일

use crate::{Result, ServiceConfig};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Fixed input and output locations shared with the external pipeline.
///
/// There is one input file and one output file; every run overwrites the
/// first and removes the second.
#[derive(Debug, Clone)]
pub struct WorkspaceFiles {
    input_path: PathBuf,
    output_path: PathBuf,
}

impl WorkspaceFiles {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.input_path(), config.output_path())
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Create the input and output directories if missing
    pub async fn ensure_dirs(&self) -> Result<()> {
        for path in [&self.input_path, &self.output_path] {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).await?;
            }
        }
        Ok(())
    }

    /// Overwrite the input document
    pub async fn write_input(&self, content: &str) -> Result<()> {
        fs::write(&self.input_path, content.as_bytes()).await?;
        info!("Wrote input to {}", self.input_path.display());
        Ok(())
    }

    /// Remove a previous run's output. Missing file is fine.
    ///
    /// Returns whether a file was actually removed.
    pub async fn clear_output(&self) -> Result<bool> {
        match fs::remove_file(&self.output_path).await {
            Ok(()) => {
                debug!("Removed stale output {}", self.output_path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the output artifact, `None` while the pipeline has not produced it
    pub async fn read_output(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.output_path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
