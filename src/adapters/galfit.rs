//! Drives the external GALFIT binary and the `ic` mask tool.

use crate::core::workspace::{Workspace, FIT_RESULT_NAME};
use crate::domain::model::ProcessOutcome;
use crate::domain::ports::Fitter;
use crate::utils::error::{GalfitError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time;

pub const GALFIT_BINARY: &str = "galfit";
pub const MASK_BINARY: &str = "ic";

/// `ic` image-calculator expression producing a 0/1 mask from the source
/// image, written to stdout.
pub const MASK_EXPRESSION: &str = "1 0 %1 0 == ?";

pub struct GalfitProcess {
    binary: String,
    mask_binary: String,
    timeout: Duration,
}

impl GalfitProcess {
    pub fn new(timeout: Duration) -> Self {
        Self::with_binaries(GALFIT_BINARY, MASK_BINARY, timeout)
    }

    pub fn with_binaries(
        binary: impl Into<String>,
        mask_binary: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            binary: binary.into(),
            mask_binary: mask_binary.into(),
            timeout,
        }
    }

    /// Spawn the command and wait for it, killing it at the timeout. The
    /// exit code is reported, never trusted: callers check artifacts.
    async fn run(&self, mut command: Command, label: &str) -> Result<ProcessOutcome> {
        let mut child = command.spawn().map_err(|e| GalfitError::ExternalProcessError {
            command: label.to_string(),
            message: e.to_string(),
        })?;

        match time::timeout(self.timeout, child.wait()).await {
            Ok(status) => {
                let status = status.map_err(|e| GalfitError::ExternalProcessError {
                    command: label.to_string(),
                    message: e.to_string(),
                })?;
                Ok(ProcessOutcome {
                    exit_code: status.code(),
                    timed_out: false,
                })
            }
            Err(_) => {
                tracing::warn!("{} did not finish within {:?}, killing it", label, self.timeout);
                let _ = child.kill().await;
                Ok(ProcessOutcome {
                    exit_code: None,
                    timed_out: true,
                })
            }
        }
    }
}

#[async_trait]
impl Fitter for GalfitProcess {
    async fn fit(&self, workspace: &Workspace) -> Result<ProcessOutcome> {
        tracing::info!("Running: {} {}", self.binary, workspace.feedme.display());
        let mut command = Command::new(&self.binary);
        command.arg(&workspace.feedme).current_dir(&workspace.dir);
        self.run(command, &self.binary).await
    }

    async fn refine(&self, workspace: &Workspace) -> Result<ProcessOutcome> {
        tracing::info!("Running: {} -o3 {}", self.binary, FIT_RESULT_NAME);
        let mut command = Command::new(&self.binary);
        command
            .arg("-o3")
            .arg(FIT_RESULT_NAME)
            .current_dir(&workspace.dir);
        self.run(command, &self.binary).await
    }

    async fn make_mask(&self, source: &Path, workspace: &Workspace) -> Result<ProcessOutcome> {
        tracing::info!("Creating mask for {}", source.display());
        let mask = std::fs::File::create(&workspace.mask)?;
        let mut command = Command::new(&self.mask_binary);
        command
            .arg(MASK_EXPRESSION)
            .arg(source)
            .current_dir(&workspace.dir)
            .stdout(Stdio::from(mask));
        match self.run(command, &self.mask_binary).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // File::create already truncated any previous mask; don't
                // leave the empty file behind when the tool never ran.
                let _ = std::fs::remove_file(&workspace.mask);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_binary_is_an_external_process_error() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path(), "sim.feedme").unwrap();
        let fitter = GalfitProcess::with_binaries(
            "galfit-binary-that-does-not-exist",
            "ic",
            Duration::from_secs(1),
        );

        let err = fitter.fit(&workspace).await.unwrap_err();
        assert!(matches!(err, GalfitError::ExternalProcessError { .. }));
    }

    #[tokio::test]
    async fn failed_mask_spawn_removes_the_truncated_mask() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path(), "sim.feedme").unwrap();
        std::fs::write(&workspace.mask, b"previous mask").unwrap();
        let fitter = GalfitProcess::with_binaries(
            "galfit",
            "ic-binary-that-does-not-exist",
            Duration::from_secs(1),
        );

        let err = fitter
            .make_mask(Path::new("src.fits"), &workspace)
            .await
            .unwrap_err();
        assert!(matches!(err, GalfitError::ExternalProcessError { .. }));
        assert!(!workspace.mask.exists());
    }

    #[tokio::test]
    async fn exit_code_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path(), "sim.feedme").unwrap();
        // `false` ignores its argument and exits 1, like a failed fit.
        let fitter = GalfitProcess::with_binaries("false", "false", Duration::from_secs(5));

        let outcome = fitter.fit(&workspace).await.unwrap();
        assert_eq!(outcome.exit_code, Some(1));
        assert!(!outcome.succeeded());
    }
}
