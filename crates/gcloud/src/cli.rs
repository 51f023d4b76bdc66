use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

const GCLOUD_BIN: &str = "gcloud";

/// Captured output of `gcloud compute ssh --dry-run`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DryRun {
    /// The SSH command gcloud would have run.
    pub stdout: String,
    /// Diagnostics; not an error by itself.
    pub stderr: String,
}

/// Error type for invoking gcloud.
#[derive(Error, Debug)]
pub enum GcloudError {
    #[error("could not run {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("gcloud {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Something that can produce the dry-run SSH command for an instance.
pub trait CommandSource {
    fn dry_run_ssh(
        &self,
        project_id: &str,
        instance_name: &str,
        zone: &str,
    ) -> impl Future<Output = Result<DryRun, GcloudError>> + Send;
}

/// The Google Cloud CLI.
#[derive(Debug, Clone)]
pub struct Gcloud {
    program: PathBuf,
}

impl Default for Gcloud {
    fn default() -> Self {
        Self::locate(None)
    }
}

impl Gcloud {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Uses `explicit` if given, else the `gcloud` found on `PATH`.
    ///
    /// Falls back to the bare name so a missing CLI is reported when it is
    /// first run rather than here.
    pub fn locate(explicit: Option<&str>) -> Self {
        if let Some(path) = explicit.filter(|p| !p.is_empty()) {
            return Self::new(path);
        }

        Self::new(which::which(GCLOUD_BIN).unwrap_or_else(|_| PathBuf::from(GCLOUD_BIN)))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn dry_run_args<'a>(project_id: &'a str, instance_name: &'a str, zone: &'a str) -> [&'a str; 9] {
        [
            "compute",
            "ssh",
            instance_name,
            "--tunnel-through-iap",
            "--dry-run",
            "--zone",
            zone,
            "--project",
            project_id,
        ]
    }
}

impl CommandSource for Gcloud {
    async fn dry_run_ssh(
        &self,
        project_id: &str,
        instance_name: &str,
        zone: &str,
    ) -> Result<DryRun, GcloudError> {
        log::debug!(
            "Running {} for {instance_name} in {project_id}/{zone}",
            self.program.display()
        );

        let output = Command::new(&self.program)
            .args(Self::dry_run_args(project_id, instance_name, zone))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| GcloudError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(GcloudError::Failed {
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(DryRun { stdout, stderr })
    }
}
