//! Configuring SSH access to a Compute Engine instance through IAP.

use crate::cli::{CommandSource, GcloudError};
use ssh::{ConfigError, ConfigFile, Logger, MergeOutcome, MergeRequest, Merger};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// One user request to configure an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub project_id: String,
    pub instance_name: String,
    pub zone: String,
    /// Create a missing config file and replace an existing entry.
    pub force: bool,
    /// Return the generated block instead of writing it.
    pub dry_run: bool,
}

impl ConfigureRequest {
    /// Checks that every identifier is present.
    ///
    /// # Errors
    ///
    /// Returns [`IapError::InvalidRequest`] naming the first empty field.
    pub fn validate(&self) -> Result<(), IapError> {
        let fields = [
            ("Project ID", &self.project_id),
            ("Instance name", &self.instance_name),
            ("Zone", &self.zone),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(IapError::InvalidRequest(format!("{name} is required")));
            }
        }

        Ok(())
    }
}

/// Result of a successful request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Configured {
    /// The config file was written.
    Written { path: PathBuf, updated: bool },
    /// Dry run: the block that would be added, and where.
    Preview { content: String, config_path: PathBuf },
}

/// Coarse failure classes, for callers that branch on the kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    ToolFailure,
    ParseFailure,
    MissingFile,
    DuplicateEntry,
    IoFailure,
}

/// Error type for [`IapService::configure`].
#[derive(Error, Debug)]
pub enum IapError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Failed to get SSH configuration from gcloud: {0}")]
    Tool(#[source] GcloudError),

    #[error("Failed to get SSH options from gcloud output")]
    NoOptions,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl IapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IapError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            IapError::Tool(_) => ErrorKind::ToolFailure,
            IapError::NoOptions => ErrorKind::ParseFailure,
            IapError::Config(ConfigError::MissingFile { .. }) => ErrorKind::MissingFile,
            IapError::Config(ConfigError::DuplicateEntry { .. }) => ErrorKind::DuplicateEntry,
            IapError::Config(_) => ErrorKind::IoFailure,
        }
    }
}

/// Turns gcloud's dry-run SSH command into an entry in the SSH config file.
pub struct IapService<S> {
    source: S,
    config: ConfigFile,
    merger: Merger,
    logger: Arc<dyn Logger>,
}

impl<S: fmt::Debug> fmt::Debug for IapService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IapService")
            .field("source", &self.source)
            .field("config", &self.config)
            .field("merger", &self.merger)
            .finish_non_exhaustive()
    }
}

impl<S: CommandSource> IapService<S> {
    /// Creates a service writing to `config_path`, using the current OS
    /// account as the fallback SSH user.
    pub fn new(source: S, config_path: impl Into<PathBuf>, logger: Arc<dyn Logger>) -> Self {
        Self::with_local_user(source, config_path, logger, whoami::username())
    }

    pub fn with_local_user(
        source: S,
        config_path: impl Into<PathBuf>,
        logger: Arc<dyn Logger>,
        local_user: impl Into<String>,
    ) -> Self {
        Self {
            source,
            config: ConfigFile::new(config_path),
            merger: Merger::new(logger.clone(), local_user),
            logger,
        }
    }

    pub fn config_path(&self) -> &Path {
        self.config.path()
    }

    /// Runs one configuration request to completion.
    ///
    /// The directory of the config file is created only once a write is
    /// certain, right before the file is replaced. A dry run performs no file
    /// I/O at all.
    ///
    /// # Errors
    ///
    /// See [`IapError::kind`] for the failure classes. The config file is
    /// left untouched by every failure.
    pub async fn configure(&self, request: &ConfigureRequest) -> Result<Configured, IapError> {
        request.validate()?;

        let output = self
            .source
            .dry_run_ssh(&request.project_id, &request.instance_name, &request.zone)
            .await
            .map_err(IapError::Tool)?;

        if !output.stderr.trim().is_empty() {
            self.logger
                .record(&format!("Warning from gcloud command: {}", output.stderr.trim()));
        }

        let options = ssh::parse(&output.stdout);
        if options.is_empty() {
            return Err(IapError::NoOptions);
        }

        let merge_request = MergeRequest {
            options: &options,
            instance_name: &request.instance_name,
            force: request.force,
            dry_run: request.dry_run,
        };

        let existing = if request.dry_run {
            None
        } else {
            self.config.read().await?
        };

        match self
            .merger
            .merge(existing.as_deref(), self.config.path(), &merge_request)?
        {
            MergeOutcome::Preview(content) => Ok(Configured::Preview {
                content,
                config_path: self.config.path().to_path_buf(),
            }),
            MergeOutcome::Write { content, updated } => {
                self.config.ensure_parent_dir().await?;
                self.config.write(&content).await?;

                self.logger.record(&format!(
                    "SSH config {} successfully for instance: {}",
                    if updated { "updated" } else { "added" },
                    ssh::host_alias(&request.instance_name)
                ));

                Ok(Configured::Written {
                    path: self.config.path().to_path_buf(),
                    updated,
                })
            }
        }
    }
}
