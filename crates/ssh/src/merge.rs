//! Merging a generated `Host` block into an SSH config document.

use crate::block::HostBlock;
use crate::document::Document;
use crate::error::ConfigError;
use crate::logger::Logger;
use crate::options::SshOptions;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Inputs of a single merge.
#[derive(Debug, Clone, Copy)]
pub struct MergeRequest<'a> {
    pub options: &'a SshOptions,
    pub instance_name: &'a str,
    /// Create a missing file and replace an existing block.
    pub force: bool,
    /// Only render the block; never look at the file.
    pub dry_run: bool,
}

/// What the caller should do with the merge result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Full replacement content for the config file. `updated` is set when
    /// an existing block for the alias was replaced.
    Write { content: String, updated: bool },
    /// The generated block, for display only.
    Preview(String),
}

/// Builds host blocks and merges them into existing config text.
///
/// Pure apart from logging: reading and writing the file is left to
/// [`crate::ConfigFile`].
pub struct Merger {
    logger: Arc<dyn Logger>,
    local_user: String,
}

impl fmt::Debug for Merger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merger")
            .field("local_user", &self.local_user)
            .finish_non_exhaustive()
    }
}

impl Merger {
    pub fn new(logger: Arc<dyn Logger>, local_user: impl Into<String>) -> Self {
        Self {
            logger,
            local_user: local_user.into(),
        }
    }

    pub fn local_user(&self) -> &str {
        &self.local_user
    }

    /// Renders the block for a request without touching any document.
    pub fn block(&self, request: &MergeRequest<'_>) -> HostBlock {
        HostBlock::new(request.instance_name, request.options, &self.local_user)
    }

    /// Merges the block for `request` into `existing`.
    ///
    /// `existing` is `None` when the file at `path` does not exist; `path`
    /// is only used in messages.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingFile`] if the file is absent and `force` is off.
    /// - [`ConfigError::DuplicateEntry`] if the alias already has a block and
    ///   `force` is off.
    pub fn merge(
        &self,
        existing: Option<&str>,
        path: &Path,
        request: &MergeRequest<'_>,
    ) -> Result<MergeOutcome, ConfigError> {
        let block = self.block(request);

        if request.dry_run {
            return Ok(MergeOutcome::Preview(block.render()));
        }

        let existing = match existing {
            Some(text) => text,
            None if request.force => {
                self.logger.record(&format!(
                    "Creating new SSH config file at {}",
                    path.display()
                ));
                ""
            }
            None => {
                return Err(ConfigError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
        };

        let mut document = Document::parse(existing);
        let entry_exists = document.contains_host(block.alias());

        if entry_exists {
            if !request.force {
                return Err(ConfigError::DuplicateEntry {
                    alias: block.alias().to_string(),
                });
            }
            document.remove_host(block.alias());
        }

        document.push(block.render());

        Ok(MergeOutcome::Write {
            content: document.render(),
            updated: entry_exists,
        })
    }
}
