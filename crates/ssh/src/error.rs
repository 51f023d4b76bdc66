use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for reading, merging and writing the SSH config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file is absent and `force` was not given.
    #[error("SSH config file does not exist at {}. Use force option to create it.", .path.display())]
    MissingFile { path: PathBuf },

    /// A block for the alias already exists and `force` was not given.
    #[error("SSH config entry already exists for {alias}. Use force option to update.")]
    DuplicateEntry { alias: String },

    #[error("Error reading SSH config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error writing SSH config file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error creating SSH config directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but `ssh2-config` rejects it.
    #[error("failed to parse SSH config {}: {message}", .path.display())]
    Hosts { path: PathBuf, message: String },
}

impl ConfigError {
    /// True for failures of the filesystem itself rather than of the request.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ConfigError::Read { .. } | ConfigError::Write { .. } | ConfigError::CreateDir { .. }
        )
    }
}
