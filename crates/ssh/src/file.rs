//! Reading and replacing the SSH config file on disk.

use crate::error::ConfigError;
use crate::hosts;
use std::fs::Permissions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::task;

/// Permission bits for a newly created config file.
#[cfg(unix)]
const CONFIG_FILE_MODE: u32 = 0o644;

/// The SSH config file on disk.
///
/// Every operation is a single read or a single full-file replace. Readers
/// see either the old or the new content, never a partial file. There is
/// no locking, so two concurrent writers race and the last one wins.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file as UTF-8 text. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] for any other failure.
    pub async fn read(&self) -> Result<Option<String>, ConfigError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Replaces the whole file with `content`.
    ///
    /// The content goes to a temporary file next to the target, which is
    /// then renamed over it. A new file gets mode 0644; an existing one
    /// keeps its permissions. A symlinked config is replaced at its target.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Write`] if the file cannot be written or moved
    /// into place.
    pub async fn write(&self, content: &str) -> Result<(), ConfigError> {
        let path = self.path.clone();
        let content = content.to_owned();

        task::spawn_blocking(move || replace_file(&path, &content))
            .await
            .unwrap_or_else(|e| Err(io::Error::other(e)))
            .map_err(|source| ConfigError::Write {
                path: self.path.clone(),
                source,
            })
    }

    /// Creates the directory holding the file, if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CreateDir`] if the directory cannot be created.
    pub async fn ensure_parent_dir(&self) -> Result<(), ConfigError> {
        let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) else {
            return Ok(());
        };

        fs::create_dir_all(dir)
            .await
            .map_err(|source| ConfigError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
    }

    /// Lists the `compute.*` hosts in the file. A missing file has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn compute_hosts(&self) -> Result<Vec<String>, ConfigError> {
        let Some(text) = self.read().await? else {
            return Ok(Vec::new());
        };

        hosts::compute_hosts(&text).map_err(|message| ConfigError::Hosts {
            path: self.path.clone(),
            message,
        })
    }
}

fn replace_file(path: &Path, content: &str) -> io::Result<()> {
    let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = target
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let permissions = match std::fs::metadata(&target) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => new_file_permissions(),
        Err(e) => return Err(e),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".config.")
        .tempfile_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    if let Some(permissions) = permissions {
        temp.as_file().set_permissions(permissions)?;
    }

    temp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(Permissions::from_mode(CONFIG_FILE_MODE))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
