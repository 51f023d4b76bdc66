use crate::error::SettingsError;
use crate::sources::config::{self, ConfigContent};
use std::path::{Path, PathBuf};

/// Complete application settings with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// SSH config file to update, set specifically for this tool.
    pub ssh_config_path: Option<String>,
    /// SSH config file shared with remote-SSH tooling.
    pub remote_ssh_config_file: Option<String>,
    /// Project used when none is given on the command line.
    pub default_project: Option<String>,
    /// Zone used when none is given on the command line.
    pub default_zone: String,
    /// Explicit gcloud executable.
    pub gcloud_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_content(ConfigContent::default())
    }
}

/// Empty strings count as "not set".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Default zone value when not specified in settings.
    pub const DEFAULT_ZONE: &'static str = "us-west1-a";

    fn from_content(content: ConfigContent) -> Self {
        Self {
            ssh_config_path: non_empty(content.ssh_config_path),
            remote_ssh_config_file: non_empty(content.remote_ssh_config_file),
            default_project: non_empty(content.default_project),
            default_zone: non_empty(content.default_zone)
                .unwrap_or_else(|| Self::DEFAULT_ZONE.to_string()),
            gcloud_path: non_empty(content.gcloud_path),
        }
    }

    /// Load settings from `~/.gcp-iap-ssh.json` (defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Home directory cannot be determined
    /// - Settings file exists but is invalid JSON or fails validation
    pub fn load() -> Result<Self, SettingsError> {
        Ok(config::load()?.map(Self::from_content).unwrap_or_default())
    }

    /// Load settings from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or fails schema validation.
    pub fn load_from_str(s: &str) -> Result<Self, SettingsError> {
        config::load_from_str(s).map(Self::from_content)
    }

    /// Load settings from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid.
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        config::load_from_path(path).map(Self::from_content)
    }

    /// Get the path to the settings file.
    pub fn config_path() -> Option<PathBuf> {
        config::config_path()
    }

    /// The user's default SSH config file (`~/.ssh/config`).
    pub fn default_ssh_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".ssh").join("config"))
    }

    /// Resolves the SSH config file to update.
    ///
    /// Precedence: `cli_override`, then `sshConfigPath`, then
    /// `remoteSshConfigFile`, then `~/.ssh/config`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoHomeDir`] if nothing is configured and the
    /// home directory cannot be determined.
    pub fn ssh_config_path(&self, cli_override: Option<&Path>) -> Result<PathBuf, SettingsError> {
        if let Some(path) = cli_override.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(path.to_path_buf());
        }

        if let Some(path) = self
            .ssh_config_path
            .as_deref()
            .or(self.remote_ssh_config_file.as_deref())
        {
            return Ok(PathBuf::from(path));
        }

        Self::default_ssh_config_path().ok_or(SettingsError::NoHomeDir)
    }

    /// Ensure the settings file exists, creating a default one if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or if
    /// writing the default settings file fails.
    pub fn ensure_config_exists() -> Result<PathBuf, SettingsError> {
        config::ensure_config_exists()
    }
}
