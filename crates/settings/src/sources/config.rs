use crate::error::{SchemaViolation, SettingsError};
use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_JSON: &str = include_str!("../../../../assets/gcp-iap-ssh.default.json");
const SCHEMA_JSON: &str = include_str!("../../../../assets/gcp-iap-ssh.schema.json");

const SETTINGS_FILE_NAME: &str = ".gcp-iap-ssh.json";

/// Internal settings structure for JSON deserialization.
/// All fields are optional - defaults are applied by the Settings struct.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigContent {
    pub ssh_config_path: Option<String>,
    pub remote_ssh_config_file: Option<String>,
    pub default_project: Option<String>,
    pub default_zone: Option<String>,
    pub gcloud_path: Option<String>,
}

// ============================================================================
// Schema Validation
// ============================================================================

/// Returns the embedded JSON schema as a string.
pub fn schema() -> &'static str {
    SCHEMA_JSON
}

/// Checks a JSON value against the settings schema.
///
/// # Errors
///
/// Returns every [`SchemaViolation`] found, in document order.
///
/// # Panics
///
/// Panics if the embedded schema is not a valid JSON Schema, which the
/// tests in this module rule out.
pub fn validate(value: &Value) -> Result<(), Vec<SchemaViolation>> {
    let schema: Value =
        serde_json::from_str(SCHEMA_JSON).expect("embedded schema should be valid JSON");

    let validator = Validator::new(&schema).expect("embedded schema should be a valid JSON Schema");

    let violations: Vec<SchemaViolation> = validator
        .iter_errors(value)
        .map(|e| SchemaViolation {
            pointer: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

// ============================================================================
// Settings Loading
// ============================================================================

/// Returns the settings file path (~/.gcp-iap-ssh.json).
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(SETTINGS_FILE_NAME))
}

/// Ensures the settings file exists, creating a default one if missing.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or if
/// writing the default settings file fails.
pub fn ensure_config_exists() -> Result<PathBuf, SettingsError> {
    let path = config_path().ok_or(SettingsError::NoHomeDir)?;

    if !path.exists() {
        fs::write(&path, DEFAULT_JSON).map_err(|source| SettingsError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("Created default settings at {}", path.display());
    }

    Ok(path)
}

/// Loads settings content from a string.
///
/// Validates against the schema first, then deserializes.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or fails schema validation.
pub(crate) fn load_from_str(s: &str) -> Result<ConfigContent, SettingsError> {
    let value: Value = serde_json::from_str(s)?;
    validate(&value).map_err(SettingsError::Invalid)?;
    Ok(serde_json::from_value(value)?)
}

/// Loads settings content from a specific path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is unparseable.
pub(crate) fn load_from_path(path: &Path) -> Result<ConfigContent, SettingsError> {
    let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

/// Loads settings content from the default path (~/.gcp-iap-ssh.json).
///
/// Returns `None` if the settings file doesn't exist (caller should use defaults).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or the JSON is unparseable.
pub(crate) fn load() -> Result<Option<ConfigContent>, SettingsError> {
    let path = config_path().ok_or(SettingsError::NoHomeDir)?;

    if !path.exists() {
        return Ok(None);
    }

    load_from_path(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_valid_json() {
        let schema_value: Value = serde_json::from_str(schema()).unwrap();
        assert!(schema_value.is_object());
        assert!(schema_value.get("$schema").is_some());
    }

    #[test]
    fn test_default_json_is_valid() {
        let value: Value = serde_json::from_str(DEFAULT_JSON).unwrap();
        assert_eq!(validate(&value), Ok(()));
    }

    #[test]
    fn test_validate_unknown_field_rejected() {
        let value: Value = serde_json::from_str(r#"{"unknown_field": "value"}"#).unwrap();
        assert!(validate(&value).is_err());
    }

    #[test]
    fn test_validate_empty_zone_rejected() {
        let value: Value = serde_json::from_str(r#"{"defaultZone": ""}"#).unwrap();
        assert!(validate(&value).is_err());
    }

    #[test]
    fn test_load_from_str_empty() {
        let content = load_from_str("{}").unwrap();
        assert!(content.ssh_config_path.is_none());
        assert!(content.remote_ssh_config_file.is_none());
        assert!(content.default_zone.is_none());
    }

    #[test]
    fn test_load_from_str_camel_case_keys() {
        let content = load_from_str(
            r#"{
                "sshConfigPath": "/tmp/ssh_config",
                "remoteSshConfigFile": "/tmp/remote_config",
                "defaultProject": "my-project",
                "defaultZone": "europe-west4-b",
                "gcloudPath": "/opt/google-cloud-sdk/bin/gcloud"
            }"#,
        )
        .unwrap();

        assert_eq!(content.ssh_config_path.as_deref(), Some("/tmp/ssh_config"));
        assert_eq!(
            content.remote_ssh_config_file.as_deref(),
            Some("/tmp/remote_config")
        );
        assert_eq!(content.default_project.as_deref(), Some("my-project"));
        assert_eq!(content.default_zone.as_deref(), Some("europe-west4-b"));
        assert_eq!(
            content.gcloud_path.as_deref(),
            Some("/opt/google-cloud-sdk/bin/gcloud")
        );
    }

    #[test]
    fn test_invalid_path_type() {
        let result = load_from_str(r#"{"sshConfigPath": 123}"#);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_snake_case_keys_rejected() {
        let result = load_from_str(r#"{"ssh_config_path": "/tmp/x"}"#);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_load_from_str_invalid_json() {
        let result = load_from_str("not valid json");
        assert!(matches!(result, Err(SettingsError::Json(_))));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let result = load_from_path(Path::new("/nonexistent/path/settings.json"));
        assert!(matches!(result, Err(SettingsError::Read { .. })));
    }
}
