//! Settings loading from JSON text, a JSON file, or the environment.

use std::path::Path;

use vocab_core::model::{Settings, SettingsDraft};

use crate::error::ConfigError;

/// Inline JSON settings.
pub const SETTINGS_JSON_VAR: &str = "VOCAB_SETTINGS_JSON";
/// Path to a JSON settings file; ignored when `VOCAB_SETTINGS_JSON` is set.
pub const SETTINGS_PATH_VAR: &str = "VOCAB_SETTINGS_PATH";

/// Parse and validate settings. Missing fields keep their defaults.
///
/// # Errors
///
/// Returns `ConfigError::Json` for malformed input and `ConfigError::Invalid` if the
/// values are inconsistent.
pub fn load_settings_json(raw: &str) -> Result<Settings, ConfigError> {
    let draft: SettingsDraft = serde_json::from_str(raw)?;
    Ok(draft.validate()?)
}

/// # Errors
///
/// Returns `ConfigError::Io` if the file cannot be read, otherwise as `load_settings_json`.
pub fn load_settings_file(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_settings_json(&raw)
}

/// Settings from `VOCAB_SETTINGS_JSON` or `VOCAB_SETTINGS_PATH`; defaults if neither is set.
///
/// # Errors
///
/// Returns `ConfigError` if the configured source is unreadable or invalid.
pub fn load_settings_env() -> Result<Settings, ConfigError> {
    load_settings_from(|key| std::env::var(key).ok())
}

/// Same as `load_settings_env`, reading variables through `lookup`.
///
/// # Errors
///
/// Returns `ConfigError` if the configured source is unreadable or invalid.
pub fn load_settings_from<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(SETTINGS_JSON_VAR) {
        tracing::debug!(source = SETTINGS_JSON_VAR, "loading settings");
        return load_settings_json(&raw);
    }
    if let Some(path) = lookup(SETTINGS_PATH_VAR) {
        tracing::debug!(source = SETTINGS_PATH_VAR, path = %path, "loading settings");
        return load_settings_file(path);
    }
    Ok(Settings::default())
}
