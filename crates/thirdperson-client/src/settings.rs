//! Loading the controller tuning file.

use std::fmt;
use std::path::{Path, PathBuf};

use thirdperson_core::{ConfigError, ControllerConfig};

/// Errors that can occur while loading a tuning file.
#[derive(Debug)]
pub enum LoadConfigError {
    /// The file could not be read.
    Io {
        /// The file that failed to load.
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid tuning JSON.
    Parse(serde_json::Error),
    /// The tuning values break the controller's configuration contract.
    Invalid(ConfigError),
}

impl fmt::Display for LoadConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            LoadConfigError::Parse(e) => write!(f, "failed to parse tuning file: {e}"),
            LoadConfigError::Invalid(e) => write!(f, "invalid tuning: {e}"),
        }
    }
}

impl std::error::Error for LoadConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadConfigError::Io { source, .. } => Some(source),
            LoadConfigError::Parse(e) => Some(e),
            LoadConfigError::Invalid(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for LoadConfigError {
    fn from(e: serde_json::Error) -> Self {
        LoadConfigError::Parse(e)
    }
}

impl From<ConfigError> for LoadConfigError {
    fn from(e: ConfigError) -> Self {
        LoadConfigError::Invalid(e)
    }
}

/// Parse and validate tuning JSON. Missing fields keep their defaults.
///
/// Unknown fields are ignored with a warning.
pub fn from_json(text: &str) -> Result<ControllerConfig, LoadConfigError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if let (Some(fields), Ok(serde_json::Value::Object(known))) =
        (value.as_object(), serde_json::to_value(ControllerConfig::default()))
    {
        for key in fields.keys().filter(|key| !known.contains_key(*key)) {
            tracing::warn!("Ignoring unknown tuning field `{key}`");
        }
    }

    let config: ControllerConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}

/// Load the tuning file at `path`, or the defaults when there is none.
pub fn load(path: Option<&Path>) -> Result<ControllerConfig, LoadConfigError> {
    let Some(path) = path else {
        return Ok(ControllerConfig::default());
    };

    let text = std::fs::read_to_string(path).map_err(|source| LoadConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = from_json(&text)?;
    tracing::info!("Loaded controller tuning from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_json(r#"{ "walk_speed": 3.5, "double_jump_enabled": false }"#).unwrap();
        assert!((config.walk_speed - 3.5).abs() < f32::EPSILON);
        assert!(!config.double_jump_enabled);
        let defaults = ControllerConfig::default();
        assert!((config.sprint_speed - defaults.sprint_speed).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let error = from_json(r#"{ "gravity": 9.81 }"#).unwrap_err();
        assert!(matches!(
            error,
            LoadConfigError::Invalid(ConfigError::NonNegativeGravity { .. })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let error = from_json("{ walk_speed: ").unwrap_err();
        assert!(matches!(error, LoadConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config = from_json(r#"{ "walk_speed": 3.0, "moon_gravity": true }"#).unwrap();
        assert!((config.walk_speed - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_file() {
        let error = load(Some(Path::new("does/not/exist.json"))).unwrap_err();
        assert!(matches!(error, LoadConfigError::Io { .. }));
        assert!(error.to_string().contains("exist.json"));
    }

    #[test]
    fn test_no_file_uses_defaults() {
        assert_eq!(load(None).unwrap(), ControllerConfig::default());
    }
}
