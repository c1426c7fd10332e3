use std::fs;
use std::path::{Path, PathBuf};

use controller::GestureConfig;
use field::InterpolationConfig;
use serde::{Deserialize, Serialize};

/// Settings file for the `windglobe` binary. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Local time-zone offset used for the default "current position" view.
    pub utc_offset_minutes: i32,
    pub interpolation: InterpolationConfig,
    pub gesture: GestureConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => write!(f, "read {path:?}: {source}"),
            ConfigError::Parse { path, source } => write!(f, "parse {path:?}: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl AppConfig {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{AppConfig, ConfigError};
    use pretty_assertions::assert_eq;

    #[test]
    fn sections_are_optional() {
        let config =
            AppConfig::from_json(Path::new("x.json"), r#"{"interpolation": {"sleep_ms": 0}}"#)
                .unwrap();
        assert_eq!(config.interpolation.sleep_ms, 0);
        assert_eq!(config.interpolation.task_budget_ms, 100);
        assert_eq!(config.gesture, Default::default());
        assert_eq!(config.utc_offset_minutes, 0);
    }

    #[test]
    fn bad_json_names_the_file() {
        let err = AppConfig::from_json(Path::new("bad.json"), "{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn missing_path_uses_defaults() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }
}
