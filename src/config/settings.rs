//! Tool settings stored as JSON in the user config directory

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::fmt;
use tracing::Level;

use crate::constants::{config, output};

/// Settings for the transfer tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Indent output files instead of writing them minified like the base station does
    #[serde(default)]
    pub pretty_output: bool,

    /// Directory for generated files; defaults to the source file's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_file_prefix() -> String {
    output::FILE_PREFIX.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            pretty_output: false,
            output_dir: None,
            file_prefix: default_file_prefix(),
        }
    }
}

/// A settings value that could not be used and the default that replaced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub field: &'static str,
    pub value: String,
    pub using: String,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} {:?}, using {:?}", self.field, self.value, self.using)
    }
}

/// Settings as read from disk, with where they came from and what was corrected
///
/// Loading happens before the log subscriber exists, so the caller logs
/// `path` and `corrections` once logging is up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// `None` when no settings file exists
    pub path: Option<PathBuf>,
    pub corrections: Vec<Correction>,
}

/// Map a level name to a tracing level, `None` for unknown names
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

impl Settings {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::FILENAME);
        path
    }

    /// Load from the default location; a missing file means defaults
    pub fn load() -> Result<LoadedSettings> {
        Self::load_from(&Self::path())
    }

    /// Load from `path`. Nothing is written when the file does not exist.
    pub fn load_from(path: &Path) -> Result<LoadedSettings> {
        if !path.exists() {
            return Ok(LoadedSettings::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;

        let mut settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings JSON from {:?}", path))?;

        let corrections = settings.validate_and_clamp();
        Ok(LoadedSettings {
            settings,
            path: Some(path.to_path_buf()),
            corrections,
        })
    }

    /// Replace values that cannot be used with their defaults, returning what changed
    pub fn validate_and_clamp(&mut self) -> Vec<Correction> {
        let mut corrections = Vec::new();

        if parse_level(&self.log_level).is_none() {
            let using = default_log_level();
            corrections.push(Correction {
                field: "log_level",
                value: std::mem::replace(&mut self.log_level, using.clone()),
                using,
            });
        }

        if self.file_prefix.trim().is_empty() {
            let using = default_file_prefix();
            corrections.push(Correction {
                field: "file_prefix",
                value: std::mem::replace(&mut self.file_prefix, using.clone()),
                using,
            });
        }

        corrections
    }

    /// Effective tracing level: environment override, then settings
    pub fn trace_level(&self, env_override: Option<&str>) -> Level {
        env_override
            .and_then(parse_level)
            .or_else(|| parse_level(&self.log_level))
            .unwrap_or(Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let loaded = Settings::load_from(&path).unwrap();

        assert_eq!(loaded.settings, Settings::default());
        assert_eq!(loaded.path, None);
        assert!(loaded.corrections.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "pretty_output": true, "output_dir": "/exports" }"#).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        let settings = loaded.settings;

        assert_eq!(loaded.path, Some(path));
        assert!(loaded.corrections.is_empty());
        assert!(settings.pretty_output);
        assert_eq!(settings.output_dir, Some(PathBuf::from("/exports")));
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.file_prefix, "Spectera_Setup");
    }

    #[test]
    fn test_invalid_values_are_replaced() {
        let mut settings = Settings {
            log_level: "chatty".to_string(),
            file_prefix: "  ".to_string(),
            ..Settings::default()
        };

        let corrections = settings.validate_and_clamp();

        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.file_prefix, "Spectera_Setup");
        assert_eq!(corrections.len(), 2);
        assert!(settings.validate_and_clamp().is_empty());
    }

    #[test]
    fn test_load_reports_corrections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "log_level": "chatty", "file_prefix": "" }"#).unwrap();

        let loaded = Settings::load_from(&path).unwrap();

        assert_eq!(
            loaded.corrections,
            vec![
                Correction {
                    field: "log_level",
                    value: "chatty".to_string(),
                    using: "info".to_string(),
                },
                Correction {
                    field: "file_prefix",
                    value: String::new(),
                    using: "Spectera_Setup".to_string(),
                },
            ]
        );
        assert_eq!(loaded.corrections[0].to_string(), r#"Invalid log_level "chatty", using "info""#);
        assert_eq!(loaded.settings.trace_level(None), Level::INFO);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "pretty_output = true").unwrap();

        let err = Settings::load_from(&path).unwrap_err();

        assert!(format!("{err:#}").contains("Failed to parse settings JSON"));
    }

    #[test]
    fn test_trace_level_env_override() {
        let settings = Settings {
            log_level: "warn".to_string(),
            ..Settings::default()
        };

        assert_eq!(settings.trace_level(None), Level::WARN);
        assert_eq!(settings.trace_level(Some("DEBUG")), Level::DEBUG);
        // Unknown env values fall through to the settings file
        assert_eq!(settings.trace_level(Some("loud")), Level::WARN);
    }
}
