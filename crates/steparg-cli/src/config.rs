//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables (via the CLI flags that read them)
//!
//! Besides output and logging settings, a configuration file carries the
//! catalog the CLI converts against: enum types and declarative step
//! argument transformations.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Locale used when `--locale` is not given (empty for invariant)
    pub default_locale: Option<String>,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Enum types by name, members in declaration order
    pub enums: BTreeMap<String, Vec<String>>,

    /// Declarative step argument transformations, in registration order
    pub transformations: Vec<TransformationConfig>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: bool,

    /// Print ambiguity warnings alongside results
    pub show_warnings: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,
}

/// A transformation defined in the configuration file.
///
/// The transformation produces an object of type `returns` whose payload
/// maps each parameter name to its converted argument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransformationConfig {
    pub name: String,

    /// Applicability pattern; its capture groups feed the parameters in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    pub returns: String,

    #[serde(default)]
    pub parameters: Vec<ParameterConfig>,
}

/// A transformation parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterConfig {
    pub name: String,

    /// Type name, resolved against built-in types and the enum catalog
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_warnings: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config = if is_yaml(path) {
            serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| Error::InvalidFormat {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        };

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Default configuration file paths to check, in priority order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".steparg.yaml"),
            PathBuf::from(".steparg.yml"),
            PathBuf::from(".steparg.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let steparg_dir = config_dir.join("steparg");
            paths.push(steparg_dir.join("config.yaml"));
            paths.push(steparg_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".steparg.yaml"));
            paths.push(home_dir.join(".steparg.json"));
        }

        paths
    }

    /// Path `config init` writes to when no explicit path is given
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("steparg").join("config.yaml"))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// A starter configuration showing every section
    pub fn example() -> Self {
        let mut enums = BTreeMap::new();
        enums.insert(
            "Direction".to_string(),
            ["North", "East", "South", "West"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );

        Self {
            default_locale: Some("en-US".to_string()),
            enums,
            transformations: vec![TransformationConfig {
                name: "heading".to_string(),
                pattern: Some(r"(\w+) at (\d+) knots".to_string()),
                returns: "Heading".to_string(),
                parameters: vec![
                    ParameterConfig {
                        name: "direction".to_string(),
                        type_name: "Direction".to_string(),
                    },
                    ParameterConfig {
                        name: "speed".to_string(),
                        type_name: "u32".to_string(),
                    },
                ],
            }],
            ..Self::default()
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const YAML_CONFIG: &str = r#"
default_locale: de-DE
enums:
  Color: [Red, Green, Blue]
transformations:
  - name: money
    pattern: '(\d+) (EUR|USD)'
    returns: Money
    parameters:
      - { name: amount, type: u64 }
      - { name: currency, type: string }
"#;

    #[test]
    fn test_load_yaml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("steparg.yaml");
        fs::write(&path, YAML_CONFIG).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.default_locale.as_deref(), Some("de-DE"));
        assert_eq!(config.enums["Color"], vec!["Red", "Green", "Blue"]);
        assert_eq!(config.transformations.len(), 1);
        assert_eq!(config.transformations[0].parameters[0].type_name, "u64");
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_save_and_reload_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config::example();
        config.save(&path).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file(Path::new("/nonexistent/steparg.yaml"));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(Error::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_default_paths_prefer_project_files() {
        let paths = Config::default_config_paths();
        assert_eq!(paths[0], PathBuf::from(".steparg.yaml"));
    }
}
