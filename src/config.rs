//! Configuration management for the compiler tools
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (rulecfg.toml)
//! - Environment variables (RULECFG__*)
//!
//! ## Example config file (rulecfg.toml):
//! ```toml
//! [schemas]
//! dir = "./schemas"
//!
//! [output]
//! dir = ".rulecfg"
//!
//! [defaults]
//! enabled = true
//! severity = "warning"
//! schema_version = "1.0.0"
//!
//! [export]
//! general_section = "AllCops"
//! inherit_key = "inherit_from"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the compiler tools
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Schema source settings
    #[serde(default)]
    pub schemas: SchemasConfig,

    /// Artifact output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Fallback values used when no schema or profile supplies one
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Raw configuration export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Schema source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemasConfig {
    /// Schema root directory; the embedded schema set is used when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving `<digest>.json` artifacts
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

/// Fixed fallbacks for rule and section defaulting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_severity")]
    pub severity: String,

    #[serde(default = "default_schema_version")]
    pub schema_version: String,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Top-level key of the raw document that holds general settings
    #[serde(default = "default_general_section")]
    pub general_section: String,

    /// Key naming parent documents
    #[serde(default = "default_inherit_key")]
    pub inherit_key: String,
}

// Default value functions
fn default_output_dir() -> PathBuf {
    PathBuf::from(".rulecfg")
}

fn default_true() -> bool {
    true
}

fn default_severity() -> String {
    "warning".to_string()
}

fn default_schema_version() -> String {
    "1.0.0".to_string()
}

fn default_general_section() -> String {
    "AllCops".to_string()
}

fn default_inherit_key() -> String {
    "inherit_from".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: default_severity(),
            schema_version: default_schema_version(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            general_section: default_general_section(),
            inherit_key: default_inherit_key(),
        }
    }
}

impl CompilerConfig {
    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "rulecfg.toml",
            ".rulecfg.toml",
            "config/rulecfg.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "rulecfg", "rulecfg") {
            let xdg_config = config_dir.config_dir().join("rulecfg.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // RULECFG__OUTPUT__DIR=... style overrides
        builder = builder.add_source(
            Environment::with_prefix("RULECFG")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
