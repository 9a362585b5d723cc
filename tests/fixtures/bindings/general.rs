//! Generated by rulecfg-codegen from the general profile - DO NOT EDIT

#[allow(unused_imports)]
use serde_json::{Map, Value};

use super::{load_bool, load_string, load_strings, object, LoadError};

/// Settings shared by every category
#[derive(Debug, Clone, PartialEq)]
pub struct General {
    pub enabled: bool,
    pub severity: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for General {
    fn default() -> Self {
        Self::init_defaults()
    }
}

impl General {
    /// Profile defaults for every field
    pub fn init_defaults() -> Self {
        Self {
            enabled: true,
            severity: "warning".to_string(),
            include: vec!["**/*.rb".to_string()],
            exclude: Vec::new(),
        }
    }

    /// Load a canonical JSON record; absent fields keep their defaults
    pub fn from_json(value: &Value) -> Result<Self, LoadError> {
        let mut out = Self::init_defaults();
        out.apply_json(value, "general")?;
        Ok(out)
    }

    /// Overlay the fields present in `value`
    pub fn apply_json(&mut self, value: &Value, path: &str) -> Result<(), LoadError> {
        let obj = object(value, path)?;
        if let Some(v) = obj.get("enabled") {
            self.enabled = load_bool(v, &format!("{}.enabled", path))?;
        }
        if let Some(v) = obj.get("severity") {
            self.severity = load_string(v, &format!("{}.severity", path))?;
        }
        if let Some(v) = obj.get("include") {
            self.include = load_strings(v, &format!("{}.include", path))?;
        }
        if let Some(v) = obj.get("exclude") {
            self.exclude = load_strings(v, &format!("{}.exclude", path))?;
        }
        Ok(())
    }
}
