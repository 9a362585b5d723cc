//! Generated by rulecfg-codegen from rule schema `layout/line_length` - DO NOT EDIT

#[allow(unused_imports)]
use serde_json::{Map, Value};

use super::super::{load_bool, load_i64, load_string, load_strings, object, LoadError};

/// Settings of rule `layout/line_length`
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLineLength {
    pub enabled: bool,
    pub severity: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub max: i64,
    pub allow_uri: bool,
}

impl Default for LayoutLineLength {
    fn default() -> Self {
        Self::init_defaults()
    }
}

impl LayoutLineLength {
    /// Schema defaults for every field
    pub fn init_defaults() -> Self {
        Self {
            enabled: true,
            severity: "warning".to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
            max: 120,
            allow_uri: true,
        }
    }

    /// Load a canonical JSON record; absent fields keep their defaults
    pub fn from_json(value: &Value) -> Result<Self, LoadError> {
        let mut out = Self::init_defaults();
        out.apply_json(value, "layout/line_length")?;
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
        if let Some(v) = obj.get("max") {
            self.max = load_i64(v, &format!("{}.max", path))?;
        }
        if let Some(v) = obj.get("allow_uri") {
            self.allow_uri = load_bool(v, &format!("{}.allow_uri", path))?;
        }
        Ok(())
    }
}
