//! Generated by rulecfg-codegen from rule schema `style/string_literals` - DO NOT EDIT

#[allow(unused_imports)]
use serde_json::{Map, Value};

use super::super::{load_bool, load_string, load_strings, object, LoadError};

/// Settings of rule `style/string_literals`
#[derive(Debug, Clone, PartialEq)]
pub struct StyleStringLiterals {
    pub enabled: bool,
    pub severity: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub enforced_style: String,
    pub allowed_delimiters: Vec<String>,
}

impl Default for StyleStringLiterals {
    fn default() -> Self {
        Self::init_defaults()
    }
}

impl StyleStringLiterals {
    /// Schema defaults for every field
    pub fn init_defaults() -> Self {
        Self {
            enabled: true,
            severity: "warning".to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
            enforced_style: "single_quotes".to_string(),
            allowed_delimiters: Vec::new(),
        }
    }

    /// Load a canonical JSON record; absent fields keep their defaults
    pub fn from_json(value: &Value) -> Result<Self, LoadError> {
        let mut out = Self::init_defaults();
        out.apply_json(value, "style/string_literals")?;
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
        if let Some(v) = obj.get("enforced_style") {
            self.enforced_style = load_string(v, &format!("{}.enforced_style", path))?;
        }
        if let Some(v) = obj.get("allowed_delimiters") {
            self.allowed_delimiters = load_strings(v, &format!("{}.allowed_delimiters", path))?;
        }
        Ok(())
    }
}
