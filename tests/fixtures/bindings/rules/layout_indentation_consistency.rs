//! Generated by rulecfg-codegen from rule schema `layout/indentation_consistency` - DO NOT EDIT

#[allow(unused_imports)]
use serde_json::{Map, Value};

use super::super::{load_bool, load_i64, load_string, load_strings, object, LoadError};

/// Settings of rule `layout/indentation_consistency`
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutIndentationConsistency {
    pub enabled: bool,
    pub severity: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub enforced_style: String,
    pub indent_width: i64,
}

impl Default for LayoutIndentationConsistency {
    fn default() -> Self {
        Self::init_defaults()
    }
}

impl LayoutIndentationConsistency {
    /// Schema defaults for every field
    pub fn init_defaults() -> Self {
        Self {
            enabled: true,
            severity: "warning".to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
            enforced_style: "space".to_string(),
            indent_width: 2,
        }
    }

    /// Load a canonical JSON record; absent fields keep their defaults
    pub fn from_json(value: &Value) -> Result<Self, LoadError> {
        let mut out = Self::init_defaults();
        out.apply_json(value, "layout/indentation_consistency")?;
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
        if let Some(v) = obj.get("indent_width") {
            self.indent_width = load_i64(v, &format!("{}.indent_width", path))?;
        }
        Ok(())
    }
}
