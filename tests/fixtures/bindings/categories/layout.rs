//! Generated by rulecfg-codegen for category `layout` - DO NOT EDIT

#[allow(unused_imports)]
use serde_json::{Map, Value};

use super::super::{load_bool, load_string, load_strings, object, LoadError};

use super::super::rules::{LayoutIndentationConsistency, LayoutLineLength};

/// Category `layout` and its rules
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCategory {
    pub enabled: bool,
    pub severity: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub indentation_consistency: LayoutIndentationConsistency,
    pub line_length: LayoutLineLength,
}

impl Default for LayoutCategory {
    fn default() -> Self {
        Self::init_defaults()
    }
}

impl LayoutCategory {
    /// Category defaults with every rule at its own defaults
    pub fn init_defaults() -> Self {
        Self {
            enabled: true,
            severity: "convention".to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
            indentation_consistency: LayoutIndentationConsistency::init_defaults(),
            line_length: LayoutLineLength::init_defaults(),
        }
    }

    /// Load a canonical JSON record; absent fields keep their defaults
    pub fn from_json(value: &Value) -> Result<Self, LoadError> {
        let mut out = Self::init_defaults();
        out.apply_json(value, "layout")?;
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
        if let Some(rules) = obj.get("rules") {
            let rules_path = format!("{}.rules", path);
            let rules = object(rules, &rules_path)?;
            if let Some(v) = rules.get("indentation_consistency") {
                self.indentation_consistency.apply_json(v, &format!("{}.indentation_consistency", rules_path))?;
            }
            if let Some(v) = rules.get("line_length") {
                self.line_length.apply_json(v, &format!("{}.line_length", rules_path))?;
            }
        }
        Ok(())
    }
}
