//! Generated by rulecfg-codegen from the rule schema set - DO NOT EDIT
//!
//! Call `Config::init_defaults()` (or `Config::from_json`) so that a
//! partially specified artifact still yields a fully populated config.

use std::fmt;

use serde_json::{Map, Value};

pub mod categories;
pub mod general;
pub mod rules;

pub use categories::{LayoutCategory, StyleCategory};
pub use general::General;

/// A present field whose JSON value has the wrong type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    /// Location of the field, e.g. `$.categories.layout.enabled`
    pub path: String,
    /// Expected JSON type
    pub expected: &'static str,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}", self.path, self.expected)
    }
}

impl std::error::Error for LoadError {}

fn mismatch(path: &str, expected: &'static str) -> LoadError {
    LoadError {
        path: path.to_string(),
        expected,
    }
}

#[allow(dead_code)]
fn object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, LoadError> {
    value.as_object().ok_or_else(|| mismatch(path, "object"))
}

#[allow(dead_code)]
fn load_bool(value: &Value, path: &str) -> Result<bool, LoadError> {
    value.as_bool().ok_or_else(|| mismatch(path, "boolean"))
}

#[allow(dead_code)]
fn load_i64(value: &Value, path: &str) -> Result<i64, LoadError> {
    value.as_i64().ok_or_else(|| mismatch(path, "integer"))
}

#[allow(dead_code)]
fn load_f64(value: &Value, path: &str) -> Result<f64, LoadError> {
    value.as_f64().ok_or_else(|| mismatch(path, "number"))
}

#[allow(dead_code)]
fn load_string(value: &Value, path: &str) -> Result<String, LoadError> {
    value.as_str().map(str::to_string).ok_or_else(|| mismatch(path, "string"))
}

#[allow(dead_code)]
fn load_strings(value: &Value, path: &str) -> Result<Vec<String>, LoadError> {
    let items = value.as_array().ok_or_else(|| mismatch(path, "array"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| load_string(item, &format!("{}[{}]", path, i)))
        .collect()
}

#[allow(dead_code)]
fn load_values(value: &Value, path: &str) -> Result<Vec<Value>, LoadError> {
    value.as_array().cloned().ok_or_else(|| mismatch(path, "array"))
}

#[allow(dead_code)]
fn load_map(value: &Value, path: &str) -> Result<Map<String, Value>, LoadError> {
    value.as_object().cloned().ok_or_else(|| mismatch(path, "object"))
}

#[allow(dead_code)]
fn load_value(value: &Value, _path: &str) -> Result<Value, LoadError> {
    Ok(value.clone())
}

/// Root of a compiled configuration artifact
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub schema_version: String,
    pub general: General,
    pub layout: LayoutCategory,
    pub style: StyleCategory,
}

impl Default for Config {
    fn default() -> Self {
        Self::init_defaults()
    }
}

impl Config {
    /// Every section and rule at its schema defaults
    pub fn init_defaults() -> Self {
        Self {
            schema_version: "1.0.0".to_string(),
            general: General::init_defaults(),
            layout: LayoutCategory::init_defaults(),
            style: StyleCategory::init_defaults(),
        }
    }

    /// Load a canonical artifact over the defaults
    pub fn from_json(value: &Value) -> Result<Self, LoadError> {
        let mut config = Self::init_defaults();
        config.apply_json(value)?;
        Ok(config)
    }

    /// Overlay the sections present in `value`; unknown categories are ignored
    pub fn apply_json(&mut self, value: &Value) -> Result<(), LoadError> {
        let obj = object(value, "$")?;
        if let Some(v) = obj.get("schema_version") {
            self.schema_version = load_string(v, "$.schema_version")?;
        }
        if let Some(v) = obj.get("general") {
            self.general.apply_json(v, "$.general")?;
        }
        if let Some(categories) = obj.get("categories") {
            let categories = object(categories, "$.categories")?;
            if let Some(v) = categories.get("layout") {
                self.layout.apply_json(v, "$.categories.layout")?;
            }
            if let Some(v) = categories.get("style") {
                self.style.apply_json(v, "$.categories.style")?;
            }
        }
        Ok(())
    }
}
