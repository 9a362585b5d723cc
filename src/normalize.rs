//! Normalization of compiler input into the canonical tree
//!
//! Input is the exported tree (`general`, raw-named `categories` with
//! `rules` maps). Output has canonical category and rule names, every rule
//! defaulted from its schema and validated, and unknown entities removed.
//!
//! Silent drops (logged at debug only, never errors):
//! - a category without a category schema
//! - a rule without a rule schema, or rejected by its category's patterns
//! - the later of two names that canonicalize to the same name
//!
//! A rule that fails validation aborts the whole run.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{json, Map, Value};

use crate::canonical::{write_artifact, Artifact};
use crate::config::DefaultsConfig;
use crate::error::{CompileError, Result};
use crate::names::{canonicalize_key, canonicalize_map_keys, split_qualified};
use crate::registry::SchemaRegistry;
use crate::schema::{declaration_default, Schema};
use crate::validate::validate_record;

/// Section keys defaulted on categories and the general section
pub const SECTION_KEYS: [&str; 4] = ["enabled", "severity", "include", "exclude"];

#[derive(Debug, Default)]
struct Section {
    settings: Map<String, Value>,
    rules: Map<String, Value>,
}

impl Section {
    fn into_value(self) -> Value {
        let mut out = self.settings;
        out.insert("rules".to_string(), Value::Object(self.rules));
        Value::Object(out)
    }
}

/// Normalizes compiler input against a schema registry
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    registry: &'a SchemaRegistry,
    defaults: &'a DefaultsConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(registry: &'a SchemaRegistry, defaults: &'a DefaultsConfig) -> Self {
        Self { registry, defaults }
    }

    /// Produce the normalized (not yet key-sorted) tree
    pub fn normalize(&self, input: Value) -> Result<Value> {
        let mut root = match input {
            Value::Object(map) => map,
            other => {
                return Err(CompileError::InvalidDocument {
                    path: "<input>".to_string(),
                    reason: format!("top level must be a mapping, found {}", crate::document::json_type_name(&other)),
                })
            }
        };

        default_if_absent(&mut root, "metadata", json!({}));
        default_if_absent(&mut root, "schema_version", json!(self.defaults.schema_version));
        default_if_absent(&mut root, "general", json!({}));

        if let Some(Value::Object(general)) = root.get_mut("general") {
            apply_section_defaults(general, None, self.registry.general_profile());
        }

        let raw_categories = match root.get_mut("categories").map(Value::take) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let categories = self.normalize_categories(raw_categories)?;
        root.insert("categories".to_string(), categories);

        Ok(Value::Object(root))
    }

    fn normalize_categories(&self, raw: Map<String, Value>) -> Result<Value> {
        let mut sections: Vec<(String, Section)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut pending: Vec<(String, Map<String, Value>)> = Vec::new();

        for (raw_name, value) in raw {
            let name = canonicalize_key(&raw_name);
            if index.contains_key(&name) {
                tracing::debug!(category = %raw_name, "dropping colliding category");
                continue;
            }
            let Some(schema) = self.registry.category(&name) else {
                tracing::debug!(category = %raw_name, "dropping unknown category");
                continue;
            };

            let mut settings = match value {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            let rules = match settings.get_mut("rules").map(Value::take) {
                Some(Value::Object(rules)) => rules,
                _ => Map::new(),
            };
            apply_section_defaults(&mut settings, Some(schema), self.registry.category_profile());

            index.insert(name.clone(), sections.len());
            sections.push((name.clone(), Section { settings, rules: Map::new() }));
            pending.push((name, rules));
        }

        for (category, rules) in pending {
            for (raw_rule, value) in rules {
                let (target, short) = match split_qualified(&raw_rule) {
                    Some((other, rule)) => (canonicalize_key(other), canonicalize_key(rule)),
                    None => (category.clone(), canonicalize_key(&raw_rule)),
                };

                let idx = match index.get(&target) {
                    Some(&idx) => idx,
                    None => match self.registry.category(&target) {
                        // Re-homed into a category that had no entry of its own
                        Some(schema) => {
                            let mut settings = Map::new();
                            apply_section_defaults(&mut settings, Some(schema), self.registry.category_profile());
                            index.insert(target.clone(), sections.len());
                            sections.push((target.clone(), Section { settings, rules: Map::new() }));
                            sections.len() - 1
                        }
                        None => {
                            tracing::debug!(rule = %raw_rule, "dropping rule of unknown category");
                            continue;
                        }
                    },
                };

                if sections[idx].1.rules.contains_key(&short) {
                    tracing::debug!(rule = %raw_rule, "dropping colliding rule");
                    continue;
                }
                let qualified = format!("{}/{}", target, short);
                let Some(rule_schema) = self.registry.rule(&qualified) else {
                    tracing::debug!(rule = %qualified, "dropping unknown rule");
                    continue;
                };
                if let Some(category_schema) = self.registry.category(&target) {
                    if !category_schema.accepts(&short) {
                        tracing::debug!(rule = %qualified, "dropping rule rejected by category patterns");
                        continue;
                    }
                }

                let record = self.normalize_rule(&qualified, value, rule_schema)?;
                sections[idx].1.rules.insert(short, Value::Object(record));
            }
        }

        let mut out = Map::new();
        for (name, section) in sections {
            out.insert(name, section.into_value());
        }
        Ok(Value::Object(out))
    }

    /// Shape, default and validate one rule value
    pub fn normalize_rule(&self, qualified: &str, value: Value, schema: &Schema) -> Result<Map<String, Value>> {
        let mut record = match value {
            Value::Bool(enabled) => {
                let mut record = Map::new();
                record.insert("enabled".to_string(), Value::Bool(enabled));
                record
            }
            Value::Object(map) => canonicalize_map_keys(map),
            other => {
                let mut record = Map::new();
                record.insert("enabled".to_string(), self.enabled_default(schema));
                record.insert("raw".to_string(), other);
                record
            }
        };

        self.inject_rule_defaults(&mut record, schema);
        validate_record(qualified, &record, schema)?;
        Ok(record)
    }

    /// Fill absent fields: schema property default, then its `allOf`
    /// defaults, then the shared rule profile.
    pub fn inject_rule_defaults(&self, record: &mut Map<String, Value>, schema: &Schema) {
        if !record.contains_key("enabled") {
            record.insert("enabled".to_string(), self.enabled_default(schema));
        }

        let profile = self.registry.rule_profile();
        for (name, declaration) in schema.declared_properties() {
            let key = canonicalize_key(name);
            if key.is_empty() || record.contains_key(&key) {
                continue;
            }
            let default = declaration_default(declaration)
                .or_else(|| profile.and_then(|p| p.property_default(name)));
            if let Some(default) = default {
                record.insert(key, default.clone());
            }
        }

        if !record.contains_key("severity") {
            let severity = schema
                .property_default("severity")
                .or_else(|| profile.and_then(|p| p.property_default("severity")))
                .cloned()
                .unwrap_or_else(|| Value::String(self.defaults.severity.clone()));
            record.insert("severity".to_string(), severity);
        }
    }

    fn enabled_default(&self, schema: &Schema) -> Value {
        schema
            .property_default("enabled")
            .cloned()
            .unwrap_or(Value::Bool(self.defaults.enabled))
    }
}

fn default_if_absent(map: &mut Map<String, Value>, key: &str, value: Value) {
    if matches!(map.get(key), None | Some(Value::Null)) {
        map.insert(key.to_string(), value);
    }
}

/// Default the section keys from `schema`, then `profile`; absent defaults are fine
fn apply_section_defaults(section: &mut Map<String, Value>, schema: Option<&Schema>, profile: Option<&Schema>) {
    for key in SECTION_KEYS {
        if section.contains_key(key) {
            continue;
        }
        let default = schema
            .and_then(|s| s.property_default(key))
            .or_else(|| profile.and_then(|p| p.property_default(key)));
        if let Some(default) = default {
            section.insert(key.to_string(), default.clone());
        }
    }
}

/// Normalize `input` and store the canonical artifact in `out_dir`.
///
/// Nothing is written when normalization fails.
pub fn compile(
    input: Value,
    registry: &SchemaRegistry,
    defaults: &DefaultsConfig,
    out_dir: &Path,
) -> Result<Artifact> {
    let normalized = Normalizer::new(registry, defaults).normalize(input)?;
    write_artifact(&normalized, out_dir)
}
