//! Export of a merged configuration tree into compiler input
//!
//! The merged tree uses source spellings (`AllCops`, `Layout/LineLength`,
//! `EnforcedStyle`). Export splits it into the `general` section and raw
//! categories with `rules` maps, canonicalizes property keys, and commits
//! list-typed keys to list shape. Category and rule names stay raw; the
//! normalizer owns their canonicalization and collision handling.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::config::ExportConfig;
use crate::names::{canonicalize_key, canonicalize_keys_deep, canonicalize_map_keys, split_qualified};
use crate::reconcile::TypeReconciler;
use crate::registry::RuleCatalog;

/// Reference trees used for type reconciliation
#[derive(Debug, Clone, Copy)]
pub struct References<'a> {
    /// Tree resolved by an external supplier (may be empty)
    pub resolved: &'a Map<String, Value>,
    /// Registry default tree (may be empty)
    pub defaults: &'a Map<String, Value>,
}

#[derive(Debug, Default)]
struct ExportedCategory {
    properties: Map<String, Value>,
    rules: Map<String, Value>,
}

impl ExportedCategory {
    fn into_value(self) -> Value {
        let mut out = self.properties;
        if out.contains_key("rules") {
            tracing::debug!("category property `rules` shadowed by the rules map");
        }
        out.insert("rules".to_string(), Value::Object(self.rules));
        Value::Object(out)
    }
}

/// Categories in first-seen order
#[derive(Debug, Default)]
struct Categories {
    order: Vec<(String, ExportedCategory)>,
    index: HashMap<String, usize>,
}

impl Categories {
    fn get_or_create(&mut self, name: &str) -> &mut ExportedCategory {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.order.push((name.to_string(), ExportedCategory::default()));
                self.index.insert(name.to_string(), self.order.len() - 1);
                self.order.len() - 1
            }
        };
        &mut self.order[idx].1
    }

    /// Store a rule under its raw short name; the first definition wins
    fn add_rule(&mut self, category: &str, rule: &str, value: &Value) {
        let rules = &mut self.get_or_create(category).rules;
        if rules.contains_key(rule) {
            tracing::debug!(category = %category, rule = %rule, "dropping repeated rule definition");
            return;
        }
        rules.insert(rule.to_string(), format_rule(value));
    }
}

/// Rule value at export: mappings keep their (canonicalized) contents,
/// anything else is an enable flag.
pub fn format_rule(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(canonicalize_map_keys(map.clone())),
        other => json!({ "enabled": *other != Value::Bool(false) }),
    }
}

fn copy_property(value: &Value) -> Value {
    match value {
        Value::Object(_) => canonicalize_keys_deep(value.clone()),
        other => other.clone(),
    }
}

fn insert_property(section: &mut Map<String, Value>, raw_key: &str, value: &Value) {
    let key = canonicalize_key(raw_key);
    if section.contains_key(&key) {
        tracing::debug!(key = %key, "dropping colliding property");
        return;
    }
    section.insert(key, copy_property(value));
}

/// Build the compiler input tree from a merged document.
///
/// The result has `general` and `categories` with every mapping key sorted.
pub fn export(
    merged: &Map<String, Value>,
    references: References<'_>,
    catalog: &dyn RuleCatalog,
    options: &ExportConfig,
) -> Value {
    let raw: Map<String, Value> = merged
        .iter()
        .filter(|(key, _)| **key != options.inherit_key)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut general = Map::new();
    if let Some(section) = raw.get(&options.general_section).and_then(Value::as_object) {
        for (key, value) in section {
            insert_property(&mut general, key, value);
        }
    }

    let mut categories = Categories::default();
    for (key, value) in &raw {
        if *key == options.general_section {
            continue;
        }
        if let Some((category, rule)) = split_qualified(key) {
            categories.add_rule(category, rule, value);
        } else if let Some(section) = value.as_object() {
            categories.get_or_create(key);
            populate_category(&mut categories, key, section, catalog);
        } else {
            tracing::debug!(key = %key, "ignoring top-level scalar");
        }
    }

    let reconciler = TypeReconciler::new(&raw, references.resolved, references.defaults);
    reconciler.reconcile_section(&options.general_section, &mut general, &[]);

    let mut out_categories = Map::new();
    for (name, mut category) in categories.order {
        reconciler.reconcile_section(&name, &mut category.properties, &["rules"]);
        out_categories.insert(name, category.into_value());
    }

    let out = json!({
        "general": Value::Object(general),
        "categories": Value::Object(out_categories),
    });
    crate::canonical::sort_keys(out)
}

fn populate_category(
    categories: &mut Categories,
    category: &str,
    section: &Map<String, Value>,
    catalog: &dyn RuleCatalog,
) {
    for (key, value) in section {
        if let Some((other, rule)) = split_qualified(key) {
            categories.add_rule(other, rule, value);
        } else if value.is_object() || catalog.contains_rule(&format!("{}/{}", category, key)) {
            categories.add_rule(category, key, value);
        } else {
            insert_property(&mut categories.get_or_create(category).properties, key, value);
        }
    }
}
