//! Schema types and structures
//!
//! A schema is kept as the JSON document it was loaded from; the accessors
//! here answer the questions the normalizer and the binding generator ask of
//! it (declared properties, defaults, required names, accepted rule names).

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// Properties of a single rule (`rules/<Category>.<Rule>.json`)
    Rule,
    /// Settings and accepted rule names of a category (`categories/<Category>.json`)
    Category,
    /// Shared cross-schema defaults (`profiles.json` definitions)
    Profile,
}

impl SchemaKind {
    /// Directory of a schema root holding this kind of schema
    pub fn dir_name(&self) -> &'static str {
        match self {
            SchemaKind::Rule => "rules",
            SchemaKind::Category => "categories",
            SchemaKind::Profile => "",
        }
    }
}

/// A single loaded schema
#[derive(Debug, Clone)]
pub struct Schema {
    /// Canonical name (`category/rule_name`, `category_name` or profile name)
    pub name: String,
    /// Kind of schema
    pub kind: SchemaKind,
    /// The schema document
    pub content: Value,
    /// Original source file path (if applicable)
    pub source_path: Option<String>,
    /// Accepted rule-name patterns, compiled once (categories only)
    accepted: Vec<Regex>,
}

impl Schema {
    /// Create a new schema
    pub fn new(name: impl Into<String>, kind: SchemaKind, content: Value) -> Self {
        let name = name.into();
        let accepted = if kind == SchemaKind::Category {
            compile_patterns(&name, &content)
        } else {
            Vec::new()
        };
        Self {
            name,
            kind,
            content,
            source_path: None,
            accepted,
        }
    }

    /// Record where this schema was loaded from
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source_path = Some(source.into());
        self
    }

    /// Root `properties` mapping
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.content.get("properties").and_then(Value::as_object)
    }

    /// Root `allOf` branches
    pub fn all_of(&self) -> &[Value] {
        all_of(&self.content)
    }

    /// Names listed in the root `required` array
    pub fn required(&self) -> Vec<&str> {
        self.content
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Every declared property in declaration order.
    ///
    /// Root properties come first, then the properties of each `allOf`
    /// branch; the first declaration of a name wins.
    pub fn declared_properties(&self) -> Vec<(&str, &Value)> {
        let mut out: Vec<(&str, &Value)> = Vec::new();
        push_new(&mut out, self.properties());
        for branch in self.all_of() {
            push_new(&mut out, branch.get("properties").and_then(Value::as_object));
        }
        out
    }

    /// Declaration of a property, looked up like [`Schema::declared_properties`]
    pub fn property(&self, name: &str) -> Option<&Value> {
        if let Some(prop) = self.properties().and_then(|p| p.get(name)) {
            return Some(prop);
        }
        self.all_of()
            .iter()
            .find_map(|branch| branch.get("properties").and_then(|p| p.get(name)))
    }

    /// Default of a property: its own `default`, else the first `default`
    /// found in its `allOf` branches.
    pub fn property_default(&self, name: &str) -> Option<&Value> {
        self.property(name).and_then(declaration_default)
    }

    /// Whether this category schema accepts a rule short name.
    ///
    /// A category without patterns accepts everything; otherwise one pattern
    /// must match somewhere in the name.
    pub fn accepts(&self, rule_short_name: &str) -> bool {
        self.accepted.is_empty() || self.accepted.iter().any(|re| re.is_match(rule_short_name))
    }

    /// Raw accepted-name patterns, collected recursively
    pub fn accepted_patterns(&self) -> Vec<String> {
        let mut patterns = Vec::new();
        collect_pattern_properties(&self.content, &mut patterns);
        patterns
    }
}

/// `allOf` branches of any schema node
pub fn all_of(node: &Value) -> &[Value] {
    node.get("allOf")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Default of a single property declaration (direct, then `allOf`)
pub fn declaration_default(prop: &Value) -> Option<&Value> {
    if let Some(default) = prop.get("default") {
        return Some(default);
    }
    all_of(prop).iter().find_map(|entry| entry.get("default"))
}

/// Declared `type` of a property declaration (direct, then `allOf`)
pub fn declaration_type(prop: &Value) -> Option<&str> {
    if let Some(ty) = prop.get("type").and_then(Value::as_str) {
        return Some(ty);
    }
    all_of(prop)
        .iter()
        .find_map(|entry| entry.get("type").and_then(Value::as_str))
}

fn push_new<'a>(out: &mut Vec<(&'a str, &'a Value)>, props: Option<&'a Map<String, Value>>) {
    for (name, prop) in props.into_iter().flatten() {
        if !out.iter().any(|(seen, _)| *seen == name.as_str()) {
            out.push((name.as_str(), prop));
        }
    }
}

/// Collect `patternProperties` keys through nested properties and `allOf`
fn collect_pattern_properties(node: &Value, patterns: &mut Vec<String>) {
    let Some(obj) = node.as_object() else {
        return;
    };
    if let Some(pattern_props) = obj.get("patternProperties").and_then(Value::as_object) {
        patterns.extend(pattern_props.keys().cloned());
    }
    if let Some(props) = obj.get("properties").and_then(Value::as_object) {
        for prop in props.values() {
            collect_pattern_properties(prop, patterns);
        }
    }
    for branch in all_of(node) {
        collect_pattern_properties(branch, patterns);
    }
}

fn compile_patterns(name: &str, content: &Value) -> Vec<Regex> {
    let mut patterns = Vec::new();
    collect_pattern_properties(content, &mut patterns);
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(category = %name, pattern = %pattern, error = %e, "ignoring invalid rule-name pattern");
                None
            }
        })
        .collect()
}
