//! Rust Code Emitter
//!
//! Turns a `BindingSet` into a module tree:
//!
//! ```text
//! mod.rs                 Config, LoadError, shared loaders
//! general.rs             General
//! rules/mod.rs           one module per rule
//! rules/<cat>_<rule>.rs  rule record
//! categories/mod.rs      one module per category
//! categories/<cat>.rs    category record bundling its rules
//! ```
//!
//! Key constraints:
//! - This module ONLY receives bindings - no raw JSON schema access
//! - Output depends only on binding order, which is already deterministic

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde_json::Value;

use super::{BindingSet, CategoryBinding, FieldBinding, FieldType, GeneratedOutput, RuleBinding};

const GENERATED_BY: &str = "Generated by rulecfg-codegen";

// =============================================================================
// Public API
// =============================================================================

/// Emit every file of the binding tree
pub fn emit(bindings: &BindingSet) -> GeneratedOutput {
    let mut files = BTreeMap::new();
    files.insert(PathBuf::from("mod.rs"), emit_root(bindings));
    files.insert(PathBuf::from("general.rs"), emit_general(&bindings.general));
    files.insert(PathBuf::from("rules/mod.rs"), emit_rules_mod(bindings));
    files.insert(PathBuf::from("categories/mod.rs"), emit_categories_mod(bindings));

    for category in &bindings.categories {
        for rule in &category.rules {
            files.insert(
                PathBuf::from(format!("rules/{}.rs", rule.module_name)),
                emit_rule(rule),
            );
        }
        files.insert(
            PathBuf::from(format!("categories/{}.rs", category.module_name)),
            emit_category(category),
        );
    }

    GeneratedOutput {
        files,
        // Config + General + one per category and rule
        type_count: 2 + bindings.categories.len() + bindings.rule_count(),
        diagnostics: bindings.diagnostics.clone(),
    }
}

// =============================================================================
// Root Module
// =============================================================================

const LOADERS: &str = r#"/// A present field whose JSON value has the wrong type
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
"#;

fn emit_root(bindings: &BindingSet) -> String {
    let mut output = String::new();

    output.push_str(&format!("//! {} from the rule schema set - DO NOT EDIT\n", GENERATED_BY));
    output.push_str("//!\n");
    output.push_str("//! Call `Config::init_defaults()` (or `Config::from_json`) so that a\n");
    output.push_str("//! partially specified artifact still yields a fully populated config.\n\n");

    output.push_str("use std::fmt;\n\n");
    output.push_str("use serde_json::{Map, Value};\n\n");

    output.push_str("pub mod categories;\n");
    output.push_str("pub mod general;\n");
    output.push_str("pub mod rules;\n\n");

    if !bindings.categories.is_empty() {
        let names: Vec<&str> = bindings.categories.iter().map(|c| c.type_name.as_str()).collect();
        output.push_str(&format!("pub use categories::{{{}}};\n", names.join(", ")));
    }
    output.push_str("pub use general::General;\n\n");

    output.push_str(LOADERS);
    output.push('\n');

    // Root record
    output.push_str("/// Root of a compiled configuration artifact\n");
    output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
    output.push_str("pub struct Config {\n");
    output.push_str("    pub schema_version: String,\n");
    output.push_str("    pub general: General,\n");
    for category in &bindings.categories {
        output.push_str(&format!("    pub {}: {},\n", category.field_ident, category.type_name));
    }
    output.push_str("}\n\n");

    emit_default_impl(&mut output, "Config");

    output.push_str("impl Config {\n");
    output.push_str("    /// Every section and rule at its schema defaults\n");
    output.push_str("    pub fn init_defaults() -> Self {\n");
    output.push_str("        Self {\n");
    output.push_str(&format!(
        "            schema_version: {:?}.to_string(),\n",
        bindings.schema_version
    ));
    output.push_str("            general: General::init_defaults(),\n");
    for category in &bindings.categories {
        output.push_str(&format!(
            "            {}: {}::init_defaults(),\n",
            category.field_ident, category.type_name
        ));
    }
    output.push_str("        }\n");
    output.push_str("    }\n\n");

    output.push_str("    /// Load a canonical artifact over the defaults\n");
    output.push_str("    pub fn from_json(value: &Value) -> Result<Self, LoadError> {\n");
    output.push_str("        let mut config = Self::init_defaults();\n");
    output.push_str("        config.apply_json(value)?;\n");
    output.push_str("        Ok(config)\n");
    output.push_str("    }\n\n");

    output.push_str("    /// Overlay the sections present in `value`; unknown categories are ignored\n");
    output.push_str("    pub fn apply_json(&mut self, value: &Value) -> Result<(), LoadError> {\n");
    output.push_str("        let obj = object(value, \"$\")?;\n");
    output.push_str("        if let Some(v) = obj.get(\"schema_version\") {\n");
    output.push_str("            self.schema_version = load_string(v, \"$.schema_version\")?;\n");
    output.push_str("        }\n");
    output.push_str("        if let Some(v) = obj.get(\"general\") {\n");
    output.push_str("            self.general.apply_json(v, \"$.general\")?;\n");
    output.push_str("        }\n");
    if !bindings.categories.is_empty() {
        output.push_str("        if let Some(categories) = obj.get(\"categories\") {\n");
        output.push_str("            let categories = object(categories, \"$.categories\")?;\n");
        for category in &bindings.categories {
            output.push_str(&format!(
                "            if let Some(v) = categories.get({:?}) {{\n",
                category.name
            ));
            output.push_str(&format!(
                "                self.{}.apply_json(v, {:?})?;\n",
                category.field_ident,
                format!("$.categories.{}", category.name)
            ));
            output.push_str("            }\n");
        }
        output.push_str("        }\n");
    }
    output.push_str("        Ok(())\n");
    output.push_str("    }\n");
    output.push_str("}\n");

    output
}

// =============================================================================
// Section Records
// =============================================================================

fn emit_general(fields: &[FieldBinding]) -> String {
    let mut output = String::new();
    output.push_str(&format!("//! {} from the general profile - DO NOT EDIT\n\n", GENERATED_BY));
    emit_imports(&mut output, "super", fields);

    output.push_str("/// Settings shared by every category\n");
    emit_struct(&mut output, "General", fields, &[]);
    emit_default_impl(&mut output, "General");

    output.push_str("impl General {\n");
    emit_init_defaults(&mut output, "Profile defaults for every field", fields, &[]);
    emit_from_json(&mut output, "general");
    emit_apply_json_open(&mut output);
    emit_field_loads(&mut output, fields);
    output.push_str("        Ok(())\n");
    output.push_str("    }\n");
    output.push_str("}\n");
    output
}

fn emit_rule(rule: &RuleBinding) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "//! {} from rule schema `{}` - DO NOT EDIT\n\n",
        GENERATED_BY, rule.qualified
    ));
    emit_imports(&mut output, "super::super", &rule.fields);

    output.push_str(&format!("/// Settings of rule `{}`\n", rule.qualified));
    emit_struct(&mut output, &rule.type_name, &rule.fields, &[]);
    emit_default_impl(&mut output, &rule.type_name);

    output.push_str(&format!("impl {} {{\n", rule.type_name));
    emit_init_defaults(&mut output, "Schema defaults for every field", &rule.fields, &[]);
    emit_from_json(&mut output, &rule.qualified);
    emit_apply_json_open(&mut output);
    emit_field_loads(&mut output, &rule.fields);
    output.push_str("        Ok(())\n");
    output.push_str("    }\n");
    output.push_str("}\n");
    output
}

fn emit_category(category: &CategoryBinding) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "//! {} for category `{}` - DO NOT EDIT\n\n",
        GENERATED_BY, category.name
    ));
    emit_imports(&mut output, "super::super", &category.settings);
    if !category.rules.is_empty() {
        let types: Vec<&str> = category.rules.iter().map(|r| r.type_name.as_str()).collect();
        output.push_str(&format!("use super::super::rules::{{{}}};\n\n", types.join(", ")));
    }

    let rule_fields: Vec<(&str, &str)> = category
        .rules
        .iter()
        .map(|r| (r.field_ident.as_str(), r.type_name.as_str()))
        .collect();

    output.push_str(&format!("/// Category `{}` and its rules\n", category.name));
    emit_struct(&mut output, &category.type_name, &category.settings, &rule_fields);
    emit_default_impl(&mut output, &category.type_name);

    output.push_str(&format!("impl {} {{\n", category.type_name));
    emit_init_defaults(
        &mut output,
        "Category defaults with every rule at its own defaults",
        &category.settings,
        &rule_fields,
    );
    emit_from_json(&mut output, &category.name);
    emit_apply_json_open(&mut output);
    emit_field_loads(&mut output, &category.settings);
    if !category.rules.is_empty() {
        output.push_str("        if let Some(rules) = obj.get(\"rules\") {\n");
        output.push_str("            let rules_path = format!(\"{}.rules\", path);\n");
        output.push_str("            let rules = object(rules, &rules_path)?;\n");
        for rule in &category.rules {
            output.push_str(&format!("            if let Some(v) = rules.get({:?}) {{\n", rule.short_name));
            output.push_str(&format!(
                "                self.{}.apply_json(v, &format!(\"{{}}.{}\", rules_path))?;\n",
                rule.field_ident, rule.short_name
            ));
            output.push_str("            }\n");
        }
        output.push_str("        }\n");
    }
    output.push_str("        Ok(())\n");
    output.push_str("    }\n");
    output.push_str("}\n");
    output
}

fn emit_rules_mod(bindings: &BindingSet) -> String {
    let rules: Vec<&RuleBinding> = bindings.categories.iter().flat_map(|c| c.rules.iter()).collect();
    let mut output = String::new();
    output.push_str(&format!("//! {} - one module per rule schema - DO NOT EDIT\n", GENERATED_BY));
    if !rules.is_empty() {
        output.push('\n');
    }
    for rule in &rules {
        output.push_str(&format!("pub mod {};\n", rule.module_name));
    }
    if !rules.is_empty() {
        output.push('\n');
    }
    for rule in &rules {
        output.push_str(&format!("pub use {}::{};\n", rule.module_name, rule.type_name));
    }
    output
}

fn emit_categories_mod(bindings: &BindingSet) -> String {
    let mut output = String::new();
    output.push_str(&format!("//! {} - one module per category - DO NOT EDIT\n", GENERATED_BY));
    if !bindings.categories.is_empty() {
        output.push('\n');
    }
    for category in &bindings.categories {
        output.push_str(&format!("pub mod {};\n", category.module_name));
    }
    if !bindings.categories.is_empty() {
        output.push('\n');
    }
    for category in &bindings.categories {
        output.push_str(&format!("pub use {}::{};\n", category.module_name, category.type_name));
    }
    output
}

// =============================================================================
// Shared Pieces
// =============================================================================

fn loader_for(ty: FieldType) -> &'static str {
    match ty {
        FieldType::Bool => "load_bool",
        FieldType::Integer => "load_i64",
        FieldType::Number => "load_f64",
        FieldType::Text => "load_string",
        FieldType::TextList => "load_strings",
        FieldType::ValueList => "load_values",
        FieldType::Map => "load_map",
        FieldType::Value => "load_value",
    }
}

/// `root` is the path from the emitting module to the generated root
fn emit_imports(output: &mut String, root: &str, fields: &[FieldBinding]) {
    let mut helpers: BTreeSet<&str> = BTreeSet::new();
    helpers.insert("object");
    for field in fields {
        helpers.insert(loader_for(field.ty));
    }
    let mut names: Vec<&str> = helpers.into_iter().collect();
    names.push("LoadError");

    output.push_str("#[allow(unused_imports)]\n");
    output.push_str("use serde_json::{Map, Value};\n\n");
    output.push_str(&format!("use {}::{{{}}};\n\n", root, names.join(", ")));
}

fn emit_struct(output: &mut String, type_name: &str, fields: &[FieldBinding], nested: &[(&str, &str)]) {
    output.push_str("#[derive(Debug, Clone, PartialEq)]\n");
    output.push_str(&format!("pub struct {} {{\n", type_name));
    for field in fields {
        output.push_str(&format!("    pub {}: {},\n", field.ident, field.ty.rust_type()));
    }
    for (ident, ty) in nested {
        output.push_str(&format!("    pub {}: {},\n", ident, ty));
    }
    output.push_str("}\n\n");
}

fn emit_default_impl(output: &mut String, type_name: &str) {
    output.push_str(&format!("impl Default for {} {{\n", type_name));
    output.push_str("    fn default() -> Self {\n");
    output.push_str("        Self::init_defaults()\n");
    output.push_str("    }\n");
    output.push_str("}\n\n");
}

fn emit_init_defaults(output: &mut String, doc: &str, fields: &[FieldBinding], nested: &[(&str, &str)]) {
    output.push_str(&format!("    /// {}\n", doc));
    output.push_str("    pub fn init_defaults() -> Self {\n");
    output.push_str("        Self {\n");
    for field in fields {
        output.push_str(&format!("            {}: {},\n", field.ident, render_default(field)));
    }
    for (ident, ty) in nested {
        output.push_str(&format!("            {}: {}::init_defaults(),\n", ident, ty));
    }
    output.push_str("        }\n");
    output.push_str("    }\n\n");
}

fn emit_from_json(output: &mut String, path: &str) {
    output.push_str("    /// Load a canonical JSON record; absent fields keep their defaults\n");
    output.push_str("    pub fn from_json(value: &Value) -> Result<Self, LoadError> {\n");
    output.push_str("        let mut out = Self::init_defaults();\n");
    output.push_str(&format!("        out.apply_json(value, {:?})?;\n", path));
    output.push_str("        Ok(out)\n");
    output.push_str("    }\n\n");
}

fn emit_apply_json_open(output: &mut String) {
    output.push_str("    /// Overlay the fields present in `value`\n");
    output.push_str("    pub fn apply_json(&mut self, value: &Value, path: &str) -> Result<(), LoadError> {\n");
    output.push_str("        let obj = object(value, path)?;\n");
}

fn emit_field_loads(output: &mut String, fields: &[FieldBinding]) {
    for field in fields {
        output.push_str(&format!("        if let Some(v) = obj.get({:?}) {{\n", field.json_name));
        output.push_str(&format!(
            "            self.{} = {}(v, &format!(\"{{}}.{}\", path))?;\n",
            field.ident,
            loader_for(field.ty),
            field.json_name
        ));
        output.push_str("        }\n");
    }
}

// =============================================================================
// Literals
// =============================================================================

/// Rust expression for a field's default; the binding already checked its type
fn render_default(field: &FieldBinding) -> String {
    let value = &field.default;
    match field.ty {
        FieldType::Bool => value.as_bool().unwrap_or(false).to_string(),
        FieldType::Integer => value.as_i64().unwrap_or(0).to_string(),
        FieldType::Number => format!("{:?}", value.as_f64().unwrap_or(0.0)),
        FieldType::Text => format!("{:?}.to_string()", value.as_str().unwrap_or("")),
        FieldType::TextList => match value.as_array() {
            Some(items) if !items.is_empty() => {
                let items: Vec<String> = items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|s| format!("{:?}.to_string()", s))
                    .collect();
                format!("vec![{}]", items.join(", "))
            }
            _ => "Vec::new()".to_string(),
        },
        FieldType::ValueList => match value.as_array() {
            Some(items) if !items.is_empty() => {
                let items: Vec<String> = items.iter().map(render_value).collect();
                format!("vec![{}]", items.join(", "))
            }
            _ => "Vec::new()".to_string(),
        },
        FieldType::Map => match value.as_object() {
            Some(map) if !map.is_empty() => render_map(map),
            _ => "Map::new()".to_string(),
        },
        FieldType::Value => render_value(value),
    }
}

/// Rust expression building a `serde_json::Value`
fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "Value::Null".to_string(),
        Value::Bool(b) => format!("Value::Bool({})", b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                format!("Value::from({}i64)", i)
            } else if let Some(u) = n.as_u64() {
                format!("Value::from({}u64)", u)
            } else {
                format!("Value::from({:?}f64)", n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => format!("Value::String({:?}.to_string())", s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_value).collect();
            format!("Value::Array(vec![{}])", items.join(", "))
        }
        Value::Object(map) => format!("Value::Object({})", render_map(map)),
    }
}

fn render_map(map: &serde_json::Map<String, Value>) -> String {
    if map.is_empty() {
        return "Map::new()".to_string();
    }
    let entries: Vec<String> = map
        .iter()
        .map(|(k, v)| format!("({:?}.to_string(), {})", k, render_value(v)))
        .collect();
    format!("Map::from_iter([{}])", entries.join(", "))
}
