//! Code Generation
//!
//! Generates typed Rust bindings from a schema registry.
//!
//! Architecture:
//! - `BindingSet`: built once from a registry; holds every resolved binding
//! - `RuleBinding` / `CategoryBinding` / `FieldBinding`: pure projections of
//!   a schema with names, types and defaults already decided
//! - Emitter (`rust`): turns bindings into source files
//!
//! The key constraint: the emitter NEVER reads raw schema JSON, only binding
//! fields. All type and default decisions happen while building bindings.

pub mod rust;

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use similar::TextDiff;

use crate::canonical::write_atomic;
use crate::config::DefaultsConfig;
use crate::error::Result;
use crate::names::{canonicalize_key, rust_ident, to_pascal_case};
use crate::normalize::SECTION_KEYS;
use crate::registry::SchemaRegistry;
use crate::schema::{all_of, declaration_default, declaration_type, Schema};

// =============================================================================
// Bindings
// =============================================================================

/// Semantic type of a generated field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldType {
    Bool,
    Integer,
    Number,
    Text,
    TextList,
    ValueList,
    Map,
    Value,
}

impl FieldType {
    /// Map a property declaration's `type` (direct or via `allOf`)
    pub fn from_declaration(declaration: &Value) -> Self {
        match declaration_type(declaration) {
            Some("boolean") => FieldType::Bool,
            Some("integer") => FieldType::Integer,
            Some("number") => FieldType::Number,
            Some("string") => FieldType::Text,
            Some("array") => {
                if items_type(declaration) == Some("string") {
                    FieldType::TextList
                } else {
                    FieldType::ValueList
                }
            }
            Some("object") => FieldType::Map,
            _ => FieldType::Value,
        }
    }

    /// Rust type of the field
    pub fn rust_type(&self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Integer => "i64",
            FieldType::Number => "f64",
            FieldType::Text => "String",
            FieldType::TextList => "Vec<String>",
            FieldType::ValueList => "Vec<Value>",
            FieldType::Map => "Map<String, Value>",
            FieldType::Value => "Value",
        }
    }

    /// Whether a JSON default fits this type
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::Bool => value.is_boolean(),
            FieldType::Integer => value.is_i64(),
            FieldType::Number => value.is_number(),
            FieldType::Text => value.is_string(),
            FieldType::TextList => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
            FieldType::ValueList => value.is_array(),
            FieldType::Map => value.is_object(),
            FieldType::Value => true,
        }
    }

    /// Default used when no schema or profile supplies one
    pub fn zero(&self) -> Value {
        match self {
            FieldType::Bool => Value::Bool(false),
            FieldType::Integer => Value::from(0i64),
            FieldType::Number => Value::from(0.0f64),
            FieldType::Text => Value::String(String::new()),
            FieldType::TextList | FieldType::ValueList => Value::Array(Vec::new()),
            FieldType::Map => Value::Object(Map::new()),
            FieldType::Value => Value::Null,
        }
    }
}

fn items_type(declaration: &Value) -> Option<&str> {
    if let Some(items) = declaration.get("items") {
        return declaration_type(items);
    }
    all_of(declaration)
        .iter()
        .find_map(|entry| entry.get("items").and_then(declaration_type))
}

/// One field of a generated record
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    /// Key in the canonical JSON record
    pub json_name: String,
    /// Rust field identifier
    pub ident: String,
    pub ty: FieldType,
    /// Default, already checked against `ty`
    pub default: Value,
}

/// Generated record for one rule schema
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBinding {
    /// `category/rule_name`
    pub qualified: String,
    /// Canonical rule short name (JSON key inside the category's `rules`)
    pub short_name: String,
    /// Field identifier inside the category record
    pub field_ident: String,
    pub type_name: String,
    pub module_name: String,
    /// `enabled`, `severity`, `include`, `exclude`, then declared properties
    pub fields: Vec<FieldBinding>,
}

/// Generated record for one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBinding {
    pub name: String,
    /// Field identifier inside the root record
    pub field_ident: String,
    pub type_name: String,
    pub module_name: String,
    pub settings: Vec<FieldBinding>,
    pub rules: Vec<RuleBinding>,
}

/// Everything the emitter needs, in generation order
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSet {
    pub schema_version: String,
    pub general: Vec<FieldBinding>,
    pub categories: Vec<CategoryBinding>,
    /// Non-fatal problems found while resolving defaults
    pub diagnostics: Vec<String>,
}

impl BindingSet {
    /// Resolve bindings for every category and rule in the registry
    pub fn build(registry: &SchemaRegistry, defaults: &DefaultsConfig) -> Self {
        let mut diagnostics = Vec::new();
        let general = section_fields(
            "general",
            None,
            registry.general_profile(),
            defaults,
            &mut diagnostics,
        );

        let mut categories = Vec::new();
        let mut root_idents: HashSet<String> = ["schema_version", "general"].iter().map(|s| s.to_string()).collect();
        let mut type_names: HashSet<String> = ["Config", "General", "LoadError"].iter().map(|s| s.to_string()).collect();
        let mut rule_modules: HashSet<String> = HashSet::new();
        for name in registry.category_names() {
            if name.is_empty() {
                continue;
            }
            let schema = registry.category(&name);
            let category_type = unique_name(format!("{}Category", type_name(&name)), &mut type_names);
            let settings = section_fields(&name, schema, registry.category_profile(), defaults, &mut diagnostics);

            let mut rule_idents: HashSet<String> = SECTION_KEYS.iter().map(|s| s.to_string()).collect();
            let mut rules = Vec::new();
            for rule_schema in registry.rules_in(&name) {
                // Patterns of the category decide which rules a compiled config can carry
                let short_name = rule_schema.name[name.len() + 1..].to_string();
                if short_name.is_empty() || schema.map(|s| !s.accepts(&short_name)).unwrap_or(false) {
                    continue;
                }
                let binding = rule_binding(&name, &short_name, rule_schema, registry, defaults, &mut diagnostics);
                rules.push(RuleBinding {
                    field_ident: unique_ident(&short_name, "_rule", &mut rule_idents),
                    type_name: unique_name(binding.type_name.clone(), &mut type_names),
                    module_name: unique_name(binding.module_name.clone(), &mut rule_modules),
                    ..binding
                });
            }

            categories.push(CategoryBinding {
                field_ident: unique_ident(&name, "_category", &mut root_idents),
                type_name: category_type,
                module_name: module_name(&name),
                name,
                settings,
                rules,
            });
        }

        Self {
            schema_version: defaults.schema_version.clone(),
            general,
            categories,
            diagnostics,
        }
    }

    pub fn rule_count(&self) -> usize {
        self.categories.iter().map(|c| c.rules.len()).sum()
    }
}

fn rule_binding(
    category: &str,
    short_name: &str,
    schema: &Schema,
    registry: &SchemaRegistry,
    defaults: &DefaultsConfig,
    diagnostics: &mut Vec<String>,
) -> RuleBinding {
    let qualified = format!("{}/{}", category, short_name);
    let profile = registry.rule_profile();
    let mut fields = section_fields(&qualified, Some(schema), profile, defaults, diagnostics);
    // A rule's `enabled` default skips the profile, as normalization does
    if let Some(enabled) = fields.iter_mut().find(|f| f.json_name == "enabled") {
        enabled.default = schema
            .property_default("enabled")
            .filter(|d| d.is_boolean())
            .cloned()
            .unwrap_or(Value::Bool(defaults.enabled));
    }

    let mut idents: HashSet<String> = SECTION_KEYS.iter().map(|s| s.to_string()).collect();
    for (name, declaration) in schema.declared_properties() {
        let json_name = canonicalize_key(name);
        if json_name.is_empty() || SECTION_KEYS.contains(&json_name.as_str()) {
            continue;
        }
        let ty = FieldType::from_declaration(declaration);
        let candidate = declaration_default(declaration)
            .or_else(|| profile.and_then(|p| p.property_default(name)));
        let default = checked_default(&qualified, &json_name, ty, candidate, diagnostics);
        fields.push(FieldBinding {
            ident: unique_ident(&json_name, "_", &mut idents),
            json_name,
            ty,
            default,
        });
    }

    RuleBinding {
        type_name: type_name(&qualified),
        module_name: module_name(&format!("{}_{}", category, short_name)),
        field_ident: rust_ident(short_name),
        short_name: short_name.to_string(),
        qualified,
        fields,
    }
}

/// `enabled`/`severity`/`include`/`exclude` with defaults from schema, then profile
fn section_fields(
    owner: &str,
    schema: Option<&Schema>,
    profile: Option<&Schema>,
    defaults: &DefaultsConfig,
    diagnostics: &mut Vec<String>,
) -> Vec<FieldBinding> {
    SECTION_KEYS
        .iter()
        .map(|key| {
            let ty = match *key {
                "enabled" => FieldType::Bool,
                "severity" => FieldType::Text,
                _ => FieldType::TextList,
            };
            let candidate = schema
                .and_then(|s| s.property_default(key))
                .or_else(|| profile.and_then(|p| p.property_default(key)));
            let fallback = match *key {
                "enabled" => Value::Bool(defaults.enabled),
                "severity" => Value::String(defaults.severity.clone()),
                _ => ty.zero(),
            };
            let default = match candidate {
                Some(value) if ty.accepts(value) => value.clone(),
                Some(value) => {
                    diagnostics.push(format!("{}: default {} for {} does not fit {}", owner, value, key, ty.rust_type()));
                    fallback
                }
                None => fallback,
            };
            FieldBinding {
                json_name: key.to_string(),
                ident: key.to_string(),
                ty,
                default,
            }
        })
        .collect()
}

fn checked_default(
    owner: &str,
    field: &str,
    ty: FieldType,
    candidate: Option<&Value>,
    diagnostics: &mut Vec<String>,
) -> Value {
    match candidate {
        Some(value) if ty.accepts(value) => value.clone(),
        Some(value) => {
            diagnostics.push(format!("{}: default {} for {} does not fit {}", owner, value, field, ty.rust_type()));
            ty.zero()
        }
        None => ty.zero(),
    }
}

/// Rust identifier for `name`, suffixed until it is unused
fn unique_ident(name: &str, suffix: &str, taken: &mut HashSet<String>) -> String {
    let mut ident = rust_ident(name);
    while taken.contains(&ident) {
        ident = format!("{}{}", ident.trim_start_matches("r#"), suffix);
    }
    taken.insert(ident.clone());
    ident
}

/// `base`, or `base2`, `base3`... when already taken
fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    let mut name = base.clone();
    let mut n = 2;
    while taken.contains(&name) {
        name = format!("{}{}", base, n);
        n += 1;
    }
    taken.insert(name.clone());
    name
}

/// PascalCase type name that is a valid identifier
fn type_name(canonical: &str) -> String {
    let name = to_pascal_case(canonical);
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}

/// Module name usable as a file stem (keywords get a trailing underscore)
fn module_name(canonical: &str) -> String {
    let ident = rust_ident(canonical);
    match ident.strip_prefix("r#") {
        Some(keyword) => format!("{}_", keyword),
        None => ident,
    }
}

// =============================================================================
// Generated Output
// =============================================================================

/// Output from code generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// Generated files keyed by path relative to the output root
    pub files: BTreeMap<PathBuf, String>,
    /// Number of record types generated
    pub type_count: usize,
    /// Any warnings during generation
    pub diagnostics: Vec<String>,
}

/// A generated file that differs from the copy on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub path: PathBuf,
    /// Unified diff from the file on disk to the generated content
    pub diff: String,
}

impl GeneratedOutput {
    /// Write every file under `dir`; returns the number of files written
    pub fn write_to(&self, dir: &Path) -> Result<usize> {
        for (relative, content) in &self.files {
            let path = dir.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            write_atomic(&path, content.as_bytes())?;
            tracing::debug!(path = %path.display(), "wrote binding");
        }
        tracing::info!(dir = %dir.display(), files = self.files.len(), "wrote bindings");
        Ok(self.files.len())
    }

    /// Files under `dir` that are missing or differ from the generated output
    pub fn diff_against(&self, dir: &Path) -> Result<Vec<Drift>> {
        let mut drift = Vec::new();
        for (relative, content) in &self.files {
            let path = dir.join(relative);
            let on_disk = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
                Err(e) => return Err(e.into()),
            };
            if on_disk == *content {
                continue;
            }
            let old_header = format!("a/{}", relative.display());
            let new_header = format!("b/{}", relative.display());
            let diff = TextDiff::from_lines(on_disk.as_str(), content.as_str())
                .unified_diff()
                .context_radius(3)
                .header(&old_header, &new_header)
                .to_string();
            drift.push(Drift {
                path: relative.clone(),
                diff,
            });
        }
        Ok(drift)
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Generate Rust bindings for every schema in the registry
pub fn generate_rust(registry: &SchemaRegistry, defaults: &DefaultsConfig) -> GeneratedOutput {
    let bindings = BindingSet::build(registry, defaults);
    for diagnostic in &bindings.diagnostics {
        tracing::warn!("{}", diagnostic);
    }
    rust::emit(&bindings)
}
