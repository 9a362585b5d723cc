//! Schema Registry
//!
//! Read-only lookup tables for rule, category and profile schemas, built once
//! from a schema root and passed explicitly to every pipeline stage.
//!
//! Layout of a schema root:
//!
//! ```text
//! rules/<Category>.<RuleName>.json
//! categories/<Category>.json
//! profiles.json            { "definitions": { "rule_common": ..., ... } }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path};

use include_dir::{include_dir, Dir};
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{CompileError, Result};
use crate::names::{canonicalize_key, qualify};
use crate::schema::{Schema, SchemaKind};

/// Schema root compiled into the binary
static BUILTIN_SCHEMAS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/schemas");

/// Profile holding defaults shared by every rule
pub const RULE_PROFILE: &str = "rule_common";
/// Profile holding defaults shared by every category
pub const CATEGORY_PROFILE: &str = "category_common";
/// Profile holding defaults for the general section
pub const GENERAL_PROFILE: &str = "general_common";

const PROFILES_FILE: &str = "profiles.json";

/// Answers whether a qualified rule name is modeled.
///
/// The exporter only needs this one question, so it depends on the trait
/// rather than on a loaded registry.
pub trait RuleCatalog {
    /// `qualified` is `Category/RuleName` in any spelling
    fn contains_rule(&self, qualified: &str) -> bool;
}

/// Loaded schema set
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    rules: BTreeMap<String, Schema>,
    categories: BTreeMap<String, Schema>,
    profiles: BTreeMap<String, Schema>,
}

impl SchemaRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every schema under a schema root directory
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        // Surface a missing root as an IO error instead of an empty registry
        fs::metadata(root)?;

        let mut registry = Self::new();
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(path);
            match fs::read_to_string(path) {
                Ok(content) => registry.load_source(relative, &content, &path.display().to_string()),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable schema"),
            }
        }

        tracing::debug!(
            root = %root.display(),
            rules = registry.rules.len(),
            categories = registry.categories.len(),
            "loaded schema registry"
        );
        Ok(registry)
    }

    /// Registry over the schema set embedded at build time
    pub fn builtin() -> Self {
        let mut files: Vec<(&Path, &str)> = Vec::new();
        collect_embedded_files(&BUILTIN_SCHEMAS, &mut files);
        files.sort_by(|a, b| a.0.cmp(b.0));

        let mut registry = Self::new();
        for (path, content) in files {
            registry.load_source(path, content, &format!("builtin:{}", path.display()));
        }
        registry
    }

    /// Load from a configured directory, or the embedded set when none is given
    pub fn from_dir_or_builtin(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::open(dir),
            None => Ok(Self::builtin()),
        }
    }

    /// Add a schema; returns false (and keeps the existing one) on a name clash
    pub fn insert(&mut self, schema: Schema) -> bool {
        let table = match schema.kind {
            SchemaKind::Rule => &mut self.rules,
            SchemaKind::Category => &mut self.categories,
            SchemaKind::Profile => &mut self.profiles,
        };
        if let Some(existing) = table.get(&schema.name) {
            tracing::warn!(
                name = %schema.name,
                kept = existing.source_path.as_deref().unwrap_or("<memory>"),
                skipped = schema.source_path.as_deref().unwrap_or("<memory>"),
                "duplicate schema name"
            );
            return false;
        }
        table.insert(schema.name.clone(), schema);
        true
    }

    /// Classify and parse one schema file relative to the schema root
    fn load_source(&mut self, relative: &Path, content: &str, source: &str) {
        let value = match parse_schema(content, source) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "skipping schema");
                return;
            }
        };

        let Some(stem) = relative.file_stem().and_then(|s| s.to_str()) else {
            return;
        };
        let top = match relative.components().next() {
            Some(Component::Normal(first)) => first.to_str().unwrap_or(""),
            _ => "",
        };

        if relative == Path::new(PROFILES_FILE) {
            self.load_profiles(&value, source);
        } else if top == SchemaKind::Rule.dir_name() {
            match stem.split_once('.') {
                Some((category, rule)) => {
                    let schema = Schema::new(qualify(category, rule), SchemaKind::Rule, value)
                        .with_source(source);
                    self.insert(schema);
                }
                None => tracing::warn!(path = %source, "rule schema name must be <Category>.<Rule>"),
            }
        } else if top == SchemaKind::Category.dir_name() {
            let schema = Schema::new(canonicalize_key(stem), SchemaKind::Category, value)
                .with_source(source);
            self.insert(schema);
        } else {
            tracing::debug!(path = %source, "ignoring file outside rules/ and categories/");
        }
    }

    fn load_profiles(&mut self, value: &Value, source: &str) {
        let Some(definitions) = value.get("definitions").and_then(Value::as_object) else {
            tracing::warn!(path = %source, "profiles file has no definitions object");
            return;
        };
        for (name, profile) in definitions {
            if !profile.is_object() {
                tracing::warn!(path = %source, profile = %name, "skipping non-object profile");
                continue;
            }
            let schema = Schema::new(canonicalize_key(name), SchemaKind::Profile, profile.clone())
                .with_source(source);
            self.insert(schema);
        }
    }

    /// Rule schema by qualified name (any spelling of `Category/Rule`)
    pub fn rule(&self, qualified: &str) -> Option<&Schema> {
        self.rules.get(qualified).or_else(|| {
            let (category, rule) = qualified.split_once('/')?;
            self.rules.get(&qualify(category, rule))
        })
    }

    /// Category schema by name (any spelling)
    pub fn category(&self, name: &str) -> Option<&Schema> {
        self.categories
            .get(name)
            .or_else(|| self.categories.get(&canonicalize_key(name)))
    }

    pub fn has_rule(&self, qualified: &str) -> bool {
        self.rule(qualified).is_some()
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    /// Rule schemas of one canonical category, sorted by name
    pub fn rules_in(&self, category: &str) -> Vec<&Schema> {
        let prefix = format!("{}/", category);
        self.rules
            .range(prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(&prefix))
            .map(|(_, schema)| schema)
            .collect()
    }

    /// Every category named by a category schema or owning a rule schema
    pub fn category_names(&self) -> Vec<String> {
        let mut names: BTreeSet<String> = self.categories.keys().cloned().collect();
        for name in self.rules.keys() {
            if let Some((category, _)) = name.split_once('/') {
                names.insert(category.to_string());
            }
        }
        names.into_iter().collect()
    }

    /// All rule schemas, sorted by qualified name
    pub fn rules(&self) -> impl Iterator<Item = &Schema> {
        self.rules.values()
    }

    pub fn rule_profile(&self) -> Option<&Schema> {
        self.profiles.get(RULE_PROFILE)
    }

    pub fn category_profile(&self) -> Option<&Schema> {
        self.profiles.get(CATEGORY_PROFILE)
    }

    pub fn general_profile(&self) -> Option<&Schema> {
        self.profiles.get(GENERAL_PROFILE)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.categories.is_empty() && self.profiles.is_empty()
    }
}

impl RuleCatalog for SchemaRegistry {
    fn contains_rule(&self, qualified: &str) -> bool {
        self.has_rule(qualified)
    }
}

/// Parse schema text; the top level must be a JSON object
pub fn parse_schema(content: &str, source: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(content).map_err(|e| CompileError::SchemaParse {
        path: source.to_string(),
        reason: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(CompileError::SchemaParse {
            path: source.to_string(),
            reason: "top level is not an object".to_string(),
        });
    }
    Ok(value)
}

fn collect_embedded_files<'a>(dir: &'a Dir<'static>, files: &mut Vec<(&'a Path, &'a str)>) {
    for file in dir.files() {
        let path = file.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            if let Some(content) = file.contents_utf8() {
                files.push((path, content));
            }
        }
    }

    for subdir in dir.dirs() {
        collect_embedded_files(subdir, files);
    }
}
