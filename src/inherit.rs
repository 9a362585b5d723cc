//! Inheritance resolution for layered configuration documents
//!
//! A document may name parent documents under its inherit key (a single
//! path or a list of paths, relative to the document's directory). Parents
//! are merged left to right and the child is merged on top.
//!
//! Merge semantics:
//! - Objects: deep-merge by key (recursive)
//! - Arrays: REPLACE (child wins entirely)
//! - Scalars: override (child wins)

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::document::load_document;
use crate::error::Result;

/// Deep merge `overlay` into `base` in place.
///
/// Keys already in `base` keep their position; new keys are appended in
/// overlay order.
pub fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, incoming) in overlay {
        match base.get_mut(&key) {
            Some(current) => merge_value(current, incoming),
            None => {
                base.insert(key, incoming);
            }
        }
    }
}

fn merge_value(current: &mut Value, incoming: Value) {
    match (current, incoming) {
        (Value::Object(current_map), Value::Object(incoming_map)) => deep_merge(current_map, incoming_map),
        (current, incoming) => *current = incoming,
    }
}

/// Resolves a document and its ancestors into one merged tree
#[derive(Debug, Clone)]
pub struct InheritanceResolver {
    inherit_key: String,
}

impl Default for InheritanceResolver {
    fn default() -> Self {
        Self::new("inherit_from")
    }
}

impl InheritanceResolver {
    pub fn new(inherit_key: impl Into<String>) -> Self {
        Self {
            inherit_key: inherit_key.into(),
        }
    }

    /// Key naming parent documents
    pub fn inherit_key(&self) -> &str {
        &self.inherit_key
    }

    /// Resolve a document starting from a fresh visited set
    pub fn resolve_file(&self, path: impl AsRef<Path>) -> Result<Map<String, Value>> {
        let mut visited = HashSet::new();
        self.resolve(path.as_ref(), &mut visited)
    }

    /// Resolve `path`, skipping documents already in `visited`.
    ///
    /// A missing document contributes an empty tree with a warning; a
    /// document seen before contributes an empty tree silently, which breaks
    /// inheritance cycles. The child keeps its own inherit key in the result.
    pub fn resolve(&self, path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Map<String, Value>> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "config file not found");
            return Ok(Map::new());
        }
        let real = path.canonicalize()?;
        if !visited.insert(real.clone()) {
            tracing::debug!(path = %real.display(), "already visited");
            return Ok(Map::new());
        }

        let document = load_document(&real)?;
        let base_dir = real.parent().map(Path::to_path_buf).unwrap_or_default();

        let mut merged = Map::new();
        for parent in self.parents(&document, &real) {
            let parent_tree = self.resolve(&base_dir.join(parent), visited)?;
            deep_merge(&mut merged, parent_tree);
        }
        deep_merge(&mut merged, document);
        Ok(merged)
    }

    fn parents(&self, document: &Map<String, Value>, path: &Path) -> Vec<String> {
        let entries = match document.get(&self.inherit_key) {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(items)) => items.iter().collect::<Vec<_>>(),
            Some(single) => vec![single],
        };

        entries
            .into_iter()
            .filter_map(|entry| match entry.as_str() {
                Some(parent) => Some(parent.to_string()),
                None => {
                    tracing::warn!(path = %path.display(), entry = %entry, "ignoring non-string parent reference");
                    None
                }
            })
            .collect()
    }
}
