//! Type reconciliation against reference trees
//!
//! A flexible source declaration may give a scalar where the declared shape
//! is a list. The reconciler looks a canonical key up in the resolved and
//! default reference trees (under its original spelling) and commits the
//! value to a list when the reference holds one.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::names::canonicalize_key;

/// Reference trees consulted for array-typed hints
#[derive(Debug, Clone, Copy)]
pub struct TypeReconciler<'a> {
    raw: &'a Map<String, Value>,
    resolved: &'a Map<String, Value>,
    defaults: &'a Map<String, Value>,
}

impl<'a> TypeReconciler<'a> {
    pub fn new(
        raw: &'a Map<String, Value>,
        resolved: &'a Map<String, Value>,
        defaults: &'a Map<String, Value>,
    ) -> Self {
        Self { raw, resolved, defaults }
    }

    /// Map canonical key -> first original spelling under `section`.
    ///
    /// Spellings are gathered from the raw, resolved and default trees in
    /// that order.
    pub fn original_spellings(&self, section: &str) -> HashMap<String, &'a str> {
        let mut spellings = HashMap::new();
        for tree in [self.raw, self.resolved, self.defaults] {
            let Some(keys) = tree.get(section).and_then(Value::as_object) else {
                continue;
            };
            for key in keys.keys() {
                spellings.entry(canonicalize_key(key)).or_insert(key.as_str());
            }
        }
        spellings
    }

    /// Whether the references declare the original key as list-typed.
    ///
    /// The resolved tree decides when it holds the key; the default tree
    /// is consulted only when it does not.
    pub fn expects_list(&self, section: &str, original: &str) -> bool {
        let lookup = |tree: &Map<String, Value>| tree.get(section).and_then(|s| s.get(original)).map(Value::is_array);
        lookup(self.resolved)
            .or_else(|| lookup(self.defaults))
            .unwrap_or(false)
    }

    /// Reconcile every key of an exported section in place, skipping `skip`.
    ///
    /// `section` is the section's key in the reference trees.
    pub fn reconcile_section(&self, section: &str, values: &mut Map<String, Value>, skip: &[&str]) {
        let spellings = self.original_spellings(section);
        for (key, value) in values.iter_mut() {
            if skip.contains(&key.as_str()) {
                continue;
            }
            let Some(original) = spellings.get(key) else {
                continue;
            };
            if self.expects_list(section, original) && !value.is_array() {
                tracing::debug!(section = %section, key = %key, "coercing value to list");
                *value = wrap_list(value.take());
            }
        }
    }
}

/// Commit a value to list shape: lists pass through, null becomes `[]`
pub fn wrap_list(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        Value::Null => Value::Array(Vec::new()),
        other => Value::Array(vec![other]),
    }
}
