//! Key and Name Canonicalization
//!
//! Every configuration key, category and rule name is folded into one
//! lower-case, underscore-delimited form before it is compared or stored:
//!
//! - `IndentWidth` -> `indent_width`
//! - `HTTPServer` -> `http_server`
//! - `Layout/TrailingWhitespace` -> `layout/trailing_whitespace`
//!
//! [`canonicalize_key`] is total and idempotent, so canonical names can be
//! fed back through it without changing.

use serde_json::{Map, Value};

/// Convert an arbitrary identifier into canonical snake case.
pub fn canonicalize_key(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            // A run of separators collapses into one underscore
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let word_start = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            let acronym_end = prev.is_ascii_uppercase()
                && next.map(|n| n.is_ascii_lowercase()).unwrap_or(false);
            if (word_start || acronym_end) && !out.ends_with('_') {
                out.push('_');
            }
        }

        out.push(c.to_ascii_lowercase());
    }

    out.trim_matches('_').to_string()
}

/// Split a `Category/RuleName` identifier once on the first `/`.
///
/// Both halves are returned raw; callers canonicalize them as needed.
pub fn split_qualified(raw: &str) -> Option<(&str, &str)> {
    raw.split_once('/')
}

/// Canonical qualified name for a category and rule short name.
pub fn qualify(category: &str, rule: &str) -> String {
    format!("{}/{}", canonicalize_key(category), canonicalize_key(rule))
}

/// Canonicalize a possibly-qualified rule identifier for schema lookup.
pub fn canonicalize_qualified(raw: &str) -> String {
    match split_qualified(raw) {
        Some((category, rule)) => qualify(category, rule),
        None => canonicalize_key(raw),
    }
}

/// Recursively canonicalize every mapping key in a value.
///
/// When two keys of one mapping fold to the same canonical key, the first
/// one in source order is kept.
pub fn canonicalize_keys_deep(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(canonicalize_map_keys(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize_keys_deep).collect()),
        other => other,
    }
}

/// Canonicalize the keys of one mapping, recursing into its values.
pub fn canonicalize_map_keys(map: Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(map.len());
    for (key, value) in map {
        let key = canonicalize_key(&key);
        if out.contains_key(&key) {
            tracing::debug!(key = %key, "dropping colliding key");
            continue;
        }
        out.insert(key, canonicalize_keys_deep(value));
    }
    out
}

/// Convert a canonical name to PascalCase (`line_length` -> `LineLength`).
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == ' ' || c == '/' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Turn a canonical name into a usable Rust identifier.
///
/// Keywords become raw identifiers; names starting with a digit get a
/// leading underscore.
pub fn rust_ident(canonical: &str) -> String {
    if canonical.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", canonical);
    }
    if RUST_KEYWORDS.contains(&canonical) {
        // `self`, `super` and `crate` cannot be raw identifiers
        if matches!(canonical, "self" | "super" | "crate") {
            return format!("{}_", canonical);
        }
        return format!("r#{}", canonical);
    }
    canonical.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_keys() {
        assert_eq!(canonicalize_key("EnforcedStyle"), "enforced_style");
        assert_eq!(canonicalize_key("IndentWidth"), "indent_width");
        assert_eq!(canonicalize_key("Max"), "max");
        assert_eq!(canonicalize_key("AllowURI"), "allow_uri");
    }

    #[test]
    fn test_acronym_boundaries() {
        assert_eq!(canonicalize_key("HTTPServer"), "http_server");
        assert_eq!(canonicalize_key("ABc"), "a_bc");
        assert_eq!(canonicalize_key("utf8Encoding"), "utf8_encoding");
    }

    #[test]
    fn test_punctuation_runs() {
        assert_eq!(canonicalize_key("Target Ruby-Version"), "target_ruby_version");
        assert_eq!(canonicalize_key("--foo..bar--"), "foo_bar");
        assert_eq!(canonicalize_key("Foo_Bar"), "foo_bar");
        assert_eq!(canonicalize_key("a-B"), "a_b");
        assert_eq!(canonicalize_key(""), "");
        assert_eq!(canonicalize_key("___"), "");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["EnforcedStyle", "HTTPServer", "  spaced  Out ", "x__Y--z", "Layout", "ÄÖü"] {
            let once = canonicalize_key(raw);
            assert_eq!(canonicalize_key(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_qualified_names() {
        assert_eq!(split_qualified("Layout/TrailingWhitespace"), Some(("Layout", "TrailingWhitespace")));
        assert_eq!(split_qualified("A/B/C"), Some(("A", "B/C")));
        assert_eq!(split_qualified("Layout"), None);
        assert_eq!(canonicalize_qualified("Layout/TrailingWhitespace"), "layout/trailing_whitespace");
        assert_eq!(qualify("Layout", "IndentationConsistency"), "layout/indentation_consistency");
    }

    #[test]
    fn test_deep_keys_first_wins() {
        let value = json!({
            "EnforcedStyle": "tab",
            "enforced_style": "space",
            "Nested": { "InnerKey": [ { "DeepKey": 1 } ] }
        });
        let out = canonicalize_keys_deep(value);
        assert_eq!(out["enforced_style"], "tab");
        assert_eq!(out["nested"]["inner_key"][0]["deep_key"], 1);
    }

    #[test]
    fn test_pascal_and_ident() {
        assert_eq!(to_pascal_case("line_length"), "LineLength");
        assert_eq!(to_pascal_case("layout/line_length"), "LayoutLineLength");
        assert_eq!(rust_ident("max"), "max");
        assert_eq!(rust_ident("type"), "r#type");
        assert_eq!(rust_ident("self"), "self_");
        assert_eq!(rust_ident("2fa"), "_2fa");
    }
}
