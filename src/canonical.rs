//! Canonical encoding and the content-addressed artifact store
//!
//! - Every mapping's keys are sorted; arrays keep their order
//! - The sorted tree is encoded compactly on one line
//! - The artifact is stored as `<out_dir>/<sha256>.json`
//! - Writes go through a hidden temp file in the same directory and an
//!   atomic rename, so readers never observe a partial file

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::checksum::Checksum;
use crate::error::Result;

/// Recursively sort every mapping's keys
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::with_capacity(entries.len());
            for (key, value) in entries {
                sorted.insert(key, sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Deterministic single-line encoding of a tree
pub fn encode(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&sort_keys(value.clone()))?)
}

/// A canonical artifact written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Final `<digest>.json` path
    pub path: PathBuf,
    /// SHA-256 of the encoded bytes
    pub checksum: Checksum,
    /// Encoded length in bytes
    pub bytes: usize,
}

impl Artifact {
    /// Re-read the artifact and check its digest
    pub fn verify(&self) -> Result<bool> {
        let content = fs::read(&self.path)?;
        Ok(self.checksum.verify(&content))
    }
}

/// Canonicalize `value` and store it under its digest in `out_dir`.
///
/// Storing identical content twice converges on the same file.
pub fn write_artifact(value: &Value, out_dir: &Path) -> Result<Artifact> {
    let encoded = encode(value)?;
    let checksum = Checksum::of_str(&encoded);
    let path = out_dir.join(checksum.file_name());

    fs::create_dir_all(out_dir)?;
    if fs::read(&path).map(|existing| checksum.verify(&existing)).unwrap_or(false) {
        tracing::debug!(path = %path.display(), "artifact already present");
    } else {
        write_atomic(&path, encoded.as_bytes())?;
        tracing::info!(path = %path.display(), checksum = %checksum, "wrote artifact");
    }

    Ok(Artifact {
        path,
        checksum,
        bytes: encoded.len(),
    })
}

/// Write `bytes` to `path` via temp file, `sync_all` and rename.
///
/// Each call gets its own uniquely named `.<stem>.*.tmp` file next to the
/// target, removed on any failure. A failed rename still counts as success
/// when `path` already holds exactly `bytes`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", stem))
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.as_file().sync_all()?;

    if let Err(e) = temp.persist(path) {
        // A concurrent writer of the same content got there first
        if fs::read(path).map(|existing| existing == bytes).unwrap_or(false) {
            return Ok(());
        }
        return Err(e.error.into());
    }
    Ok(())
}

/// Pretty-printed, key-sorted JSON written atomically
pub fn write_pretty(value: &Value, path: &Path) -> Result<()> {
    let mut text = serde_json::to_string_pretty(&sort_keys(value.clone()))?;
    text.push('\n');
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_atomic(path, text.as_bytes())
}
