//! Error types for the configuration compiler

use std::fmt;

use thiserror::Error;

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;

/// Compiler errors
///
/// Only [`CompileError::Validation`] is a policy failure; the other variants
/// are environmental (unreadable files, malformed documents).
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid document {path}: {reason}")]
    InvalidDocument { path: String, reason: String },

    #[error("Invalid schema {path}: {reason}")]
    SchemaParse { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CompileError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CompileError::Validation(_) => 2,
            _ => 1,
        }
    }
}

/// A rule record that violates its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Qualified rule name (`category/rule_name`)
    pub rule: String,
    /// Every failure found in the record
    pub errors: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed for {}: {}", self.rule, self.errors.join("; "))
    }
}

impl std::error::Error for ValidationError {}
