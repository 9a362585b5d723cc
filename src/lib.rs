//! Rule Configuration Compiler
//!
//! Compiles layered rule-engine configuration into a canonical,
//! schema-validated, content-addressed JSON artifact, and generates typed
//! Rust bindings from the same schema set.
//!
//! ## Pipeline
//!
//! ```text
//! .rubocop.yml ──inherit──▶ merged tree ──export──▶ compiler input
//!                                                        │
//!                              schemas/ ──registry──▶ normalize + validate
//!                                  │                       │
//!                                  ▼                       ▼
//!                           codegen (bindings)    <out>/<sha256>.json
//! ```
//!
//! ## Schema Layout
//!
//! ```text
//! schemas/
//! ├── categories/
//! │   └── Layout.json
//! ├── rules/
//! │   └── Layout.LineLength.json
//! └── profiles.json          rule_common, category_common, general_common
//! ```

pub mod canonical;
pub mod checksum;
pub mod codegen;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod inherit;
pub mod names;
pub mod normalize;
pub mod reconcile;
pub mod registry;
pub mod schema;
pub mod validate;

pub use canonical::{encode, write_artifact, Artifact};
pub use checksum::Checksum;
pub use codegen::{generate_rust, BindingSet, GeneratedOutput};
pub use config::{CompilerConfig, DefaultsConfig, ExportConfig};
pub use error::{CompileError, Result, ValidationError};
pub use export::{export, References};
pub use inherit::InheritanceResolver;
pub use normalize::{compile, Normalizer};
pub use registry::{RuleCatalog, SchemaRegistry};
pub use schema::{Schema, SchemaKind};
