//! Configuration Export CLI
//!
//! Resolves a layered YAML/JSON configuration (following `inherit_from`)
//! and writes the compiler-input JSON tree.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rulecfg::document::load_document;
use rulecfg::canonical::write_pretty;
use rulecfg::{export, CompilerConfig, InheritanceResolver, References, SchemaRegistry};
use serde_json::Map;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rulecfg-export")]
#[command(about = "Export a layered rule configuration into compiler input")]
struct Cli {
    /// Root configuration document (e.g. .rubocop.yml)
    input: PathBuf,

    /// Output file for the compiler-input tree
    #[arg(short, long, default_value = "rulecfg-input.json")]
    out: PathBuf,

    /// Resolved reference tree, used to decide list-typed keys
    #[arg(long)]
    resolved: Option<PathBuf>,

    /// Default reference tree, used to decide list-typed keys
    #[arg(long)]
    defaults: Option<PathBuf>,

    /// Schema root used to recognise rule names (embedded set when omitted)
    #[arg(short, long)]
    schemas: Option<PathBuf>,

    /// Compiler configuration file (rulecfg.toml)
    #[arg(short, long)]
    config: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CompilerConfig::load_from(cli.config.as_deref()).context("loading compiler config")?;
    let schema_dir = cli.schemas.or(config.schemas.dir);
    let registry = SchemaRegistry::from_dir_or_builtin(schema_dir.as_deref())?;

    let resolver = InheritanceResolver::new(config.export.inherit_key.clone());
    let merged = resolver
        .resolve_file(&cli.input)
        .with_context(|| format!("resolving {}", cli.input.display()))?;

    let resolved = load_reference(cli.resolved)?;
    let defaults = load_reference(cli.defaults)?;
    let references = References {
        resolved: &resolved,
        defaults: &defaults,
    };

    let tree = export(&merged, references, &registry, &config.export);
    write_pretty(&tree, &cli.out)?;

    println!("Wrote {}", cli.out.display());
    Ok(())
}

fn load_reference(path: Option<PathBuf>) -> anyhow::Result<Map<String, serde_json::Value>> {
    match path {
        Some(path) => load_document(&path).with_context(|| format!("reading {}", path.display())),
        None => Ok(Map::new()),
    }
}
