//! Configuration Compile CLI
//!
//! Normalizes and validates a compiler-input tree, then stores the
//! canonical artifact under its SHA-256 digest.
//!
//! stdout: the artifact path, then the digest. Exit status 2 when a rule
//! fails validation, 1 for any other error.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rulecfg::{compile, CompileError, CompilerConfig, SchemaRegistry};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rulecfg-compile")]
#[command(about = "Compile rule configuration into a content-addressed artifact")]
struct Cli {
    /// Compiler-input JSON (as written by rulecfg-export)
    #[arg(short, long = "in")]
    input: PathBuf,

    /// Artifact directory (overrides [output] dir)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Schema root (embedded set when omitted)
    #[arg(short, long)]
    schemas: Option<PathBuf>,

    /// Compiler configuration file (rulecfg.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Re-read the artifact and check its digest after writing
    #[arg(long)]
    verify: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> rulecfg::Result<()> {
    let config = CompilerConfig::load_from(cli.config.as_deref())?;
    let schema_dir = cli.schemas.or(config.schemas.dir);
    let registry = SchemaRegistry::from_dir_or_builtin(schema_dir.as_deref())?;
    let out_dir = cli.out_dir.unwrap_or(config.output.dir);

    let content = fs::read_to_string(&cli.input)?;
    let input: Value = serde_json::from_str(&content)?;

    let artifact = compile(input, &registry, &config.defaults, &out_dir)?;
    if cli.verify && !artifact.verify()? {
        return Err(CompileError::InvalidDocument {
            path: artifact.path.display().to_string(),
            reason: "digest mismatch after write".to_string(),
        });
    }

    println!("{}", artifact.path.display());
    println!("{}", artifact.checksum);
    Ok(())
}
