//! Binding Generator CLI
//!
//! Generates typed Rust bindings from the rule schema set. With `--check`
//! nothing is written; stale or missing files are printed as unified diffs
//! and the exit status is 1.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rulecfg::{generate_rust, CompilerConfig, SchemaRegistry};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rulecfg-codegen")]
#[command(about = "Generate Rust bindings for compiled rule configuration")]
struct Cli {
    /// Output directory for the generated module tree
    #[arg(short, long, default_value = "generated/rulecfg")]
    out: PathBuf,

    /// Schema root (embedded set when omitted)
    #[arg(short, long)]
    schemas: Option<PathBuf>,

    /// Compiler configuration file (rulecfg.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Compare against the files on disk instead of writing
    #[arg(long)]
    check: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns false when `--check` found drift
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = CompilerConfig::load_from(cli.config.as_deref()).context("loading compiler config")?;
    let schema_dir = cli.schemas.or(config.schemas.dir);
    let registry = SchemaRegistry::from_dir_or_builtin(schema_dir.as_deref())?;

    let output = generate_rust(&registry, &config.defaults);
    for diagnostic in &output.diagnostics {
        eprintln!("⚠️  {}", diagnostic);
    }

    if cli.check {
        let drift = output
            .diff_against(&cli.out)
            .with_context(|| format!("reading {}", cli.out.display()))?;
        if drift.is_empty() {
            println!("✅ Bindings up to date ({} files)", output.files.len());
            return Ok(true);
        }
        for file in &drift {
            print!("{}", file.diff);
        }
        eprintln!("\n❌ {} generated file(s) out of date - run rulecfg-codegen", drift.len());
        return Ok(false);
    }

    let written = output
        .write_to(&cli.out)
        .with_context(|| format!("writing {}", cli.out.display()))?;
    println!(
        "Generated {} types in {} files under {}",
        output.type_count,
        written,
        cli.out.display()
    );
    Ok(true)
}
