//! # tuneprep CLI entry point
//!
//! Parses command-line arguments, initializes tracing, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tuneprep_cli::model::{run_model_config, ModelConfigArgs};
use tuneprep_cli::scan::{run_scan, ScanArgs};
use tuneprep_cli::schemas::{run_schemas, SchemasArgs};
use tuneprep_cli::validate::{run_validate, ValidateArgs};

/// tuneprep — fine-tuning dataset preparation.
///
/// Aggregates JSON datasets, filters records against training-input
/// schemas, and checks model-load requests.
#[derive(Parser, Debug)]
#[command(name = "tuneprep", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Schema registry file (YAML or JSON) overriding the built-in table.
    #[arg(long, global = true, env = "TUNEPREP_REGISTRY")]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate every .json-named file under a directory.
    Scan(ScanArgs),

    /// Aggregate, flatten and filter records for an architecture.
    Validate(ValidateArgs),

    /// Show the schema table in effect.
    Schemas(SchemasArgs),

    /// Check a model-load request and print it normalized.
    ModelConfig(ModelConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::debug!("tuneprep v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Scan(args) => run_scan(&args),
        Commands::Validate(args) => tuneprep_cli::load_registry(cli.registry.as_deref())
            .and_then(|registry| run_validate(&args, &registry)),
        Commands::Schemas(args) => tuneprep_cli::load_registry(cli.registry.as_deref())
            .and_then(|registry| run_schemas(&args, &registry)),
        Commands::ModelConfig(args) => run_model_config(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
