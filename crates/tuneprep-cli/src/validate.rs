//! # Validate Subcommand
//!
//! Scans a directory, flattens array payloads into records, and keeps the
//! records that fit the chosen architecture's schema.
//!
//! Dropped records are listed by input index. By default dropping records is
//! not a failure; `--strict` turns any drop into exit code 1.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tuneprep_core::Architecture;
use tuneprep_schema::{flatten_records, read_json_data, SchemaRegistry};

/// Arguments for the `tuneprep validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Root directory to scan recursively.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Target architecture: unsloth, hf-causal, hf-instruct, hf-class, hf-question.
    #[arg(long, short)]
    pub architecture: String,

    /// Write kept records as a JSON array to this file.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with status 1 if any record was dropped.
    #[arg(long)]
    pub strict: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 when `--strict` and records were dropped.
pub fn run_validate(args: &ValidateArgs, registry: &SchemaRegistry) -> Result<u8> {
    let architecture: Architecture = args.architecture.parse()?;

    let payloads = read_json_data(&args.dir)
        .with_context(|| format!("failed to scan {}", args.dir.display()))?;
    let records = flatten_records(payloads);

    tracing::info!(
        records = records.len(),
        architecture = %architecture,
        "validating records"
    );

    let report = registry.validate_with_report(&records, architecture);

    println!(
        "Records: {}/{} passed ({})",
        report.passed(),
        report.total,
        architecture
    );
    for (index, reason) in &report.rejected {
        println!("  REJECT [{index}]: {reason}");
    }

    if let Some(ref output) = args.output {
        crate::write_json_output(output, &report.kept)?;
    }

    if args.strict && report.failed() > 0 {
        tracing::warn!(
            rejected = report.failed(),
            "strict mode: dataset contains records that do not fit the schema"
        );
        return Ok(1);
    }
    Ok(0)
}
