//! # Scan Subcommand
//!
//! Aggregates every `.json`-named file under a directory into one JSON array.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use tuneprep_schema::scan_json_files;

/// Arguments for the `tuneprep scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Root directory to scan recursively.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Write the aggregated payloads as a JSON array to this file.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the scan subcommand.
pub fn run_scan(args: &ScanArgs) -> Result<u8> {
    let documents = scan_json_files(&args.dir)
        .with_context(|| format!("failed to scan {}", args.dir.display()))?;

    for doc in &documents {
        tracing::debug!(path = %doc.path.display(), "read document");
    }

    println!(
        "Scanned: {} document(s) under {}",
        documents.len(),
        args.dir.display()
    );

    if let Some(ref output) = args.output {
        let payloads: Vec<Value> = documents.into_iter().map(|doc| doc.payload).collect();
        crate::write_json_output(output, &payloads)?;
    }

    Ok(0)
}
