//! # tuneprep-cli — Dataset Preparation CLI
//!
//! Provides the `tuneprep` command-line interface.
//!
//! ## Subcommands
//!
//! - `tuneprep scan` — Aggregate every `.json`-named file under a directory.
//! - `tuneprep validate` — Aggregate, flatten and filter for an architecture.
//! - `tuneprep schemas` — Show the schema table in effect.
//! - `tuneprep model-config` — Check a model-load request.
//!
//! ```bash
//! tuneprep validate data/ --architecture unsloth --output train.json
//! tuneprep --registry registry.yaml schemas
//! tuneprep model-config --model unsloth/llama-3-8b --max-seq-length 2048
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the domain crates.
//! - Handlers return an exit code: 0 on success, 1 on failure.

pub mod model;
pub mod scan;
pub mod schemas;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tuneprep_schema::SchemaRegistry;

/// Load the registry file if one was given, otherwise the built-in table.
pub fn load_registry(path: Option<&Path>) -> Result<SchemaRegistry> {
    match path {
        Some(path) => {
            let registry = SchemaRegistry::from_file(path)
                .with_context(|| format!("failed to load registry {}", path.display()))?;
            tracing::info!(registry = %path.display(), "loaded schema registry file");
            Ok(registry)
        }
        None => Ok(SchemaRegistry::builtin()),
    }
}

/// Write `value` as pretty-printed JSON to `path`.
pub fn write_json_output<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(output = %path.display(), "wrote output file");
    Ok(())
}
