//! # Schemas Subcommand
//!
//! Prints the schema table in effect, after any registry file overrides.

use anyhow::Result;
use clap::Args;

use tuneprep_schema::{Schema, SchemaRegistry};

/// Arguments for the `tuneprep schemas` subcommand.
#[derive(Args, Debug)]
pub struct SchemasArgs {
    /// Show only this architecture.
    #[arg(long, short)]
    pub architecture: Option<String>,
}

/// Execute the schemas subcommand.
pub fn run_schemas(args: &SchemasArgs, registry: &SchemaRegistry) -> Result<u8> {
    match args.architecture {
        Some(ref name) => print!("{}", render_schema(registry.lookup(name)?)),
        None => {
            for schema in registry.iter() {
                print!("{}", render_schema(schema));
            }
        }
    }
    Ok(0)
}

fn render_schema(schema: &Schema) -> String {
    let mut out = format!("{}\n", schema.architecture());
    for field in schema.fields() {
        out.push_str(&format!("  {field}\n"));
    }
    out
}
