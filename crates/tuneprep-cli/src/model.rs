//! # Model-Config Subcommand
//!
//! Checks a model-load request against the load contract and prints the
//! normalized request as JSON, ready for the training framework.

use anyhow::Result;
use clap::Args;

use tuneprep_core::{DataType, ModelLoadConfig, DEFAULT_GPU_MEMORY_UTILIZATION};

/// Arguments for the `tuneprep model-config` subcommand.
#[derive(Args, Debug)]
pub struct ModelConfigArgs {
    /// Model identifier, usually USER/MODEL.
    #[arg(long)]
    pub model: String,

    /// Maximum sequence length in tokens.
    #[arg(long)]
    pub max_seq_length: u32,

    /// Weight data type: float16, bfloat16 or float32 (default: framework choice).
    #[arg(long)]
    pub dtype: Option<DataType>,

    /// Load weights quantized to 4 bits.
    #[arg(long)]
    pub load_in_4bit: bool,

    /// Load weights quantized to 8 bits.
    #[arg(long)]
    pub load_in_8bit: bool,

    /// Fraction of GPU memory to claim, between 0 and 1 exclusive.
    #[arg(long, default_value_t = DEFAULT_GPU_MEMORY_UTILIZATION, allow_negative_numbers = true)]
    pub gpu_memory_utilization: f64,
}

impl ModelConfigArgs {
    fn to_config(&self) -> ModelLoadConfig {
        ModelLoadConfig {
            model_name: self.model.clone(),
            max_seq_length: self.max_seq_length,
            dtype: self.dtype,
            load_in_4bit: self.load_in_4bit,
            load_in_8bit: self.load_in_8bit,
            gpu_memory_utilization: self.gpu_memory_utilization,
        }
    }
}

/// Execute the model-config subcommand.
pub fn run_model_config(args: &ModelConfigArgs) -> Result<u8> {
    let (resolved, notices) = args.to_config().resolve()?;

    for notice in &notices {
        tracing::warn!("{notice}");
    }

    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(0)
}
