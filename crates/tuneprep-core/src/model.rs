//! # Model-Load Configuration
//!
//! The input contract of the model-loading collaborator. Loading itself is
//! performed by an external training framework; this module only checks and
//! normalizes the request that will be handed to it.
//!
//! GPU memory utilization must lie in the open interval (0, 1). Out-of-range
//! values are replaced by [`DEFAULT_GPU_MEMORY_UTILIZATION`]; values above
//! [`UNSTABLE_GPU_MEMORY_UTILIZATION`] are kept but flagged.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PrepError;

/// Utilization used when the requested value is outside (0, 1).
pub const DEFAULT_GPU_MEMORY_UTILIZATION: f64 = 0.5;

/// Utilization above which loads are flagged as potentially unstable.
pub const UNSTABLE_GPU_MEMORY_UTILIZATION: f64 = 0.85;

/// Tensor data type requested for the loaded weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// IEEE half precision.
    Float16,
    /// Brain floating point.
    Bfloat16,
    /// Single precision.
    Float32,
}

impl DataType {
    /// Returns the canonical identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Float16 => "float16",
            Self::Bfloat16 => "bfloat16",
            Self::Float32 => "float32",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = PrepError;

    /// Accepts the canonical names and the short `fp16`/`bf16`/`fp32` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float16" | "fp16" => Ok(Self::Float16),
            "bfloat16" | "bf16" => Ok(Self::Bfloat16),
            "float32" | "fp32" => Ok(Self::Float32),
            other => Err(PrepError::InvalidModelConfig(format!(
                "unknown data type {other:?}; expected float16, bfloat16 or float32"
            ))),
        }
    }
}

/// Non-fatal finding produced while resolving a utilization value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UtilizationNotice {
    /// The requested value was outside (0, 1) and was replaced.
    Clamped {
        /// Value the caller asked for.
        requested: f64,
        /// Which side of the interval it fell on.
        reason: &'static str,
    },
    /// The requested value was kept but may destabilize the device.
    Unstable {
        /// Value the caller asked for.
        requested: f64,
    },
}

impl std::fmt::Display for UtilizationNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clamped { reason, .. } => write!(
                f,
                "GPU memory usage set to {reason}, defaulting to {}%",
                DEFAULT_GPU_MEMORY_UTILIZATION * 100.0
            ),
            Self::Unstable { requested } => write!(
                f,
                "GPU memory usage set to {}%; this may lead to instability or crashes",
                requested * 100.0
            ),
        }
    }
}

/// A GPU memory fraction known to lie in (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct GpuMemoryUtilization(f64);

impl GpuMemoryUtilization {
    /// Resolve a requested fraction, clamping out-of-range values.
    pub fn resolve(requested: f64) -> (Self, Option<UtilizationNotice>) {
        if requested.is_nan() {
            return (
                Self(DEFAULT_GPU_MEMORY_UTILIZATION),
                Some(UtilizationNotice::Clamped {
                    requested,
                    reason: "not a number",
                }),
            );
        }
        if requested <= 0.0 || requested >= 1.0 {
            let reason = if requested <= 0.0 {
                "0% or under"
            } else {
                "100% or over"
            };
            return (
                Self(DEFAULT_GPU_MEMORY_UTILIZATION),
                Some(UtilizationNotice::Clamped { requested, reason }),
            );
        }
        if requested > UNSTABLE_GPU_MEMORY_UTILIZATION {
            return (Self(requested), Some(UtilizationNotice::Unstable { requested }));
        }
        (Self(requested), None)
    }

    /// The resolved fraction.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for GpuMemoryUtilization {
    fn default() -> Self {
        Self(DEFAULT_GPU_MEMORY_UTILIZATION)
    }
}

/// A model-load request as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelLoadConfig {
    /// Model identifier, usually `USER/MODEL`.
    pub model_name: String,
    /// Maximum sequence length in tokens.
    pub max_seq_length: u32,
    /// Weight data type; `None` lets the framework pick.
    #[serde(default)]
    pub dtype: Option<DataType>,
    /// Load weights quantized to 4 bits.
    #[serde(default)]
    pub load_in_4bit: bool,
    /// Load weights quantized to 8 bits.
    #[serde(default)]
    pub load_in_8bit: bool,
    /// Fraction of GPU memory the framework may claim.
    #[serde(default = "default_utilization")]
    pub gpu_memory_utilization: f64,
}

fn default_utilization() -> f64 {
    DEFAULT_GPU_MEMORY_UTILIZATION
}

impl ModelLoadConfig {
    /// A request with default precision, no quantization and 50% utilization.
    pub fn new(model_name: impl Into<String>, max_seq_length: u32) -> Self {
        Self {
            model_name: model_name.into(),
            max_seq_length,
            dtype: None,
            load_in_4bit: false,
            load_in_8bit: false,
            gpu_memory_utilization: DEFAULT_GPU_MEMORY_UTILIZATION,
        }
    }

    /// Check the request and normalize its utilization.
    ///
    /// # Errors
    ///
    /// Returns `PrepError::InvalidModelConfig` for an empty model name, a
    /// zero sequence length, or when both quantization modes are requested.
    pub fn resolve(&self) -> Result<(ResolvedLoadConfig, Vec<UtilizationNotice>), PrepError> {
        if self.model_name.trim().is_empty() {
            return Err(PrepError::InvalidModelConfig(
                "model name must not be empty".to_string(),
            ));
        }
        if self.max_seq_length == 0 {
            return Err(PrepError::InvalidModelConfig(
                "max sequence length must be positive".to_string(),
            ));
        }
        if self.load_in_4bit && self.load_in_8bit {
            return Err(PrepError::InvalidModelConfig(
                "load_in_4bit and load_in_8bit are mutually exclusive".to_string(),
            ));
        }

        let (utilization, notice) = GpuMemoryUtilization::resolve(self.gpu_memory_utilization);

        let resolved = ResolvedLoadConfig {
            model_name: self.model_name.clone(),
            max_seq_length: self.max_seq_length,
            dtype: self.dtype,
            load_in_4bit: self.load_in_4bit,
            load_in_8bit: self.load_in_8bit,
            gpu_memory_utilization: utilization,
        };
        Ok((resolved, notice.into_iter().collect()))
    }
}

/// A request that satisfies the load contract, ready to pass on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLoadConfig {
    /// Model identifier.
    pub model_name: String,
    /// Maximum sequence length in tokens.
    pub max_seq_length: u32,
    /// Weight data type.
    pub dtype: Option<DataType>,
    /// 4-bit quantization.
    pub load_in_4bit: bool,
    /// 8-bit quantization.
    pub load_in_8bit: bool,
    /// Normalized utilization.
    pub gpu_memory_utilization: GpuMemoryUtilization,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utilization_in_range_is_kept() {
        let (u, notice) = GpuMemoryUtilization::resolve(0.6);
        assert_eq!(u.value(), 0.6);
        assert!(notice.is_none());
    }

    #[test]
    fn utilization_at_unstable_threshold_is_silent() {
        let (u, notice) = GpuMemoryUtilization::resolve(0.85);
        assert_eq!(u.value(), 0.85);
        assert!(notice.is_none());
    }

    #[test]
    fn utilization_above_threshold_warns() {
        let (u, notice) = GpuMemoryUtilization::resolve(0.86);
        assert_eq!(u.value(), 0.86);
        assert_eq!(notice, Some(UtilizationNotice::Unstable { requested: 0.86 }));
    }

    #[test]
    fn utilization_zero_and_negative_clamp() {
        for requested in [0.0, -0.2] {
            let (u, notice) = GpuMemoryUtilization::resolve(requested);
            assert_eq!(u.value(), DEFAULT_GPU_MEMORY_UTILIZATION);
            assert!(matches!(
                notice,
                Some(UtilizationNotice::Clamped { reason: "0% or under", .. })
            ));
        }
    }

    #[test]
    fn utilization_one_and_above_clamp() {
        for requested in [1.0, 1.5] {
            let (u, notice) = GpuMemoryUtilization::resolve(requested);
            assert_eq!(u.value(), DEFAULT_GPU_MEMORY_UTILIZATION);
            assert!(matches!(
                notice,
                Some(UtilizationNotice::Clamped { reason: "100% or over", .. })
            ));
        }
    }

    #[test]
    fn utilization_nan_clamps() {
        let (u, notice) = GpuMemoryUtilization::resolve(f64::NAN);
        assert_eq!(u.value(), DEFAULT_GPU_MEMORY_UTILIZATION);
        assert!(matches!(
            notice,
            Some(UtilizationNotice::Clamped { reason: "not a number", .. })
        ));
    }

    #[test]
    fn notice_display() {
        let clamped = UtilizationNotice::Clamped {
            requested: 1.2,
            reason: "100% or over",
        };
        assert_eq!(
            clamped.to_string(),
            "GPU memory usage set to 100% or over, defaulting to 50%"
        );
        let unstable = UtilizationNotice::Unstable { requested: 0.9 };
        assert!(unstable.to_string().contains("instability"));
    }

    #[test]
    fn resolve_defaults() {
        let cfg = ModelLoadConfig::new("unsloth/llama-3-8b", 2048);
        let (resolved, notices) = cfg.resolve().unwrap();
        assert!(notices.is_empty());
        assert_eq!(resolved.gpu_memory_utilization.value(), 0.5);
        assert_eq!(resolved.max_seq_length, 2048);
        assert!(resolved.dtype.is_none());
    }

    #[test]
    fn resolve_reports_clamp_notice() {
        let mut cfg = ModelLoadConfig::new("unsloth/llama-3-8b", 2048);
        cfg.gpu_memory_utilization = 0.0;
        let (resolved, notices) = cfg.resolve().unwrap();
        assert_eq!(resolved.gpu_memory_utilization.value(), 0.5);
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn resolve_rejects_bad_requests() {
        let empty = ModelLoadConfig::new("  ", 2048);
        assert!(matches!(empty.resolve(), Err(PrepError::InvalidModelConfig(_))));

        let zero = ModelLoadConfig::new("m", 0);
        assert!(matches!(zero.resolve(), Err(PrepError::InvalidModelConfig(_))));

        let mut both = ModelLoadConfig::new("m", 512);
        both.load_in_4bit = true;
        both.load_in_8bit = true;
        assert!(matches!(both.resolve(), Err(PrepError::InvalidModelConfig(_))));
    }

    #[test]
    fn data_type_aliases() {
        assert_eq!("bf16".parse::<DataType>().unwrap(), DataType::Bfloat16);
        assert_eq!("float16".parse::<DataType>().unwrap(), DataType::Float16);
        assert_eq!("fp32".parse::<DataType>().unwrap(), DataType::Float32);
        assert!("int8".parse::<DataType>().is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: ModelLoadConfig =
            serde_json::from_str(r#"{"model_name":"m","max_seq_length":128,"dtype":"bfloat16"}"#)
                .unwrap();
        assert_eq!(cfg.dtype, Some(DataType::Bfloat16));
        assert_eq!(cfg.gpu_memory_utilization, DEFAULT_GPU_MEMORY_UTILIZATION);
        assert!(!cfg.load_in_4bit);
    }

    #[test]
    fn resolved_serializes_utilization_as_number() {
        let (resolved, _) = ModelLoadConfig::new("m", 64).resolve().unwrap();
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["gpu_memory_utilization"], serde_json::json!(0.5));
        assert_eq!(json["dtype"], serde_json::Value::Null);
    }
}
