//! # tuneprep-core — Foundational Types
//!
//! Shared vocabulary for the tuneprep workspace. Every other crate depends
//! on `tuneprep-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed architecture set.** [`Architecture`] is a five-variant enum.
//!    Schema lookup is an exhaustive `match`, not a string-keyed map.
//!
//! 2. **Strict value kinds.** [`JsonKind`] never treats a boolean or a float
//!    as an integer.
//!
//! 3. **One error type.** [`PrepError`] covers scanning, schema lookup,
//!    registry loading and model-load contract violations.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tuneprep-*` crates.
//! - No `.unwrap()` outside tests.
//! - No logging; callers decide how to report.

pub mod architecture;
pub mod error;
pub mod kind;
pub mod model;

pub use architecture::{Architecture, ARCHITECTURE_COUNT};
pub use error::PrepError;
pub use kind::JsonKind;
pub use model::{
    DataType, GpuMemoryUtilization, ModelLoadConfig, ResolvedLoadConfig, UtilizationNotice,
    DEFAULT_GPU_MEMORY_UTILIZATION, UNSTABLE_GPU_MEMORY_UTILIZATION,
};
