//! # Error Types
//!
//! Defines the single error type shared by every tuneprep crate. All
//! variants use `thiserror` for derive-based `Display` and `Error`.
//!
//! ## Design
//!
//! - Scan failures carry the offending path and are fatal for the whole scan.
//! - Unknown architecture names list the accepted names.
//! - No variant is recoverable mid-operation; callers decide how to report.

use thiserror::Error;

/// Top-level error type for tuneprep.
#[derive(Error, Debug)]
pub enum PrepError {
    /// A directory could not be listed, or a matching file could not be
    /// read or parsed as JSON. The scan that produced this returns nothing.
    #[error("scan failure at '{path}': {reason}")]
    ScanFailure {
        /// File or directory that caused the failure.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// The requested architecture has no registered schema.
    #[error("unknown schema {name:?}; expected one of: {expected}")]
    UnknownSchema {
        /// The name that was looked up.
        name: String,
        /// Comma-separated list of registered names.
        expected: String,
    },

    /// A schema registry file could not be loaded or failed validation.
    #[error("registry load error for '{path}': {reason}")]
    RegistryLoad {
        /// Path to the registry file.
        path: String,
        /// Reason the file was rejected.
        reason: String,
    },

    /// A model-load request violated its input contract.
    #[error("invalid model configuration: {0}")]
    InvalidModelConfig(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error outside of a scan.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
