//! # tuneprep-schema — Dataset Scanning & Schema Filtering
//!
//! Turns a directory of JSON files into a list of training records that fit
//! one architecture's input format.
//!
//! ## Scanning (`scan`)
//!
//! [`read_json_data`] walks a directory tree and parses every file whose name
//! contains `.json`. Any unreadable file or malformed document aborts the
//! whole scan. [`flatten_records`] expands array payloads into records.
//!
//! ## Registry (`registry`)
//!
//! [`SchemaRegistry`] holds one field table per [`Architecture`]. The
//! built-in table is fixed at compile time; a YAML/JSON registry file,
//! checked against an embedded JSON Schema, can override individual entries.
//!
//! ## Validation (`validate`)
//!
//! [`validate_json_data`] and [`SchemaRegistry::validate`] keep the records
//! whose every field is recognized and well-typed. Missing fields are
//! tolerated; extra fields are not.
//!
//! ## Crate Policy
//!
//! - Depends only on `tuneprep-core` internally.
//! - Pure functions over the filesystem and in-memory values; no logging,
//!   no retries, no shared state between calls.
//!
//! [`Architecture`]: tuneprep_core::Architecture

pub mod registry;
pub mod scan;
pub mod validate;

pub use registry::{
    check_registry_document, FieldSpec, Schema, SchemaRegistry, Violation, REGISTRY_SCHEMA,
};
pub use scan::{
    find_json_files, flatten_records, matches_json_name, read_json_data, scan_json_files,
    ScannedDocument, JSON_NAME_MARKER,
};
pub use validate::{validate_json_data, RecordRejection, ValidationReport};
