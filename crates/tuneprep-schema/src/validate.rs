//! # Record Validation
//!
//! Filters records down to those whose shape matches an architecture's
//! schema.
//!
//! ## Acceptance Rule
//!
//! A record's fields are checked in order. Checking stops at the first field
//! that the schema does not recognize or whose value kind the schema does not
//! accept. The record is kept only if every field passed.
//!
//! Consequences worth knowing:
//!
//! - A record with *fewer* fields than the schema is kept
//!   (`{"instruction": "x"}` passes `unsloth`).
//! - A record with an *extra* field is dropped, even if every schema field
//!   is present and well-typed.
//! - The empty object has nothing to fail and is kept.
//! - Anything that is not a JSON object is dropped.
//!
//! Inputs are never modified; accepted records are cloned into a new list in
//! their original relative order.

use std::fmt;

use serde_json::Value;
use tuneprep_core::{Architecture, JsonKind, PrepError};

use crate::registry::{Schema, SchemaRegistry};

/// Why a record was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRejection {
    /// The record is not a JSON object.
    NotAnObject {
        /// Kind of the value that was found instead.
        actual: JsonKind,
    },
    /// The record has a field the schema does not recognize.
    UnknownField {
        /// The unrecognized field name.
        field: String,
    },
    /// A recognized field holds a value of an unaccepted kind.
    KindMismatch {
        /// The field name.
        field: String,
        /// Kinds the schema accepts for this field.
        expected: Vec<JsonKind>,
        /// Kind that was found.
        actual: JsonKind,
    },
}

impl fmt::Display for RecordRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject { actual } => write!(f, "record is {actual}, not an object"),
            Self::UnknownField { field } => write!(f, "unrecognized field {field:?}"),
            Self::KindMismatch {
                field,
                expected,
                actual,
            } => {
                let expected: Vec<&str> = expected.iter().map(JsonKind::as_str).collect();
                write!(
                    f,
                    "field {field:?} is {actual}, expected {}",
                    expected.join(" or ")
                )
            }
        }
    }
}

impl Schema {
    /// Check one record against this schema.
    ///
    /// # Errors
    ///
    /// Returns the first reason the record cannot be kept.
    pub fn check(&self, record: &Value) -> Result<(), RecordRejection> {
        let Value::Object(fields) = record else {
            return Err(RecordRejection::NotAnObject {
                actual: JsonKind::of(record),
            });
        };

        for (name, value) in fields {
            let Some(spec) = self.field(name) else {
                return Err(RecordRejection::UnknownField {
                    field: name.clone(),
                });
            };
            let actual = JsonKind::of(value);
            if !spec.accepts(actual) {
                return Err(RecordRejection::KindMismatch {
                    field: name.clone(),
                    expected: spec.accepted.clone(),
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Returns true if [`Schema::check`] would keep the record.
    pub fn accepts(&self, record: &Value) -> bool {
        self.check(record).is_ok()
    }

    /// The records this schema keeps, in input order.
    pub fn filter(&self, records: &[Value]) -> Vec<Value> {
        records
            .iter()
            .filter(|record| self.accepts(record))
            .cloned()
            .collect()
    }
}

/// Outcome of filtering a record list, with reasons for every drop.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Number of records examined.
    pub total: usize,
    /// Records kept, in input order.
    pub kept: Vec<Value>,
    /// Input index and reason for every dropped record, in input order.
    pub rejected: Vec<(usize, RecordRejection)>,
}

impl ValidationReport {
    /// Number of records kept.
    pub fn passed(&self) -> usize {
        self.kept.len()
    }

    /// Number of records dropped.
    pub fn failed(&self) -> usize {
        self.rejected.len()
    }
}

impl SchemaRegistry {
    /// Filter `records` against the schema for `architecture`.
    pub fn validate(&self, records: &[Value], architecture: Architecture) -> Vec<Value> {
        self.get(architecture).filter(records)
    }

    /// Filter `records` and explain every record that was dropped.
    pub fn validate_with_report(
        &self,
        records: &[Value],
        architecture: Architecture,
    ) -> ValidationReport {
        let schema = self.get(architecture);
        let mut report = ValidationReport {
            total: records.len(),
            ..ValidationReport::default()
        };
        for (index, record) in records.iter().enumerate() {
            match schema.check(record) {
                Ok(()) => report.kept.push(record.clone()),
                Err(reason) => report.rejected.push((index, reason)),
            }
        }
        report
    }
}

/// Filter `records` against the built-in schema named `architecture`.
///
/// # Errors
///
/// Returns `PrepError::UnknownSchema` if `architecture` is not one of the
/// five registered names.
pub fn validate_json_data(records: &[Value], architecture: &str) -> Result<Vec<Value>, PrepError> {
    let architecture: Architecture = architecture.parse()?;
    Ok(SchemaRegistry::builtin().validate(records, architecture))
}
