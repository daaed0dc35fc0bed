//! # JSON Value Kinds
//!
//! Strict classification of `serde_json::Value` used by schema type checks.
//! A boolean is never an integer and a float is never an integer, even when
//! it has no fractional part (`3.0` is a `number`). Integer-ness is read
//! from the number's source text, so `-0` and integers beyond `u64` range
//! stay integers.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::str::FromStr;

use crate::error::PrepError;

/// The kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonKind {
    /// A JSON string.
    String,
    /// A number written without a fraction or exponent.
    Integer,
    /// Any other number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
    /// `null`.
    Null,
}

impl JsonKind {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(n) if is_integer_literal(n) => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
            Value::Null => Self::Null,
        }
    }

    /// Returns the identifier used in registry files and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }
}

fn is_integer_literal(n: &Number) -> bool {
    !n.to_string().contains(|c| matches!(c, '.' | 'e' | 'E'))
}

impl std::fmt::Display for JsonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonKind {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            "null" => Ok(Self::Null),
            other => Err(PrepError::Serialization(format!(
                "unknown value kind: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_are_not_numbers() {
        assert_eq!(JsonKind::of(&json!(3)), JsonKind::Integer);
        assert_eq!(JsonKind::of(&json!(-7)), JsonKind::Integer);
        assert_eq!(JsonKind::of(&json!(u64::MAX)), JsonKind::Integer);
        assert_eq!(JsonKind::of(&json!(3.5)), JsonKind::Number);
    }

    #[test]
    fn integral_float_is_number() {
        let v: Value = serde_json::from_str("3.0").unwrap();
        assert_eq!(JsonKind::of(&v), JsonKind::Number);
    }

    #[test]
    fn negative_zero_is_integer() {
        let v: Value = serde_json::from_str("-0").unwrap();
        assert_eq!(JsonKind::of(&v), JsonKind::Integer);
    }

    #[test]
    fn integer_beyond_u64_is_integer() {
        let v: Value = serde_json::from_str("18446744073709551616").unwrap();
        assert_eq!(JsonKind::of(&v), JsonKind::Integer);
        let v: Value = serde_json::from_str("-99999999999999999999999").unwrap();
        assert_eq!(JsonKind::of(&v), JsonKind::Integer);
    }

    #[test]
    fn exponent_is_number() {
        let v: Value = serde_json::from_str("1e3").unwrap();
        assert_eq!(JsonKind::of(&v), JsonKind::Number);
        let v: Value = serde_json::from_str("2E-1").unwrap();
        assert_eq!(JsonKind::of(&v), JsonKind::Number);
    }

    #[test]
    fn booleans_are_not_integers() {
        assert_eq!(JsonKind::of(&json!(true)), JsonKind::Boolean);
    }

    #[test]
    fn containers_and_null() {
        assert_eq!(JsonKind::of(&json!([])), JsonKind::Array);
        assert_eq!(JsonKind::of(&json!({})), JsonKind::Object);
        assert_eq!(JsonKind::of(&Value::Null), JsonKind::Null);
        assert_eq!(JsonKind::of(&json!("")), JsonKind::String);
    }

    #[test]
    fn parse_matches_serde_names() {
        for kind in [
            JsonKind::String,
            JsonKind::Integer,
            JsonKind::Number,
            JsonKind::Boolean,
            JsonKind::Array,
            JsonKind::Object,
            JsonKind::Null,
        ] {
            assert_eq!(kind.as_str().parse::<JsonKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
        assert!("float".parse::<JsonKind>().is_err());
    }
}
