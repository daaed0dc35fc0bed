//! # Schema Registry
//!
//! The field table for each training-input [`Architecture`].
//!
//! ## Built-in Table
//!
//! | Architecture | Field | Accepted kinds |
//! |--------------|-------|----------------|
//! | `unsloth` | instruction, input, output | string |
//! | `hf-causal` | text | string |
//! | `hf-instruct` | instruction, input, output | string |
//! | `hf-class` | text | string |
//! | `hf-class` | label | string, integer |
//! | `hf-question` | context, question, answer | string |
//!
//! ## Registry Files
//!
//! A YAML or JSON file can replace the field table of any of the five
//! architectures. Architectures the file does not mention keep their
//! built-in table. Files are checked against the embedded
//! `registry.schema.json` (JSON Schema draft 2020-12) before they are
//! interpreted, and every violation is reported with its instance path.
//!
//! ```yaml
//! schemas:
//!   hf-class:
//!     text: [string]
//!     label: [string, integer, boolean]
//! ```

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;
use tuneprep_core::{Architecture, JsonKind, PrepError};

/// JSON Schema that every registry file must satisfy.
pub const REGISTRY_SCHEMA: &str = include_str!("../schemas/registry.schema.json");

/// One field a schema recognizes, with the value kinds it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as it appears in a record.
    pub name: String,
    /// Kinds a value of this field may have.
    pub accepted: Vec<JsonKind>,
}

impl FieldSpec {
    /// Build a field spec.
    pub fn new(name: impl Into<String>, accepted: &[JsonKind]) -> Self {
        Self {
            name: name.into(),
            accepted: accepted.to_vec(),
        }
    }

    /// Returns true if a value of `kind` is acceptable for this field.
    pub fn accepts(&self, kind: JsonKind) -> bool {
        self.accepted.contains(&kind)
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<&str> = self.accepted.iter().map(JsonKind::as_str).collect();
        write!(f, "{}: {}", self.name, kinds.join(" | "))
    }
}

/// The field table for one architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    architecture: Architecture,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Build a schema from an explicit field list.
    pub fn new(architecture: Architecture, fields: Vec<FieldSpec>) -> Self {
        Self {
            architecture,
            fields,
        }
    }

    /// The built-in field table for `architecture`.
    pub fn builtin(architecture: Architecture) -> Self {
        const TEXT: &[JsonKind] = &[JsonKind::String];

        let fields = match architecture {
            Architecture::Unsloth | Architecture::HfInstruct => vec![
                FieldSpec::new("instruction", TEXT),
                FieldSpec::new("input", TEXT),
                FieldSpec::new("output", TEXT),
            ],
            Architecture::HfCausal => vec![FieldSpec::new("text", TEXT)],
            Architecture::HfClass => vec![
                FieldSpec::new("text", TEXT),
                FieldSpec::new("label", &[JsonKind::String, JsonKind::Integer]),
            ],
            Architecture::HfQuestion => vec![
                FieldSpec::new("context", TEXT),
                FieldSpec::new("question", TEXT),
                FieldSpec::new("answer", TEXT),
            ],
        };
        Self::new(architecture, fields)
    }

    /// The architecture this schema belongs to.
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Recognized fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a recognized field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A single registry-file violation.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the file.
    pub instance_path: String,
    /// JSON Pointer path within the registry schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// The five schemas in effect for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    /// Indexed by [`slot`]; always holds exactly one schema per architecture.
    schemas: Vec<Schema>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SchemaRegistry {
    /// The compile-time table.
    pub fn builtin() -> Self {
        Self {
            schemas: Architecture::all().iter().copied().map(Schema::builtin).collect(),
        }
    }

    /// Load a registry file and overlay it on the built-in table.
    ///
    /// Files ending in `.yaml`/`.yml` are read as YAML, everything else as
    /// JSON.
    ///
    /// # Errors
    ///
    /// Returns `PrepError::RegistryLoad` if the file cannot be read or
    /// parsed, or does not satisfy [`REGISTRY_SCHEMA`].
    pub fn from_file(path: &Path) -> Result<Self, PrepError> {
        let load_error = |reason: String| PrepError::RegistryLoad {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| load_error(format!("cannot read file: {e}")))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let document: Value = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| load_error(format!("invalid YAML: {e}")))?,
            _ => serde_json::from_str(&content)
                .map_err(|e| load_error(format!("invalid JSON: {e}")))?,
        };

        Self::from_value(&document).map_err(|e| match e {
            PrepError::RegistryLoad { reason, .. } => load_error(reason),
            other => other,
        })
    }

    /// Interpret an already-parsed registry document.
    ///
    /// # Errors
    ///
    /// Returns `PrepError::RegistryLoad` (with an empty path) listing every
    /// violation of [`REGISTRY_SCHEMA`].
    pub fn from_value(document: &Value) -> Result<Self, PrepError> {
        let violations = check_registry_document(document)?;
        if !violations.is_empty() {
            let listed: Vec<String> = violations.iter().map(Violation::to_string).collect();
            return Err(PrepError::RegistryLoad {
                path: String::new(),
                reason: format!(
                    "{} violation(s) of registry schema:\n  {}",
                    violations.len(),
                    listed.join("\n  ")
                ),
            });
        }

        let mut registry = Self::builtin();
        let Some(schemas) = document.get("schemas").and_then(Value::as_object) else {
            return Ok(registry);
        };

        for (name, table) in schemas {
            let architecture: Architecture = name.parse()?;
            let mut fields = Vec::new();
            if let Some(table) = table.as_object() {
                for (field, kinds) in table {
                    let accepted: Vec<JsonKind> = serde_json::from_value(kinds.clone())
                        .map_err(|e| PrepError::RegistryLoad {
                            path: String::new(),
                            reason: format!("field {field:?} of {name}: {e}"),
                        })?;
                    fields.push(FieldSpec {
                        name: field.clone(),
                        accepted,
                    });
                }
            }
            registry.insert(Schema::new(architecture, fields));
        }
        Ok(registry)
    }

    /// Replace the schema for its architecture.
    pub fn insert(&mut self, schema: Schema) {
        let idx = slot(schema.architecture());
        self.schemas[idx] = schema;
    }

    /// The schema for `architecture`.
    pub fn get(&self, architecture: Architecture) -> &Schema {
        &self.schemas[slot(architecture)]
    }

    /// Look up a schema by architecture name.
    ///
    /// # Errors
    ///
    /// Returns `PrepError::UnknownSchema` if `name` is not one of the five
    /// architecture identifiers.
    pub fn lookup(&self, name: &str) -> Result<&Schema, PrepError> {
        let architecture: Architecture = name.parse()?;
        Ok(self.get(architecture))
    }

    /// All schemas in canonical architecture order.
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.iter()
    }
}

fn slot(architecture: Architecture) -> usize {
    match architecture {
        Architecture::Unsloth => 0,
        Architecture::HfCausal => 1,
        Architecture::HfInstruct => 2,
        Architecture::HfClass => 3,
        Architecture::HfQuestion => 4,
    }
}

static REGISTRY_VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();

/// The compiled registry schema, built on first use.
fn registry_validator() -> Result<&'static Validator, PrepError> {
    REGISTRY_VALIDATOR
        .get_or_init(compile_registry_schema)
        .as_ref()
        .map_err(|reason| PrepError::Serialization(reason.clone()))
}

fn compile_registry_schema() -> Result<Validator, String> {
    let schema: Value = serde_json::from_str(REGISTRY_SCHEMA)
        .map_err(|e| format!("embedded registry schema is not JSON: {e}"))?;
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.build(&schema)
        .map_err(|e| format!("embedded registry schema does not compile: {e}"))
}

/// Check a registry document against [`REGISTRY_SCHEMA`].
///
/// Returns the violations found; an empty list means the document is valid.
///
/// # Errors
///
/// Returns `PrepError::Serialization` only if the embedded schema itself
/// fails to compile.
pub fn check_registry_document(document: &Value) -> Result<Vec<Violation>, PrepError> {
    let validator = registry_validator()?;
    Ok(validator
        .iter_errors(document)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect())
}
