//! # Architecture — Training-Input Formats
//!
//! Defines the closed set of fine-tuning input formats a dataset can be
//! filtered for. Every `match` on [`Architecture`] is exhaustive, so adding
//! a format forces the schema table to grow with it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PrepError;

/// Target fine-tuning input format.
///
/// | Name | Fields |
/// |------|--------|
/// | `unsloth` | instruction, input, output |
/// | `hf-causal` | text |
/// | `hf-instruct` | instruction, input, output |
/// | `hf-class` | text, label |
/// | `hf-question` | context, question, answer |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Architecture {
    /// Unsloth instruction tuning (Alpaca-style triples).
    Unsloth,
    /// Hugging Face causal language modelling on raw text.
    HfCausal,
    /// Hugging Face instruction tuning.
    HfInstruct,
    /// Hugging Face sequence classification.
    HfClass,
    /// Hugging Face extractive question answering.
    HfQuestion,
}

/// Number of architectures. Used for compile-time assertions.
pub const ARCHITECTURE_COUNT: usize = 5;

impl Architecture {
    /// Returns all architectures in canonical order.
    pub fn all() -> &'static [Architecture] {
        &[
            Self::Unsloth,
            Self::HfCausal,
            Self::HfInstruct,
            Self::HfClass,
            Self::HfQuestion,
        ]
    }

    /// Returns the identifier used on the command line and in registry files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsloth => "unsloth",
            Self::HfCausal => "hf-causal",
            Self::HfInstruct => "hf-instruct",
            Self::HfClass => "hf-class",
            Self::HfQuestion => "hf-question",
        }
    }

    /// Comma-separated list of every identifier, for error messages.
    pub fn expected_names() -> String {
        Self::all()
            .iter()
            .map(Architecture::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = PrepError;

    /// Parse an architecture from its identifier. Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unsloth" => Ok(Self::Unsloth),
            "hf-causal" => Ok(Self::HfCausal),
            "hf-instruct" => Ok(Self::HfInstruct),
            "hf-class" => Ok(Self::HfClass),
            "hf-question" => Ok(Self::HfQuestion),
            other => Err(PrepError::UnknownSchema {
                name: other.to_string(),
                expected: Self::expected_names(),
            }),
        }
    }
}
