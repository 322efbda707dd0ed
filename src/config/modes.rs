//! Patch mode and failure policy definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the playlist placeholder is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchMode {
    /// Replace every occurrence of the placeholder text (default).
    #[default]
    Literal,
    /// Replace only `<placeholder>.<extension>` file references.
    FileReference,
}

impl fmt::Display for PatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchMode::Literal => write!(f, "literal"),
            PatchMode::FileReference => write!(f, "file-reference"),
        }
    }
}

impl FromStr for PatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "literal" => Ok(PatchMode::Literal),
            "file-reference" | "file_reference" => Ok(PatchMode::FileReference),
            _ => Err(format!("Unknown patch mode: {}", s)),
        }
    }
}

/// What the pipeline does with later stages once a stage has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep running the remaining stages (default).
    #[default]
    Continue,
    /// Skip every stage after the first failure.
    Halt,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => write!(f, "continue"),
            FailurePolicy::Halt => write!(f, "halt"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "halt" => Ok(FailurePolicy::Halt),
            _ => Err(format!("Unknown failure policy: {}", s)),
        }
    }
}
