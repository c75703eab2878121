//! Error types for specification loading and term lookups.

use std::{io, path::PathBuf};

use thiserror::Error;

/// A fatal problem with the specification set, raised while an engine is
/// being constructed rather than per statement.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("No specification versions are available")]
    NoVersions,

    #[error("No specification version >= {requested} is available (found: {available})")]
    NoCompatibleVersion { requested: String, available: String },

    #[error("Invalid specification version `{0}`")]
    InvalidVersion(String),

    #[error("Specification version {0} is defined more than once")]
    DuplicateVersion(String),

    #[error("Failed to read specification {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode specification {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate {kind} name or abbreviation `{name}`")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Signature {index} of `{function}` references unknown function or category `{name}`")]
    UnknownSignatureFunction {
        function: String,
        index: usize,
        name: String,
    },

    #[error("Signature {index} of `{function}` has an invalid pattern: {source}")]
    InvalidPattern {
        function: String,
        index: usize,
        #[source]
        source: regex::Error,
    },

    #[error("Computed edge rule `{rule}` is invalid: {reason}")]
    InvalidRule { rule: String, reason: String },
}

/// A collaborator failure outside its declared miss/timeout contract.
///
/// Misses and timeouts are not errors; they surface as empty results.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Term lookup for `{term}` failed: {message}")]
    Failed { term: String, message: String },

    #[error("Term lookup worker for `{term}` stopped without answering")]
    Aborted { term: String },
}
