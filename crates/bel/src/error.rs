//! Error types for BEL engine operations.
//!
//! This module provides the main error type [`BelError`] which wraps the
//! hard failures of the pipeline. Findings about a statement itself
//! (unknown functions, signature mismatches, lookup misses) are not errors
//! here; they are diagnostics attached to the statement.

use std::{io, path::PathBuf};

use thiserror::Error;

use bel_core::{ConfigurationError, LookupError};
use bel_parser::ParseError;

/// The main error type for BEL engine operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant contains structured diagnostics with source spans and
/// keeps the statement text, so callers can render carets under the
/// offending columns.
#[derive(Debug, Error)]
pub enum BelError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to decode term table {}: {source}", path.display())]
    Terms {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl BelError {
    /// Create a new `Parse` error with the associated statement text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
