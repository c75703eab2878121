//! Severity levels for diagnostics.

use std::{fmt, str::FromStr};

/// The severity level of a diagnostic.
///
/// - [`Severity::Error`] marks a statement as invalid
/// - [`Severity::Warning`] is advisory; the statement stays usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Which diagnostics a caller wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorLevel {
    /// Errors only.
    #[default]
    Errors,
    /// Errors and warnings.
    Warnings,
}

impl ErrorLevel {
    /// Whether a diagnostic of the given severity is selected.
    pub fn includes(&self, severity: Severity) -> bool {
        match self {
            ErrorLevel::Errors => severity.is_error(),
            ErrorLevel::Warnings => true,
        }
    }
}

impl FromStr for ErrorLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "errors" | "error" => Ok(ErrorLevel::Errors),
            "warnings" | "warning" => Ok(ErrorLevel::Warnings),
            other => Err(format!("unknown error level `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_level_filters_warnings() {
        assert!(ErrorLevel::Errors.includes(Severity::Error));
        assert!(!ErrorLevel::Errors.includes(Severity::Warning));
        assert!(ErrorLevel::Warnings.includes(Severity::Warning));
    }

    #[test]
    fn test_error_level_from_str() {
        assert_eq!("Warnings".parse(), Ok(ErrorLevel::Warnings));
        assert_eq!("errors".parse(), Ok(ErrorLevel::Errors));
        assert!("all".parse::<ErrorLevel>().is_err());
    }
}
