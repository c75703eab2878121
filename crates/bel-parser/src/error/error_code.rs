//! Error codes for BEL diagnostics.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Scanner errors
//! - `E1xx` - Statement assembly errors
//! - `E2xx` - Name resolution errors (statement building)
//! - `E3xx` - Signature validation errors
//! - `W4xx` - Term lookup warnings (validation and namespace resolution)

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Scanner Errors (E0xx)
    // =========================================================================
    /// Missing right quote.
    ///
    /// A quoted value was opened but the statement ended before it closed.
    E001,

    /// Escaped quote outside a quoted string.
    ///
    /// `\"` only has a meaning inside a quoted value.
    E002,

    /// Missing left parenthesis.
    ///
    /// A `)` has no matching `(`.
    E003,

    /// Missing right parenthesis.
    ///
    /// A `(` is still open at the end of the statement.
    E004,

    // =========================================================================
    // Statement Assembly Errors (E1xx)
    // =========================================================================
    /// Unexpected text.
    ///
    /// Text appears where the statement grammar allows none, e.g. after the
    /// object or between two arguments.
    E100,

    /// Incomplete statement.
    ///
    /// A relation without an object, an object without a relation, an empty
    /// argument, or a nested statement without both.
    E101,

    /// Statement does not start with a function.
    ///
    /// The subject must be a function; a nested statement is only allowed
    /// as the object.
    E102,

    // =========================================================================
    // Name Resolution Errors (E2xx)
    // =========================================================================
    /// Unknown function.
    E200,

    /// Unknown relation.
    E201,

    // =========================================================================
    // Validation Errors (E3xx)
    // =========================================================================
    /// Missing required argument.
    E300,

    /// Disallowed extra argument.
    ///
    /// An argument fits no remaining slot of any signature.
    E301,

    /// Wrong positional argument.
    ///
    /// The argument at a required position is of the wrong kind.
    E302,

    /// Entity type mismatch.
    ///
    /// The namespace term's entity types are not accepted by the slot.
    E303,

    /// Unresolved literal.
    ///
    /// A string argument is neither a listed value nor matches the slot's
    /// pattern.
    E304,

    /// Unresolved entity type.
    ///
    /// Strict validation could not determine the entity types of a term.
    E305,

    /// Function not allowed here.
    ///
    /// No signature of the function applies under its closest primary
    /// ancestor (e.g. a protein modification outside a protein).
    E306,

    // =========================================================================
    // Lookup Warnings (W4xx)
    // =========================================================================
    /// No ortholog found.
    W400,

    /// No target species.
    W401,

    /// Unresolved entity types.
    ///
    /// The entity-type lookup had no answer for a term (unknown or timed
    /// out); the term is accepted by any namespace slot.
    W402,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Scanner errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            // Assembly errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            // Name resolution errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            // Validation errors
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E304 => "E304",
            ErrorCode::E305 => "E305",
            ErrorCode::E306 => "E306",
            // Lookup warnings
            ErrorCode::W400 => "W400",
            ErrorCode::W401 => "W401",
            ErrorCode::W402 => "W402",
        }
    }

    /// Whether semantic validation owns diagnostics with this code.
    ///
    /// These are dropped and recomputed each time a statement is validated.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorCode::E300
                | ErrorCode::E301
                | ErrorCode::E302
                | ErrorCode::E303
                | ErrorCode::E304
                | ErrorCode::E305
                | ErrorCode::E306
                | ErrorCode::W402
        )
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "missing right quote",
            ErrorCode::E002 => "escaped quote outside quoted string",
            ErrorCode::E003 => "missing left parenthesis",
            ErrorCode::E004 => "missing right parenthesis",
            ErrorCode::E100 => "unexpected text",
            ErrorCode::E101 => "incomplete statement",
            ErrorCode::E102 => "statement must start with a function",
            ErrorCode::E200 => "unknown function",
            ErrorCode::E201 => "unknown relation",
            ErrorCode::E300 => "missing required argument",
            ErrorCode::E301 => "disallowed extra argument",
            ErrorCode::E302 => "wrong positional argument",
            ErrorCode::E303 => "entity type mismatch",
            ErrorCode::E304 => "unresolved literal",
            ErrorCode::E305 => "unresolved entity type",
            ErrorCode::E306 => "function not allowed here",
            ErrorCode::W400 => "no ortholog found",
            ErrorCode::W401 => "no target species",
            ErrorCode::W402 => "unresolved entity types",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
