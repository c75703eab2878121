//! Diagnostics for statement scanning, building and validation.
//!
//! Every phase reports problems as [`Diagnostic`] values instead of failing
//! on the first one: the scanner and statement assembler accumulate all
//! structural findings of a statement in one pass, the validator and the
//! resolver attach theirs to the statement itself. A [`ParseError`] wraps the
//! structural diagnostics of a statement that could not be built.
//!
//! # Example
//!
//! ```
//! # use bel_parser::error::{Diagnostic, ErrorCode};
//! # use bel_parser::Span;
//! let source = "p(HGNC:AKT1)) increases p(HGNC:EGF)";
//!
//! let diag = Diagnostic::error("missing left parenthesis at 12")
//!     .with_code(ErrorCode::E003)
//!     .with_label(Span::new(12..13), "unmatched `)`");
//!
//! assert_eq!(
//!     diag.caret(source),
//!     "p(HGNC:AKT1)) increases p(HGNC:EGF)\n            ^"
//! );
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::{ErrorLevel, Severity};
