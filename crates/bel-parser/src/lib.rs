//! # BEL Parser
//!
//! Parsing and semantic validation of BEL statements. This crate provides
//! the pipeline from statement text to a typed, validated statement tree:
//!
//! 1. **Scan** - Record parentheses, quotes and commas; assemble the
//!    statement shape and report every structural problem at once
//! 2. **Build** - Resolve function and relation names against the
//!    specification into an arena tree with parent and sibling links
//! 3. **Validate** - Match every function against its signatures and
//!    annotate the tree with slots, entity types and value types
//!
//! Rendering goes the other way, in short, medium or long form.
//!
//! ## Usage
//!
//! ```
//! use bel_core::{SpecificationCatalog, SpecificationDocument};
//! use bel_parser::{Format, parse};
//!
//! let document: SpecificationDocument = serde_json::from_str(r#"{
//!     "version": "2.0.0",
//!     "functions": {"proteinAbundance": {"abbreviation": "p", "kind": "primary"}},
//!     "relations": {"increases": {"abbreviation": "->"}}
//! }"#).unwrap();
//! let spec = SpecificationCatalog::from_documents([document]).unwrap().load("2.0").unwrap();
//!
//! let statement = parse("p(HGNC:AKT1) increases p(HGNC:EGF)", &spec).unwrap();
//! assert_eq!(statement.render(Format::Short), "p(HGNC:AKT1) -> p(HGNC:EGF)");
//! ```

mod assemble;
mod ast;
mod builder;
pub mod error;
mod render;
mod scanner;
mod span;
#[cfg(test)]
mod test_utils;
mod tokens;
mod validate;

pub use ast::{
    FunctionNode, Node, NodeData, NodeId, NsArgNode, Object, Relation, Statement, StrArgNode,
    Triple,
};
pub use error::{Diagnostic, ErrorCode, ErrorLevel, ParseError, Severity};
pub use render::{Format, quote_value};
pub use scanner::scan;
pub use span::{Span, Spanned};
pub use tokens::{ArgToken, FunctionToken, NsArgToken, ObjectToken, Scan, StatementToken, StrArgToken};
pub use validate::{ValidationOptions, validate};

use bel_core::Specification;
use log::debug;

use builder::Builder;

/// Parse statement text into a statement tree.
///
/// Structural problems (quotes, parentheses, statement shape) fail the
/// parse with every finding at once. Unknown function and relation names do
/// not: the statement is built and carries them as error diagnostics, next
/// to whatever [`validate`] adds later.
///
/// # Errors
///
/// Returns a [`ParseError`] with all structural diagnostics, sorted by
/// position.
pub fn parse(text: &str, spec: &Specification) -> Result<Statement, ParseError> {
    // Step 1: Scan
    let (statement, collector) = scanner::scan_statement(text);
    let diagnostics = collector.finish().inspect_err(|err| {
        debug!(diagnostics = err.diagnostics().len(); "Statement rejected by the scanner");
    })?;

    // Step 2: Build
    Builder::new(spec).build(text, statement, diagnostics)
}
