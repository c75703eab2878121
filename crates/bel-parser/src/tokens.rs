//! The positional token tree produced by [`scan`](crate::scan).
//!
//! Tokens carry the text as written and the spans it came from. Names are
//! not resolved against a specification yet; that happens when the tree is
//! built into a [`Statement`](crate::ast::Statement).

use crate::{
    error::Diagnostic,
    span::{Span, Spanned},
};

/// A function call `name(args...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionToken {
    pub name: Spanned<String>,
    pub args: Vec<ArgToken>,
    /// From the start of the name to the closing parenthesis, or to the end
    /// of the text when the parenthesis is missing.
    pub span: Span,
    /// `false` when the closing parenthesis is missing.
    pub closed: bool,
}

/// A namespace-qualified term `NS:value`.
#[derive(Debug, Clone, PartialEq)]
pub struct NsArgToken {
    pub namespace: Spanned<String>,
    /// Unquoted and unescaped.
    pub value: Spanned<String>,
    pub span: Span,
}

/// Any other argument, unquoted and unescaped.
#[derive(Debug, Clone, PartialEq)]
pub struct StrArgToken {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgToken {
    Function(FunctionToken),
    NsArg(NsArgToken),
    StrArg(StrArgToken),
}

impl ArgToken {
    pub fn span(&self) -> Span {
        match self {
            ArgToken::Function(function) => function.span,
            ArgToken::NsArg(ns_arg) => ns_arg.span,
            ArgToken::StrArg(str_arg) => str_arg.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectToken {
    Function(FunctionToken),
    /// A parenthesised statement; the span covers the parentheses.
    Statement(Box<StatementToken>, Span),
}

/// `subject (relation object)?`, possibly incomplete.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementToken {
    pub subject: Option<FunctionToken>,
    pub relation: Option<Spanned<String>>,
    pub object: Option<ObjectToken>,
}

/// The result of scanning a statement.
///
/// Always returned, even for broken input, so completion tooling can work
/// on partial statements. `diagnostics` holds every structural finding in
/// text order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    pub statement: StatementToken,
    pub diagnostics: Vec<Diagnostic>,
}

impl Scan {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity().is_error())
    }

    /// Every function token in pre-order: subject tree first, then the
    /// object tree.
    pub fn functions(&self) -> Vec<&FunctionToken> {
        let mut functions = Vec::new();
        collect_statement(&self.statement, &mut functions);
        functions
    }
}

fn collect_statement<'a>(statement: &'a StatementToken, out: &mut Vec<&'a FunctionToken>) {
    if let Some(subject) = &statement.subject {
        collect_function(subject, out);
    }
    match &statement.object {
        Some(ObjectToken::Function(object)) => collect_function(object, out),
        Some(ObjectToken::Statement(nested, _)) => collect_statement(nested, out),
        None => {}
    }
}

fn collect_function<'a>(function: &'a FunctionToken, out: &mut Vec<&'a FunctionToken>) {
    out.push(function);
    for arg in &function.args {
        if let ArgToken::Function(child) = arg {
            collect_function(child, out);
        }
    }
}
