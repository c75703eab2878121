//! Character-level scanner.
//!
//! One left-to-right pass records every parenthesis pair, the commas that
//! belong directly to each pair, and quoting problems. The pass never stops
//! at the first problem: unmatched parentheses and quotes are reported and
//! recorded, and an open parenthesis left at the end of the text gets the
//! text length as its closing position so incomplete statements can still
//! be assembled.

use log::trace;

use crate::{
    assemble::Assembler,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::Span,
    tokens::{Scan, StatementToken},
};

/// A parenthesis pair found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParenSpan {
    pub open: usize,
    /// Offset of the `)`, or the text length when it is missing.
    pub close: usize,
    pub closed: bool,
    /// Commas directly inside this pair, outside quotes.
    pub commas: Vec<usize>,
    /// Index of the innermost enclosing pair.
    pub parent: Option<usize>,
}

impl ParenSpan {
    /// Exclusive end of the text this pair covers.
    pub fn end(&self) -> usize {
        if self.closed { self.close + 1 } else { self.close }
    }
}

/// Scan statement text into a token tree and its structural diagnostics.
pub fn scan(text: &str) -> Scan {
    let (statement, collector) = scan_statement(text);
    Scan {
        statement,
        diagnostics: collector.into_diagnostics(),
    }
}

/// Scan and assemble, leaving the findings in their collector.
pub(crate) fn scan_statement(text: &str) -> (StatementToken, DiagnosticCollector) {
    let mut collector = DiagnosticCollector::new();
    let parens = scan_parens(text, &mut collector);
    trace!(parens = parens.len(); "Scanned parentheses");

    let statement = Assembler::new(text, &parens, &mut collector).statement();
    (statement, collector)
}

/// Record parenthesis pairs and commas, reporting quote and parenthesis
/// problems along the way.
///
/// Pairs are returned in order of their opening parenthesis. Spans are byte
/// ranges; the positions in messages count characters, as a reader would.
pub(crate) fn scan_parens(text: &str, collector: &mut DiagnosticCollector) -> Vec<ParenSpan> {
    let mut parens: Vec<ParenSpan> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut quote_open: Option<usize> = None;
    let mut escaped = false;

    for (column, (i, c)) in text.char_indices().enumerate() {
        if escaped {
            escaped = false;
            if c == '"' && quote_open.is_none() {
                collector.emit(
                    Diagnostic::error("escaped quote outside quoted string")
                        .with_code(ErrorCode::E002)
                        .with_label(Span::new(i - 1..i + 1), "escaped quote")
                        .with_help("quote the whole value: `\"...\\\"...\"`"),
                );
            }
            continue;
        }

        match c {
            '\\' => escaped = true,
            '"' => {
                quote_open = match quote_open {
                    Some(_) => None,
                    None => Some(i),
                }
            }
            _ if quote_open.is_some() => {}
            '(' => {
                parens.push(ParenSpan {
                    open: i,
                    close: text.len(),
                    closed: false,
                    commas: Vec::new(),
                    parent: stack.last().copied(),
                });
                stack.push(parens.len() - 1);
            }
            ')' => match stack.pop() {
                Some(index) => {
                    parens[index].close = i;
                    parens[index].closed = true;
                }
                None => collector.emit(
                    Diagnostic::error(format!("missing left parenthesis at {column}"))
                        .with_code(ErrorCode::E003)
                        .with_label(Span::new(i..i + 1), "unmatched `)`"),
                ),
            },
            ',' => {
                if let Some(&index) = stack.last() {
                    parens[index].commas.push(i);
                }
            }
            _ => {}
        }
    }

    if let Some(start) = quote_open {
        collector.emit(
            Diagnostic::error("missing right quote")
                .with_code(ErrorCode::E001)
                .with_label(Span::new(start..text.len()), "quoted value is never closed")
                .with_help("add a closing `\"`"),
        );
    }

    for index in stack {
        let open = parens[index].open;
        let column = text[..open].chars().count();
        collector.emit(
            Diagnostic::error(format!("missing right parenthesis at {column}"))
                .with_code(ErrorCode::E004)
                .with_label(Span::new(open..open + 1), "unclosed `(`"),
        );
    }

    parens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parens(text: &str) -> (Vec<ParenSpan>, Vec<Diagnostic>) {
        let mut collector = DiagnosticCollector::new();
        let parens = scan_parens(text, &mut collector);
        (parens, collector.into_diagnostics())
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(Diagnostic::message).collect()
    }

    #[test]
    fn test_nested_pairs_and_commas() {
        let (parens, diagnostics) = parens("complex(p(HGNC:A), p(HGNC:B))");

        assert!(diagnostics.is_empty());
        assert_eq!(parens.len(), 3);
        assert!(parens[0].parent.is_none());
        assert_eq!(parens[0].commas, vec![17]);
        assert_eq!(parens[1].parent, Some(0));
        assert_eq!(parens[2].parent, Some(0));
        assert!(parens.iter().all(|p| p.closed));
    }

    #[test]
    fn test_quoted_text_is_opaque() {
        let (parens, diagnostics) = parens(r#"a(CHEBI:"x, (y)")"#);

        assert!(diagnostics.is_empty());
        assert_eq!(parens.len(), 1);
        assert!(parens[0].commas.is_empty());
    }

    #[test]
    fn test_escaped_quote_inside_quotes_does_not_toggle() {
        let (_, diagnostics) = parens(r#"p(HGNC:"a\"b")"#);

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_escaped_quote_outside_quotes() {
        let (parens, diagnostics) = parens(r#"p(HGNC:a\"b)"#);

        assert_eq!(messages(&diagnostics), ["escaped quote outside quoted string"]);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E002));
        assert!(parens[0].closed);
    }

    #[test]
    fn test_missing_left_parenthesis_position() {
        let text = r#"a(CHEBI:"nitric oxide")) decreases r(HGNC:A)"#;
        let (_, diagnostics) = parens(text);

        assert_eq!(messages(&diagnostics), ["missing left parenthesis at 23"]);
        assert_eq!(diagnostics[0].primary_span(), Some(Span::new(23..24)));
    }

    #[test]
    fn test_missing_right_parenthesis_uses_sentinel() {
        let text = "p(HGNC:AKT1";
        let (parens, diagnostics) = parens(text);

        assert_eq!(messages(&diagnostics), ["missing right parenthesis at 1"]);
        assert!(!parens[0].closed);
        assert_eq!(parens[0].close, text.len());
        assert_eq!(parens[0].end(), text.len());
    }

    #[test]
    fn test_positions_count_characters() {
        let (_, diagnostics) = parens(r#"p(CHEBI:"β-d-glucose"))"#);
        assert_eq!(messages(&diagnostics), ["missing left parenthesis at 22"]);
        assert_eq!(diagnostics[0].primary_span(), Some(Span::new(23..24)));

        let (_, diagnostics) = parens(r#"a(CHEBI:"β") -> p(HGNC:X"#);
        assert_eq!(messages(&diagnostics), ["missing right parenthesis at 17"]);
        assert_eq!(diagnostics[0].primary_span(), Some(Span::new(18..19)));
    }

    #[test]
    fn test_missing_right_quote() {
        let (_, diagnostics) = parens(r#"p(HGNC:"AKT1)"#);

        assert_eq!(
            messages(&diagnostics),
            ["missing right parenthesis at 1", "missing right quote"]
        );
    }

    #[test]
    fn test_all_problems_reported_in_one_pass() {
        let (_, diagnostics) = parens("p(A)) -> p(B)) -> (p(C");

        assert_eq!(
            messages(&diagnostics),
            [
                "missing left parenthesis at 4",
                "missing left parenthesis at 13",
                "missing right parenthesis at 18",
                "missing right parenthesis at 20",
            ]
        );
    }
}
