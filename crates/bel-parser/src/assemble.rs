//! Statement assembly over the scanned parenthesis pairs.
//!
//! Function names are recovered by scanning back from each `(` to the
//! nearest space, comma or `(`. Argument text is split on the commas the
//! scanner recorded for the pair and classified with small winnow parsers:
//! `ident(` is a nested function, `PREFIX:value` a namespace term, anything
//! else a string literal.

use std::ops::Range;

use winnow::{
    Parser as _,
    combinator::terminated,
    error::ModalResult,
    token::{one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    scanner::ParenSpan,
    span::{Span, Spanned},
    tokens::{ArgToken, FunctionToken, NsArgToken, ObjectToken, StatementToken, StrArgToken},
};

fn identifier<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic()),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// `name(`, yielding the name.
fn function_head<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    terminated(identifier, '(').parse_next(input)
}

/// `PREFIX:`, yielding the prefix.
fn namespace_prefix<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    terminated(
        (
            one_of(|c: char| c.is_ascii_uppercase()),
            take_while(0.., |c: char| {
                c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
            }),
        )
            .take(),
        ':',
    )
    .parse_next(input)
}

/// Whether argument text would be read as a nested function.
pub(crate) fn is_function_head(text: &str) -> bool {
    let mut input = text;
    function_head.parse_next(&mut input).is_ok()
}

/// Split argument text into namespace prefix and raw value.
pub(crate) fn split_namespace(text: &str) -> Option<(&str, &str)> {
    let mut input = text;
    let prefix = namespace_prefix.parse_next(&mut input).ok()?;
    Some((prefix, input))
}

/// Strip surrounding double quotes and resolve the backslash escapes
/// inside them. Unquoted text is returned as written.
pub(crate) fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(chars.next().unwrap_or('\\')),
            _ => value.push(c),
        }
    }
    value
}

pub(crate) struct Assembler<'a> {
    text: &'a str,
    parens: &'a [ParenSpan],
    /// Child pair indices per pair.
    children: Vec<Vec<usize>>,
    top: Vec<usize>,
    collector: &'a mut DiagnosticCollector,
}

impl<'a> Assembler<'a> {
    pub fn new(
        text: &'a str,
        parens: &'a [ParenSpan],
        collector: &'a mut DiagnosticCollector,
    ) -> Self {
        let mut children = vec![Vec::new(); parens.len()];
        let mut top = Vec::new();
        for (index, paren) in parens.iter().enumerate() {
            match paren.parent {
                Some(parent) => children[parent].push(index),
                None => top.push(index),
            }
        }

        Self {
            text,
            parens,
            children,
            top,
            collector,
        }
    }

    /// Assemble the whole text as one statement.
    pub fn statement(mut self) -> StatementToken {
        let top = std::mem::take(&mut self.top);
        self.assemble_statement(0..self.text.len(), &top)
    }

    fn assemble_statement(&mut self, range: Range<usize>, groups: &[usize]) -> StatementToken {
        let mut statement = StatementToken::default();

        let Some((&first, rest)) = groups.split_first() else {
            let trimmed = self.trim(range.clone());
            if trimmed.is_empty() {
                self.collector.emit(
                    Diagnostic::error("empty statement")
                        .with_code(ErrorCode::E101)
                        .with_label(Span::at(range.start), "expected a function"),
                );
            } else {
                self.collector.emit(
                    Diagnostic::error("statement must start with a function")
                        .with_code(ErrorCode::E102)
                        .with_label(Span::new(trimmed), "not a function"),
                );
            }
            return statement;
        };

        let parens = self.parens;
        let subject_paren = &parens[first];
        let name_start = self.name_start(subject_paren.open, range.start);
        self.unexpected(range.start..name_start, "unexpected text before the subject");

        if name_start == subject_paren.open {
            self.collector.emit(
                Diagnostic::error("statement must start with a function")
                    .with_code(ErrorCode::E102)
                    .with_label(
                        Span::new(subject_paren.open..subject_paren.end()),
                        "nested statement as subject",
                    )
                    .with_help("a nested statement is only allowed as the object"),
            );
            return statement;
        }

        let subject = self.function(first, name_start);
        let mut cursor = subject.span.end().min(range.end);
        statement.subject = Some(subject);

        let next = rest
            .first()
            .map(|&index| (index, self.name_start(parens[index].open, cursor)));
        let gap_end = next.map_or(range.end, |(_, start)| start);

        let mut words = self.words(cursor..gap_end).into_iter();
        let relation = words.next();
        if let Some(extra) = words.next() {
            let end = words.last().map_or(extra.span().end(), |w| w.span().end());
            self.collector.emit(
                Diagnostic::error("unexpected text after the relation")
                    .with_code(ErrorCode::E100)
                    .with_label(Span::new(extra.span().start()..end), "unexpected"),
            );
        }

        match (&relation, next) {
            (None, None) => {}
            (Some(relation), None) => {
                self.collector.emit(
                    Diagnostic::error(format!("missing object after relation `{}`", relation))
                        .with_code(ErrorCode::E101)
                        .with_label(relation.span(), "relation without an object"),
                );
            }
            (_, Some((index, object_start))) => {
                let object = self.object(index, object_start);
                let object_span = match &object {
                    ObjectToken::Function(function) => function.span,
                    ObjectToken::Statement(_, span) => *span,
                };
                if relation.is_none() {
                    self.collector.emit(
                        Diagnostic::error("missing relation before the object")
                            .with_code(ErrorCode::E101)
                            .with_label(object_span, "object without a relation"),
                    );
                }
                cursor = object_span.end().min(range.end);
                statement.object = Some(object);
            }
        }
        statement.relation = relation;

        self.unexpected(cursor..range.end, "unexpected text after the object");
        statement
    }

    fn object(&mut self, index: usize, name_start: usize) -> ObjectToken {
        let parens = self.parens;
        let paren = &parens[index];
        if name_start < paren.open {
            return ObjectToken::Function(self.function(index, name_start));
        }

        let span = Span::new(paren.open..paren.end());
        let groups = self.children[index].clone();
        let nested = self.assemble_statement(paren.open + 1..paren.close, &groups);
        if nested.subject.is_some() && (nested.relation.is_none() || nested.object.is_none()) {
            self.collector.emit(
                Diagnostic::error("nested statement needs a relation and an object")
                    .with_code(ErrorCode::E101)
                    .with_label(span, "incomplete nested statement"),
            );
        }
        ObjectToken::Statement(Box::new(nested), span)
    }

    fn function(&mut self, index: usize, name_start: usize) -> FunctionToken {
        let parens = self.parens;
        let paren = &parens[index];
        let name = Spanned::new(
            self.text[name_start..paren.open].to_string(),
            Span::new(name_start..paren.open),
        );
        let span = Span::new(name_start..paren.end());

        let mut args = Vec::new();
        let interior = paren.open + 1..paren.close;
        if !paren.commas.is_empty() || !self.trim(interior.clone()).is_empty() {
            let mut bounds = Vec::with_capacity(paren.commas.len() + 2);
            bounds.push(paren.open);
            bounds.extend(&paren.commas);
            bounds.push(paren.close);

            for pair in bounds.windows(2) {
                let segment = self.trim(pair[0] + 1..pair[1]);
                if segment.is_empty() {
                    self.collector.emit(
                        Diagnostic::error(format!("empty argument in `{}`", name.inner()))
                            .with_code(ErrorCode::E101)
                            .with_label(Span::at(pair[1]), "expected an argument")
                            .with_secondary_label(name.span(), "in this function"),
                    );
                    continue;
                }
                args.push(self.argument(index, segment));
            }
        }

        FunctionToken {
            name,
            args,
            span,
            closed: paren.closed,
        }
    }

    fn argument(&mut self, parent: usize, segment: Range<usize>) -> ArgToken {
        let text = self.text;
        let raw = &text[segment.clone()];

        let mut input = raw;
        if let Ok(name) = function_head.parse_next(&mut input) {
            let open = segment.start + name.len();
            let child = self.children[parent]
                .iter()
                .copied()
                .find(|&child| self.parens[child].open == open);
            if let Some(child) = child {
                let function = self.function(child, segment.start);
                let after = function.span.end()..segment.end;
                if after.start < after.end {
                    self.unexpected(after, "unexpected text after the argument");
                }
                return ArgToken::Function(function);
            }
        }

        if let Some((namespace, value)) = split_namespace(raw) {
            let value_start = segment.start + namespace.len() + 1;
            return ArgToken::NsArg(NsArgToken {
                namespace: Spanned::new(
                    namespace.to_string(),
                    Span::new(segment.start..segment.start + namespace.len()),
                ),
                value: Spanned::new(unquote(value), Span::new(value_start..segment.end)),
                span: Span::new(segment),
            });
        }

        ArgToken::StrArg(StrArgToken {
            value: unquote(raw),
            span: Span::new(segment),
        })
    }

    /// Start of the function name ending at `open`, not before `floor`.
    fn name_start(&self, open: usize, floor: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut start = open;
        while start > floor {
            let c = bytes[start - 1];
            if c.is_ascii_whitespace() || c == b',' || c == b'(' {
                break;
            }
            start -= 1;
        }
        start
    }

    fn trim(&self, range: Range<usize>) -> Range<usize> {
        if range.start >= range.end {
            return range.start..range.start;
        }
        let slice = &self.text[range.clone()];
        let start = range.start + (slice.len() - slice.trim_start().len());
        let end = range.end - (slice.len() - slice.trim_end().len());
        start..end.max(start)
    }

    /// Whitespace-separated words of a range.
    fn words(&self, range: Range<usize>) -> Vec<Spanned<String>> {
        if range.start >= range.end {
            return Vec::new();
        }
        let slice = &self.text[range.clone()];
        let mut words = Vec::new();
        let mut start = None;
        for (i, c) in slice.char_indices().chain(std::iter::once((slice.len(), ' '))) {
            if c.is_whitespace() {
                if let Some(s) = start.take() {
                    words.push(Spanned::new(
                        slice[s..i].to_string(),
                        Span::new(range.start + s..range.start + i),
                    ));
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }
        words
    }

    fn unexpected(&mut self, range: Range<usize>, message: &str) {
        let trimmed = self.trim(range);
        if !trimmed.is_empty() {
            self.collector.emit(
                Diagnostic::error(message)
                    .with_code(ErrorCode::E100)
                    .with_label(Span::new(trimmed), "unexpected"),
            );
        }
    }
}
