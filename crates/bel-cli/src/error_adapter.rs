//! Bridges engine errors and statement diagnostics to miette reports.
//!
//! A [`bel::BelError::Parse`] carries every structural diagnostic of a
//! statement, and a validated statement carries its own findings. Each one
//! becomes its own [`Reportable`] with the statement text as source.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, SourceSpan};

use bel::BelError;
use bel_parser::{Diagnostic, Severity, Span};

/// Adapter for a single statement diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Statement text for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diag.severity() {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`BelError`] variants without source spans.
pub struct ErrorAdapter<'a>(pub &'a BelError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            BelError::Io(_) => "bel::io",
            BelError::Configuration(_) => "bel::configuration",
            BelError::Lookup(_) => "bel::lookup",
            BelError::Parse { .. } => return None,
            BelError::InvalidConfig(_) => "bel::config",
            BelError::Terms { .. } => "bel::terms",
        };
        Some(Box::new(code))
    }
}

/// A report ready for rendering, erasing which adapter produced it.
pub struct Reportable<'a> {
    inner: Box<dyn MietteDiagnostic + 'a>,
}

impl<'a> Reportable<'a> {
    fn new(inner: impl MietteDiagnostic + 'a) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Whether the report describes a failure rather than a warning.
    pub fn is_error(&self) -> bool {
        self.inner.severity() != Some(miette::Severity::Warning)
    }

    pub fn severity(&self) -> Option<miette::Severity> {
        self.inner.severity()
    }

    pub fn code(&self) -> Option<String> {
        self.inner.code().map(|code| code.to_string())
    }

    /// Render the report with miette's graphical handler, falling back to
    /// the plain message.
    pub fn render(&self) -> String {
        let mut writer = String::new();
        match GraphicalReportHandler::new().render_report(&mut writer, self.inner.as_ref()) {
            Ok(()) => writer,
            Err(_) => self.to_string(),
        }
    }
}

impl fmt::Debug for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`BelError`] into a list of reportable errors.
///
/// For [`BelError::Parse`], this returns one [`Reportable`] for each
/// diagnostic in the error. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &BelError) -> Vec<Reportable<'_>> {
    match err {
        BelError::Parse {
            err: parse_err,
            src,
        } => diagnostic_reportables(parse_err.diagnostics(), src),
        _ => vec![Reportable::new(ErrorAdapter(err))],
    }
}

/// Wrap the diagnostics attached to a statement.
pub fn diagnostic_reportables<'a>(diagnostics: &'a [Diagnostic], src: &'a str) -> Vec<Reportable<'a>> {
    diagnostics
        .iter()
        .map(|d| Reportable::new(DiagnosticAdapter::new(d, src)))
        .collect()
}
