//! miette rendering of scanner diagnostics.

use lox_diagnostics::{Diagnostic, DiagnosticCategory};
use miette::{LabeledSpan, NamedSource, Severity, SourceCode, SourceSpan};
use std::fmt;

/// A scanner diagnostic bundled with the source it points into.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SourceReport {
    message: String,
    code: u32,
    line: u32,
    severity: Severity,
    src: NamedSource<String>,
    span: Option<SourceSpan>,
}

impl SourceReport {
    pub fn new(diagnostic: &Diagnostic, name: &str, source: &str) -> Self {
        let severity = match diagnostic.category {
            DiagnosticCategory::Error => Severity::Error,
            DiagnosticCategory::Warning => Severity::Warning,
        };
        Self {
            message: diagnostic.message_text.clone(),
            code: diagnostic.code,
            line: diagnostic.line,
            severity,
            src: NamedSource::new(name, source.to_string()),
            span: diagnostic.span.map(|span| SourceSpan::from(span.to_range())),
        }
    }
}

impl miette::Diagnostic for SourceReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("LOX{}", self.code)))
    }

    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let label = LabeledSpan::new_with_span(Some(format!("line {}", self.line)), span);
        Some(Box::new(std::iter::once(label)))
    }
}
