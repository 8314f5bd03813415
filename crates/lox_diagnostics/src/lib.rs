//! lox_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Diagnostics carry a 1-based line, the message text and the code of the
//! message template that produced them. The scanner never decides what an
//! error means for the process; it hands every diagnostic to a caller-owned
//! [`DiagnosticSink`], and the sink's sticky error flag is what a host
//! consults once the whole pipeline has run.

use lox_core::text::TextSpan;
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "Warning"),
            DiagnosticCategory::Error => write!(f, "Error"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1001).
    pub code: u32,
    /// The category of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// 1-based line the diagnostic is reported on.
    pub line: u32,
    /// The source bytes the diagnostic points at, if any.
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic reported on `line`.
    pub fn new(line: u32, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            line,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Attach the source span this diagnostic points at.
    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Whether this is an error diagnostic.
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[line {}] {}: {}",
            self.line, self.category, self.message_text
        )
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Receiver for diagnostics produced while scanning.
///
/// Reports accumulate: once an error has been reported, `had_error` stays
/// true until the owner explicitly resets the sink.
pub trait DiagnosticSink {
    /// Record one diagnostic. Called synchronously, once per event.
    fn report(&mut self, diagnostic: Diagnostic);

    /// Whether any error-category diagnostic has been reported.
    fn had_error(&self) -> bool;
}

/// A collection of diagnostics accumulated during a run.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Drop everything reported so far, resetting the error flag.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

impl DiagnosticSink for DiagnosticCollection {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.add(diagnostic);
    }

    fn had_error(&self) -> bool {
        self.has_errors()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Scanner errors (1000-1099)
    // ========================================================================
    pub const UNEXPECTED_CHARACTER: DiagnosticMessage = diag!(1001, Error, "Unexpected character: {0}");
    pub const UNTERMINATED_STRING: DiagnosticMessage = diag!(1002, Error, "Unterminated string.");

    // ========================================================================
    // Host warnings (1100-1199)
    // ========================================================================
    pub const EMPTY_SOURCE_FILE: DiagnosticMessage = diag!(1100, Warning, "Source file '{0}' is empty.");
}
