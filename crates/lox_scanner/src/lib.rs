//! lox_scanner: Lexer for the Lox scripting language.
//!
//! Turns a complete source text into classified tokens with 1-based line
//! numbers. Supports:
//! - one- and two-character operators, with `=` (assignment) distinct from `==`
//! - number literals parsed to `f64`
//! - string literals spanning lines
//! - `//` line comments and nested `/* */` block comments
//!
//! Illegal input is reported to a caller-supplied [`DiagnosticSink`] and
//! skipped; scanning always runs to the end of the source.

mod char_codes;
mod scanner;
mod token;

use lox_diagnostics::DiagnosticSink;

pub use scanner::Scanner;
pub use token::{Literal, Token, TokenKind, TwoFormOperator};

/// Scan `source` into tokens, reporting problems to `sink`.
///
/// The returned list is never empty: it always ends with one `Eof` token.
///
/// Spans are `u32` byte offsets. Sources past 4 GiB are still scanned to the
/// end, but spans beyond that point saturate at `TextPos::MAX`.
pub fn scan_tokens(source: &str, sink: &mut dyn DiagnosticSink) -> Vec<Token> {
    Scanner::new(source, sink).scan_tokens()
}
