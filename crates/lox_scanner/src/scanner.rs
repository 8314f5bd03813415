//! The Lox scanner.
//!
//! Converts a whole source text into a token list in one pass. Errors are
//! reported to the injected [`DiagnosticSink`] and never stop the scan.

use crate::char_codes::*;
use crate::token::{Literal, Token, TokenKind};
use lox_core::text::{text_pos, TextSpan};
use lox_diagnostics::{messages, Diagnostic, DiagnosticMessage, DiagnosticSink};
use memchr::{memchr, memchr_iter};
use tracing::{debug, trace};

/// Single-use scanner over one source text.
///
/// Positions are byte offsets. Every structural character is ASCII, so the
/// cursor only ever stops on `char` boundaries between tokens.
pub struct Scanner<'src, 'sink> {
    /// The source text being scanned.
    source: &'src str,
    bytes: &'src [u8],
    /// Start of the token being scanned.
    start: usize,
    /// Next unread byte.
    current: usize,
    /// 1-based line of `current`.
    line: u32,
    tokens: Vec<Token>,
    sink: &'sink mut dyn DiagnosticSink,
    error_count: usize,
}

impl<'src, 'sink> Scanner<'src, 'sink> {
    /// Create a scanner that reports into `sink`.
    pub fn new(source: &'src str, sink: &'sink mut dyn DiagnosticSink) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
            sink,
            error_count: 0,
        }
    }

    /// Scan the whole source. The result always ends with one `Eof` token.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        let end = text_pos(self.bytes.len());
        self.tokens.push(Token::eof(self.line, end));

        debug!(
            tokens = self.tokens.len(),
            errors = self.error_count,
            lines = self.line,
            "scan finished"
        );
        self.tokens
    }

    // ========================================================================
    // Cursor primitives
    // ========================================================================

    #[inline]
    fn is_at_end(&self) -> bool {
        self.current >= self.bytes.len()
    }

    /// Consume one byte, counting newlines.
    #[inline]
    fn advance(&mut self) -> char {
        let ch = self.peek();
        self.current += 1;
        if ch == LINE_FEED {
            self.line += 1;
        }
        ch
    }

    /// Consume everything up to (not including) byte offset `end`.
    fn advance_to(&mut self, end: usize) {
        let bytes = self.bytes;
        self.line += memchr_iter(b'\n', &bytes[self.current..end]).count() as u32;
        self.current = end;
    }

    #[inline]
    fn peek(&self) -> char {
        self.char_at(self.current)
    }

    #[inline]
    fn peek_next(&self) -> char {
        self.char_at(self.current + 1)
    }

    #[inline]
    fn char_at(&self, pos: usize) -> char {
        self.bytes.get(pos).map_or(NULL_CHARACTER, |&b| b as char)
    }

    /// Consume the next character only if it is `expected`.
    #[inline]
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.advance();
        true
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.push_token(kind, None, self.line);
    }

    /// Push a token for `source[start..current]`, recorded on `line`.
    fn push_token(&mut self, kind: TokenKind, literal: Option<Literal>, line: u32) {
        let source = self.source;
        let lexeme = &source[self.start..self.current];
        let mut token = Token::new(kind, lexeme, line, TextSpan::from(self.start..self.current));
        token.literal = literal;
        self.tokens.push(token);
    }

    fn error(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        trace!(line = self.line, code = message.code, "scanner diagnostic");
        self.error_count += 1;
        let diagnostic = Diagnostic::new(self.line, message, args)
            .with_span(TextSpan::from(self.start..self.current));
        self.sink.report(diagnostic);
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Scan at most one token starting at `start`.
    fn scan_token(&mut self) {
        let ch = self.advance();

        if let Some(kind) = TokenKind::from_single_char(ch) {
            self.add_token(kind);
            return;
        }

        if let Some(op) = TokenKind::from_operator(ch) {
            let kind = if self.match_char(EQUALS) { op.with_equals } else { op.bare };
            self.add_token(kind);
            return;
        }

        match ch {
            c if is_digit(c) => self.scan_number(),
            c if is_alpha(c) => self.scan_identifier(),
            DOUBLE_QUOTE => self.scan_string(),
            SLASH => self.scan_slash(),
            c if is_whitespace(c) => {}
            _ => self.unexpected_character(),
        }
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn scan_number(&mut self) {
        while is_digit(self.peek()) {
            self.advance();
        }

        // A trailing `.` without a digit after it belongs to the next token.
        if self.peek() == DOT && is_digit(self.peek_next()) {
            self.advance();
            while is_digit(self.peek()) {
                self.advance();
            }
        }

        let source = self.source;
        let text = &source[self.start..self.current];
        // `digits ('.' digits)?` is always valid float syntax.
        let value = text.parse::<f64>().unwrap_or(f64::NAN);
        self.push_token(TokenKind::Number, Some(Literal::Number(value)), self.line);
    }

    fn scan_identifier(&mut self) {
        while is_alpha_numeric(self.peek()) {
            self.advance();
        }

        let source = self.source;
        let text = &source[self.start..self.current];
        let kind = TokenKind::from_keyword(text).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn scan_string(&mut self) {
        let start_line = self.line;
        let bytes = self.bytes;

        match memchr(b'"', &bytes[self.current..]) {
            Some(offset) => {
                self.advance_to(self.current + offset);
                self.advance(); // closing quote

                let source = self.source;
                let value = &source[self.start + 1..self.current - 1];
                self.push_token(TokenKind::String, Some(Literal::Str(value.to_string())), start_line);
            }
            None => {
                self.advance_to(bytes.len());
                self.error(&messages::UNTERMINATED_STRING, &[]);
            }
        }
    }

    fn scan_slash(&mut self) {
        if self.match_char(SLASH) {
            // Line comment: stop before the newline so `advance` counts it.
            let bytes = self.bytes;
            let end = memchr(b'\n', &bytes[self.current..])
                .map_or(bytes.len(), |offset| self.current + offset);
            self.current = end;
        } else if self.match_char(ASTERISK) {
            self.skip_block_comment();
        } else {
            self.add_token(TokenKind::Slash);
        }
    }

    /// Skip a `/* ... */` comment. Comments nest; an unclosed one runs to the
    /// end of input without a diagnostic.
    fn skip_block_comment(&mut self) {
        let mut depth = 1u32;
        while depth > 0 && !self.is_at_end() {
            if self.peek() == ASTERISK && self.peek_next() == SLASH {
                self.advance();
                self.advance();
                depth -= 1;
            } else if self.peek() == SLASH && self.peek_next() == ASTERISK {
                self.advance();
                self.advance();
                depth += 1;
            } else {
                self.advance();
            }
        }
    }

    fn unexpected_character(&mut self) {
        // `advance` stepped one byte; skip the rest of a multi-byte character.
        let source = self.source;
        let ch = source[self.start..].chars().next().unwrap_or(NULL_CHARACTER);
        self.current = self.start + ch.len_utf8().max(1);

        let text = ch.to_string();
        self.error(&messages::UNEXPECTED_CHARACTER, &[text.as_str()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox_diagnostics::DiagnosticCollection;

    fn scan(source: &str) -> (Vec<Token>, DiagnosticCollection) {
        let mut sink = DiagnosticCollection::new();
        let tokens = Scanner::new(source, &mut sink).scan_tokens();
        (tokens, sink)
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_scan_simple_tokens() {
        assert_eq!(
            kinds("(){},.-+;*"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Semicolon,
                TokenKind::Star,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_scan_operators() {
        assert_eq!(
            kinds("! != = == < <= > >="),
            vec![
                TokenKind::Not,
                TokenKind::NotEqual,
                TokenKind::Gets,
                TokenKind::Equal,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators_are_greedy() {
        assert_eq!(kinds("==!"), vec![TokenKind::Equal, TokenKind::Not, TokenKind::Eof]);
        assert_eq!(kinds("!=="), vec![TokenKind::NotEqual, TokenKind::Gets, TokenKind::Eof]);
        assert_eq!(kinds("==="), vec![TokenKind::Equal, TokenKind::Gets, TokenKind::Eof]);
    }

    #[test]
    fn test_scan_identifier_and_keyword() {
        let (tokens, _) = scan("var x = 42;");
        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[2].kind, TokenKind::Gets);
        assert_eq!(tokens[3].kind, TokenKind::Number);
        assert_eq!(tokens[3].literal, Some(Literal::Number(42.0)));
        assert_eq!(tokens[4].kind, TokenKind::Semicolon);
        assert_eq!(tokens[5].kind, TokenKind::Eof);
    }

    #[test]
    fn test_underscore_starts_identifier() {
        let (tokens, sink) = scan("_tmp __");
        assert!(sink.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "_tmp");
        assert_eq!(tokens[1].lexeme, "__");
    }

    #[test]
    fn test_scan_string_literal() {
        let (tokens, _) = scan(r#""hello, world!""#);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, r#""hello, world!""#);
        assert_eq!(tokens[0].literal, Some(Literal::Str("hello, world!".into())));
        assert_eq!(tokens[0].span, TextSpan::new(0, 15));
    }

    #[test]
    fn test_string_has_no_escapes() {
        let (tokens, _) = scan(r#""a\nb""#);
        assert_eq!(tokens[0].literal, Some(Literal::Str(r"a\nb".into())));
    }

    #[test]
    fn test_scan_number_trailing_dot() {
        let (tokens, _) = scan("12.");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "12");
        assert_eq!(tokens[0].literal, Some(Literal::Number(12.0)));
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_leading_dot_is_not_a_number() {
        assert_eq!(kinds(".5"), vec![TokenKind::Dot, TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn test_scan_comments() {
        let (tokens, sink) = scan("// comment\nvar /* block */ x");
        assert!(sink.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Var);
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].lexeme, "x");
    }

    #[test]
    fn test_block_comment_closing_after_asterisks() {
        assert_eq!(kinds("/* a **/ 1"), vec![TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn test_unexpected_multibyte_character() {
        let (tokens, sink) = scan("é+");
        assert_eq!(tokens[0].kind, TokenKind::Plus);
        assert_eq!(tokens[0].span, TextSpan::new(2, 1));
        assert_eq!(sink.len(), 1);
        let diag = &sink.diagnostics()[0];
        assert_eq!(diag.message_text, "Unexpected character: é");
        assert_eq!(diag.span, Some(TextSpan::new(0, 2)));
    }

    #[test]
    fn test_unterminated_string_span() {
        let (tokens, sink) = scan("1 \"abc");
        assert_eq!(tokens.len(), 2);
        let diag = &sink.diagnostics()[0];
        assert_eq!(diag.code, messages::UNTERMINATED_STRING.code);
        assert_eq!(diag.span, Some(TextSpan::new(2, 4)));
    }
}
