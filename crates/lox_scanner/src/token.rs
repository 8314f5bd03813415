//! Tokens produced by the scanner, and the static tables that classify them.

use lox_core::text::TextSpan;
use serde::Serialize;
use std::fmt;

/// The kind of a scanned token. Closed set: consumers can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Brackets
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,

    // Punctuation
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // Comparison / assignment
    Not,
    NotEqual,
    Equal,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Gets,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

/// The two spellings of an operator whose kind depends on a trailing `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoFormOperator {
    /// Kind when the next character is `=` (e.g. `<=`).
    pub with_equals: TokenKind,
    /// Kind of the lone character (e.g. `<`).
    pub bare: TokenKind,
}

impl TokenKind {
    /// Characters that always form exactly one token on their own.
    pub fn from_single_char(ch: char) -> Option<TokenKind> {
        match ch {
            '(' => Some(TokenKind::LeftParen),
            ')' => Some(TokenKind::RightParen),
            '{' => Some(TokenKind::LeftBrace),
            '}' => Some(TokenKind::RightBrace),
            ',' => Some(TokenKind::Comma),
            '.' => Some(TokenKind::Dot),
            '-' => Some(TokenKind::Minus),
            '+' => Some(TokenKind::Plus),
            ';' => Some(TokenKind::Semicolon),
            '*' => Some(TokenKind::Star),
            _ => None,
        }
    }

    /// Characters that start a one- or two-character operator.
    ///
    /// `=` alone is assignment (`Gets`); `==` is equality (`Equal`).
    pub fn from_operator(ch: char) -> Option<TwoFormOperator> {
        let (with_equals, bare) = match ch {
            '!' => (TokenKind::NotEqual, TokenKind::Not),
            '=' => (TokenKind::Equal, TokenKind::Gets),
            '<' => (TokenKind::LessEqual, TokenKind::Less),
            '>' => (TokenKind::GreaterEqual, TokenKind::Greater),
            _ => return None,
        };
        Some(TwoFormOperator { with_equals, bare })
    }

    /// Look up a complete identifier in the reserved word table.
    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        match text {
            "and" => Some(TokenKind::And),
            "class" => Some(TokenKind::Class),
            "else" => Some(TokenKind::Else),
            "false" => Some(TokenKind::False),
            "for" => Some(TokenKind::For),
            "fun" => Some(TokenKind::Fun),
            "if" => Some(TokenKind::If),
            "nil" => Some(TokenKind::Nil),
            "or" => Some(TokenKind::Or),
            "print" => Some(TokenKind::Print),
            "return" => Some(TokenKind::Return),
            "super" => Some(TokenKind::Super),
            "this" => Some(TokenKind::This),
            "true" => Some(TokenKind::True),
            "var" => Some(TokenKind::Var),
            "while" => Some(TokenKind::While),
            _ => None,
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Class
                | TokenKind::Else
                | TokenKind::False
                | TokenKind::Fun
                | TokenKind::For
                | TokenKind::If
                | TokenKind::Nil
                | TokenKind::Or
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::Super
                | TokenKind::This
                | TokenKind::True
                | TokenKind::Var
                | TokenKind::While
        )
    }

    /// The upper-case name used when printing tokens.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Minus => "MINUS",
            TokenKind::Plus => "PLUS",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Slash => "SLASH",
            TokenKind::Star => "STAR",
            TokenKind::Not => "NOT",
            TokenKind::NotEqual => "NOT_EQUAL",
            TokenKind::Equal => "EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::Gets => "GETS",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::And => "AND",
            TokenKind::Class => "CLASS",
            TokenKind::Else => "ELSE",
            TokenKind::False => "FALSE",
            TokenKind::Fun => "FUN",
            TokenKind::For => "FOR",
            TokenKind::If => "IF",
            TokenKind::Nil => "NIL",
            TokenKind::Or => "OR",
            TokenKind::Print => "PRINT",
            TokenKind::Return => "RETURN",
            TokenKind::Super => "SUPER",
            TokenKind::This => "THIS",
            TokenKind::True => "TRUE",
            TokenKind::Var => "VAR",
            TokenKind::While => "WHILE",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded value carried by `String` and `Number` tokens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    /// String contents without the surrounding quotes. Escapes are not processed.
    Str(String),
    Number(f64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => f.write_str(s),
            Literal::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token. Empty for `Eof`.
    pub lexeme: String,
    pub literal: Option<Literal>,
    /// 1-based line of the token's first character.
    pub line: u32,
    /// Byte range of the lexeme in the source.
    pub span: TextSpan,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, span: TextSpan) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal: None,
            line,
            span,
        }
    }

    /// The end-of-input marker at byte offset `pos`.
    pub fn eof(line: u32, pos: u32) -> Self {
        Self::new(TokenKind::Eof, String::new(), line, TextSpan::empty(pos))
    }

    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] {} {}", self.line, self.kind, self.lexeme)?;
        match &self.literal {
            Some(literal) => write!(f, " {}", literal),
            None => write!(f, " null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_char_table() {
        assert_eq!(TokenKind::from_single_char('('), Some(TokenKind::LeftParen));
        assert_eq!(TokenKind::from_single_char('*'), Some(TokenKind::Star));
        // `/` needs lookahead for comments, so it is not a fixed token.
        assert_eq!(TokenKind::from_single_char('/'), None);
        assert_eq!(TokenKind::from_single_char('='), None);
    }

    #[test]
    fn test_operator_table() {
        let eq = TokenKind::from_operator('=').unwrap();
        assert_eq!(eq.with_equals, TokenKind::Equal);
        assert_eq!(eq.bare, TokenKind::Gets);

        let bang = TokenKind::from_operator('!').unwrap();
        assert_eq!(bang.with_equals, TokenKind::NotEqual);
        assert_eq!(bang.bare, TokenKind::Not);

        assert!(TokenKind::from_operator('+').is_none());
    }

    #[test]
    fn test_keyword_table() {
        let words = [
            "and", "class", "else", "false", "fun", "for", "if", "nil", "or", "print", "return",
            "super", "this", "true", "var", "while",
        ];
        for word in words {
            let kind = TokenKind::from_keyword(word).unwrap();
            assert!(kind.is_keyword());
            assert_eq!(kind.as_str(), word.to_ascii_uppercase());
        }
        assert_eq!(TokenKind::from_keyword("forever"), None);
        assert_eq!(TokenKind::from_keyword("For"), None);
        assert!(!TokenKind::Identifier.is_keyword());
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::Number, "12.5", 3, TextSpan::new(0, 4))
            .with_literal(Literal::Number(12.5));
        assert_eq!(token.to_string(), "[line 3] NUMBER 12.5 12.5");

        let token = Token::new(TokenKind::Number, "7", 1, TextSpan::new(0, 1))
            .with_literal(Literal::Number(7.0));
        assert_eq!(token.to_string(), "[line 1] NUMBER 7 7");

        assert_eq!(Token::eof(2, 10).to_string(), "[line 2] EOF  null");
    }

    #[test]
    fn test_token_serializes_with_upper_case_kind() {
        let token = Token::new(TokenKind::LeftParen, "(", 1, TextSpan::new(0, 1));
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["kind"], "LEFT_PAREN");
        assert_eq!(json["lexeme"], "(");
        assert!(json["literal"].is_null());
        assert_eq!(json["line"], 1);
    }
}
