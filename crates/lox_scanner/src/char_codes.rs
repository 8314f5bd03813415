//! Character constants and classification used by the scanner.
//!
//! Identifier rules are ASCII-only: letters, digits and underscore.

/// Returned by lookahead at or past the end of input.
pub const NULL_CHARACTER: char = '\0';

pub const LINE_FEED: char = '\n';
pub const CARRIAGE_RETURN: char = '\r';
pub const TAB: char = '\t';
pub const SPACE: char = ' ';

pub const DOUBLE_QUOTE: char = '"';
pub const ASTERISK: char = '*';
pub const SLASH: char = '/';
pub const DOT: char = '.';
pub const EQUALS: char = '=';
pub const UNDERSCORE: char = '_';

/// Check if a character is a decimal digit.
#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if a character can start an identifier.
#[inline]
pub fn is_alpha(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == UNDERSCORE
}

/// Check if a character can continue an identifier.
#[inline]
pub fn is_alpha_numeric(ch: char) -> bool {
    is_alpha(ch) || is_digit(ch)
}

/// Whitespace the scanner skips. Newlines are counted by `advance`.
#[inline]
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, SPACE | TAB | CARRIAGE_RETURN | LINE_FEED)
}
