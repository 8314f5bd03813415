//! Text spans and line lookup for source location tracking.
//!
//! Spans are byte offsets into the scanned source. Lines are 1-based, the
//! way the scanner and its diagnostics count them.

use memchr::memchr_iter;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// Convert a byte offset to a [`TextPos`], saturating at `TextPos::MAX`.
#[inline]
pub fn text_pos(offset: usize) -> TextPos {
    TextPos::try_from(offset).unwrap_or(TextPos::MAX)
}

/// A span in source text, defined by a start position and a length.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Serialize)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    /// Create a new text span.
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// Create an empty span at a position.
    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self {
            start: pos,
            length: 0,
        }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Convert to a byte range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

/// Offsets past `TextPos::MAX` saturate, so a span never wraps around.
impl From<Range<usize>> for TextSpan {
    fn from(range: Range<usize>) -> Self {
        TextSpan::from_bounds(text_pos(range.start), text_pos(range.end))
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// A map from byte offsets to 1-based line numbers, built from source text.
///
/// Only `\n` starts a new line; a lone `\r` is ordinary whitespace.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offsets of the start of each line.
    line_starts: Vec<TextPos>,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(memchr_iter(b'\n', text.as_bytes()).map(|i| text_pos(i + 1)));
        Self { line_starts }
    }

    /// Get the 1-based line number for a byte offset.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32 + 1,
            Err(line) => line as u32,
        }
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span() {
        let span = TextSpan::new(5, 10);
        assert_eq!(span.start, 5);
        assert_eq!(span.length, 10);
        assert_eq!(span.end(), 15);
        assert_eq!(TextSpan::from_bounds(5, 15), span);
    }

    #[test]
    fn test_text_span_from_range() {
        let span = TextSpan::from(3..7);
        assert_eq!(span.start, 3);
        assert_eq!(span.length, 4);
        assert_eq!(span.to_range(), 3..7);
        assert!(TextSpan::empty(9).is_empty());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_text_span_from_range_saturates_past_u32() {
        let past = TextPos::MAX as usize + 10;

        let span = TextSpan::from(past..past + 5);
        assert_eq!(span.start, TextPos::MAX);
        assert!(span.is_empty());

        let span = TextSpan::from(10..past);
        assert_eq!(span.start, 10);
        assert_eq!(span.end(), TextPos::MAX);

        assert_eq!(text_pos(past), TextPos::MAX);
        assert_eq!(text_pos(42), 42);
    }

    #[test]
    fn test_line_map() {
        let text = "line1\nline2\nline3";
        let map = LineMap::new(text);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.line_of(0), 1);
        assert_eq!(map.line_of(5), 1); // newline char
        assert_eq!(map.line_of(6), 2); // start of line2
        assert_eq!(map.line_of(12), 3);
    }

    #[test]
    fn test_line_map_carriage_return_is_not_a_line_break() {
        let map = LineMap::new("a\r\rb\nc");
        assert_eq!(map.line_count(), 2);
        assert_eq!(map.line_of(3), 1);
        assert_eq!(map.line_of(5), 2);
    }
}
