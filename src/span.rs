//! Byte ranges and sub-token parts.
//!
//! Every [`Span`] is a half-open range of byte offsets. Which base an offset is
//! measured from depends on where the span is stored:
//! - `Token::span` is document-global
//! - a [`Part`] inside a token is relative to the start of that token
//!
//! Use [`Span::offset`] to move a token-relative span into document coordinates.

use serde::Serialize;

/// Half-open byte range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {} past end {}", start, end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift both ends by `base`
    pub fn offset(self, base: usize) -> Self {
        Self {
            start: self.start + base,
            end: self.end + base,
        }
    }
}

/// A named piece of a token (bracket, chord symbol, quoted text, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    pub text: String,
    pub span: Span,
}

impl Part {
    /// Slice `[start, end)` out of a token's text, keeping the span token-relative.
    pub(crate) fn slice(token_text: &str, start: usize, end: usize) -> Self {
        Self {
            text: token_text[start..end].to_string(),
            span: Span::new(start, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_moves_both_ends() {
        let span = Span::new(1, 4).offset(10);
        assert_eq!(span, Span::new(11, 14));
        assert_eq!(span.len(), 3);
    }

    #[test]
    fn test_part_slice_is_token_relative() {
        let part = Part::slice("[Am]", 1, 3);
        assert_eq!(part.text, "Am");
        assert_eq!(part.span, Span::new(1, 3));
    }
}
