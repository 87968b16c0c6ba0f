//! Whole-document helpers on top of the line tokenizer.
//!
//! Lines are separated by `\n`. A `\r` before it stays part of the line and
//! ends up in a whitespace token, so offsets always count every byte.

use crate::config::SheetConfig;
use crate::lexer::tokenize_line;
use crate::token::{ChordOccurrence, Token, TokenizedLine};
use std::collections::HashSet;
use tracing::debug;

/// Tokenize every line of `source`, each with its document offset
pub fn tokenize_sheet(source: &str, config: &SheetConfig) -> Vec<TokenizedLine> {
    let mut offset = 0;
    let lines: Vec<TokenizedLine> = source
        .split('\n')
        .map(|line| {
            let tokenized = tokenize_line(line, offset, &config.chord_line_marker, &config.text_line_marker);
            offset += line.len() + 1;
            tokenized
        })
        .collect();
    debug!(
        lines = lines.len(),
        chord_lines = lines.iter().filter(|l| l.is_chord_line).count(),
        "tokenized sheet"
    );
    lines
}

/// Every chord symbol in the document, in order
pub fn chord_occurrences(lines: &[TokenizedLine]) -> Vec<ChordOccurrence> {
    lines.iter().flat_map(TokenizedLine::chord_occurrences).collect()
}

/// Chord tokens for an overview: first occurrence of each distinct token text
pub fn unique_chords(lines: &[TokenizedLine]) -> Vec<&Token> {
    let mut seen = HashSet::new();
    lines
        .iter()
        .flat_map(TokenizedLine::chords)
        .filter(|token| seen.insert(token.text.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;
    use crate::token::TokenKind;

    const SHEET: &str = "[Verse]\nAm G\nHello world\n[Am]la Am[x02210]";

    #[test]
    fn test_running_offsets() {
        let lines = tokenize_sheet(SHEET, &SheetConfig::default());
        assert_eq!(lines.len(), 4);
        assert!(matches!(lines[0].tokens[0].kind, TokenKind::Header(_)));
        assert!(lines[1].is_chord_line);
        assert_eq!(lines[1].tokens[0].span, Span::new(8, 10));
        assert_eq!(lines[2].tokens[0].span, Span::new(13, 18));
        assert!(!lines[2].is_chord_line);
        assert_eq!(lines[3].tokens[0].span.start, 25);
    }

    #[test]
    fn test_occurrences_point_into_document() {
        let lines = tokenize_sheet(SHEET, &SheetConfig::default());
        let occurrences = chord_occurrences(&lines);
        let symbols: Vec<_> = occurrences.iter().map(|o| o.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["Am", "G", "Am", "Am"]);
        for occurrence in &occurrences {
            assert_eq!(&SHEET[occurrence.span.start..occurrence.span.end], occurrence.symbol);
        }
    }

    #[test]
    fn test_unique_chords_by_text() {
        let lines = tokenize_sheet(SHEET, &SheetConfig::default());
        let texts: Vec<_> = unique_chords(&lines).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Am", "G", "[Am]", "Am[x02210]"]);
    }

    #[test]
    fn test_crlf_lines_keep_offsets() {
        let source = "Am G\r\nC D";
        let lines = tokenize_sheet(source, &SheetConfig::default());
        assert_eq!(lines[0].text(), "Am G\r");
        assert!(lines[0].is_chord_line);
        assert_eq!(lines[1].tokens[0].span, Span::new(6, 7));
    }
}
