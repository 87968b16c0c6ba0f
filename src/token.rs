//! # Token Types
//!
//! Output of the line tokenizer ([`crate::lexer`]).
//!
//! ## Type Hierarchy
//! ```text
//! TokenizedLine
//!   ├── is_chord_line: bool
//!   └── Vec<Token>
//!         ├── text: exact source substring
//!         ├── span: document-global byte range
//!         └── kind: TokenKind
//!               ├── Word | Whitespace | Marker | Rhythm | Notation | Break
//!               ├── Header(HeaderParts)             [Verse 1]
//!               ├── InlineHeader(InlineHeaderParts) Chorus:
//!               ├── Quoted(QuotedParts)             'cue'  {title: x}  <small>
//!               ├── Direction(DirectionParts)       x2 ...  -> ...  // ...
//!               ├── Embed(EmbedRef)                 ![[file.png|200x100]]
//!               └── Chord(ChordInfo)                Am  [Am aux]  Am[x02210]
//! ```
//!
//! ## Coordinates
//! `Token::span` is document-global. Every [`Part`] inside a kind is relative
//! to the start of its own token, so `token.span.start + part.span.start` is
//! where the part sits in the document.
//!
//! ## Lossless Text
//! Concatenating `text` of every token of a line, in order, gives back the line.

use crate::chord::Chord;
use crate::span::{Part, Span};
use serde::Serialize;

/// One token of a line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub text: String,
    pub span: Span,
    #[serde(flatten)]
    pub kind: TokenKind,
}

/// What a token is, plus the pieces each kind carries
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TokenKind {
    Word,
    Whitespace,
    /// Chord-line or text-line marker at the end of the line
    Marker,
    /// `[Verse 1]` on a line of its own
    Header(HeaderParts),
    /// `Chorus:`
    InlineHeader(InlineHeaderParts),
    Chord(Box<ChordInfo>),
    /// Bar lines, strums and repeat signs on a chord line
    Rhythm,
    /// `@xxxx` music glyph notation
    Notation,
    Quoted(QuotedParts),
    Direction(DirectionParts),
    Embed(EmbedRef),
    /// `---` column or section break
    Break,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderParts {
    pub open: Part,
    pub name: Part,
    pub close: Part,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineHeaderParts {
    pub name: Part,
    pub close: Part,
}

/// How a quoted label was delimited, which the renderer maps to a style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuoteStyle {
    Plain,
    LyricCue,
    MusicCue,
    #[serde(rename = "part-1")]
    Part1,
    #[serde(rename = "part-2")]
    Part2,
    #[serde(rename = "part-3")]
    Part3,
    #[serde(rename = "part-4")]
    Part4,
    #[serde(rename = "part-5")]
    Part5,
    Rule,
    Lozenge,
    Small,
    /// `{directive: text}`
    #[serde(rename = "chordpro")]
    ChordPro,
}

impl QuoteStyle {
    /// Style for a symbol-pair opening delimiter
    pub fn from_open(open: char) -> Option<Self> {
        match open {
            '^' => Some(QuoteStyle::Plain),
            '\'' | '‘' => Some(QuoteStyle::LyricCue),
            '!' => Some(QuoteStyle::MusicCue),
            '_' => Some(QuoteStyle::Part1),
            '*' => Some(QuoteStyle::Part2),
            '+' => Some(QuoteStyle::Part3),
            '&' => Some(QuoteStyle::Part4),
            '$' => Some(QuoteStyle::Part5),
            '=' => Some(QuoteStyle::Rule),
            '{' => Some(QuoteStyle::Lozenge),
            '<' => Some(QuoteStyle::Small),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotedParts {
    pub style: QuoteStyle,
    pub open: Part,
    #[serde(rename = "quotedText")]
    pub text: Part,
    pub close: Part,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionParts {
    /// `x2`, `->` or `//` (with one optional trailing space)
    pub open: Part,
    #[serde(rename = "directionText")]
    pub text: Part,
}

/// `![[src|WIDTHxHEIGHT]]`; resolving `src` is up to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedRef {
    pub src: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Everything known about a chord token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordInfo {
    pub chord: Chord,
    /// The chord symbol as written, relative to the token
    pub symbol: Part,
    pub inline_chord: Option<InlineChord>,
    pub user_defined_chord: Option<UserDefinedChord>,
}

/// `[Am]` or `[F# aux text]` between lyrics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineChord {
    pub open: Part,
    pub aux_text: Option<Part>,
    pub close: Part,
}

/// `Am[x02210]` or `Dm6[4|x2x132]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefinedChord {
    pub open: Part,
    pub position: Option<Part>,
    pub position_separator: Option<Part>,
    pub frets: Part,
    pub close: Part,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: &str, span: Span) -> Self {
        Self {
            text: text.to_string(),
            span,
            kind,
        }
    }

    pub fn is_chord(&self) -> bool {
        matches!(self.kind, TokenKind::Chord(_))
    }

    pub fn chord_info(&self) -> Option<&ChordInfo> {
        match &self.kind {
            TokenKind::Chord(info) => Some(info),
            _ => None,
        }
    }

    /// Short kind name, as used in serialized output
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TokenKind::Word => "word",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Marker => "marker",
            TokenKind::Header(_) => "header",
            TokenKind::InlineHeader(_) => "inlineHeader",
            TokenKind::Chord(_) => "chord",
            TokenKind::Rhythm => "rhythm",
            TokenKind::Notation => "notation",
            TokenKind::Quoted(_) => "quoted",
            TokenKind::Direction(_) => "direction",
            TokenKind::Embed(_) => "embed",
            TokenKind::Break => "break",
        }
    }
}

/// A chord symbol located in the document, ready for transposition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordOccurrence {
    /// Document-global span of the symbol only (no brackets, no shape)
    pub span: Span,
    pub symbol: String,
    pub chord: Chord,
}

/// Tokens of one line plus its classification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizedLine {
    pub tokens: Vec<Token>,
    pub is_chord_line: bool,
}

impl TokenizedLine {
    pub fn chords(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_chord())
    }

    /// Chord symbols with their document-global spans
    pub fn chord_occurrences(&self) -> Vec<ChordOccurrence> {
        self.tokens
            .iter()
            .filter_map(|token| {
                let info = token.chord_info()?;
                Some(ChordOccurrence {
                    span: info.symbol.span.offset(token.span.start),
                    symbol: info.symbol.text.clone(),
                    chord: info.chord.clone(),
                })
            })
            .collect()
    }

    /// Concatenated token text; equals the source line
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_styles() {
        assert_eq!(QuoteStyle::from_open('\''), Some(QuoteStyle::LyricCue));
        assert_eq!(QuoteStyle::from_open('‘'), Some(QuoteStyle::LyricCue));
        assert_eq!(QuoteStyle::from_open('$'), Some(QuoteStyle::Part5));
        assert_eq!(QuoteStyle::from_open('x'), None);
    }

    #[test]
    fn test_token_serializes_with_type_tag() {
        let token = Token::new(TokenKind::Word, "Hello", Span::new(0, 5));
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["type"], "word");
        assert_eq!(json["text"], "Hello");
        assert_eq!(json["span"]["end"], 5);
    }

    #[test]
    fn test_quote_style_serialized_names() {
        assert_eq!(serde_json::to_value(QuoteStyle::Part3).unwrap(), "part-3");
        assert_eq!(serde_json::to_value(QuoteStyle::LyricCue).unwrap(), "lyric-cue");
        assert_eq!(serde_json::to_value(QuoteStyle::ChordPro).unwrap(), "chordpro");
    }

    #[test]
    fn test_quoted_text_does_not_shadow_token_text() {
        let token = Token::new(
            TokenKind::Quoted(QuotedParts {
                style: QuoteStyle::LyricCue,
                open: Part::slice("'soft'", 0, 1),
                text: Part::slice("'soft'", 1, 5),
                close: Part::slice("'soft'", 5, 6),
            }),
            "'soft'",
            Span::new(0, 6),
        );
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["text"], "'soft'");
        assert_eq!(json["quotedText"]["text"], "soft");
        assert_eq!(json["style"], "lyric-cue");
    }
}
