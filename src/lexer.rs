//! # Line Tokenizer
//!
//! Splits one line of a chord sheet into typed, position-tagged tokens and
//! decides whether the line is a chord line or a text line.
//!
//! ## Passes
//! 1. A line that is nothing but `[Header]` (plus surrounding whitespace) is
//!    returned straight away as whitespace / header / whitespace.
//! 2. Otherwise the line is eaten from the left. At each position the
//!    [`PATTERNS`] are tried in order and the first one that matches a
//!    non-empty prefix produces a token.
//! 3. Words that parse as chords and runs of rhythm symbols are emitted as
//!    plain words and remembered as pending.
//! 4. Once the whole line is seen it is classified, and on a chord line the
//!    pending tokens are rewritten into chord and rhythm tokens.
//!
//! ## Classification
//! - chord-line marker at the end, or any user-defined shape → chord line
//! - text-line marker at the end → text line
//! - otherwise chord line iff pending / words > 1/2 (ties are text lines)
//!
//! ## Example
//! ```rust
//! use chordsheet::tokenize_line;
//!
//! let line = tokenize_line("Am G F C", 0, "%c", "%t");
//! assert!(line.is_chord_line);
//! assert_eq!(line.chords().count(), 4);
//!
//! let line = tokenize_line("Am I dreaming", 0, "%c", "%t");
//! assert!(!line.is_chord_line);
//! assert_eq!(line.chords().count(), 0);
//! ```

use crate::chord::{parse_chord, UserShape};
use crate::span::{Part, Span};
use crate::token::{
    ChordInfo, DirectionParts, EmbedRef, HeaderParts, InlineChord, InlineHeaderParts, QuoteStyle,
    QuotedParts, Token, TokenKind, TokenizedLine, UserDefinedChord,
};
use tracing::{debug, trace};

/// Token patterns, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pattern {
    /// Chord-line or text-line marker followed only by whitespace
    LineMarker,
    /// `@` and a non-space run
    Notation,
    /// `x2 ...`, `-> ...` or `// ...` up to the end of the line
    Direction,
    /// `---` as the rest of the line
    Break,
    /// Same symbol on both sides: `'cue'`, `_part_`, `=rule=`, ...
    SymbolQuoted,
    /// `{name: text}`; must come before `CurlyQuoted`
    ChordProQuoted,
    /// `‘text’`
    SmartQuoted,
    /// `{text}`
    CurlyQuoted,
    /// `<text>`
    AngleQuoted,
    /// `![[src|WxH]]`
    Embed,
    /// Everything up to a colon
    InlineHeader,
    /// `[Am]`, `[F# aux text]`
    InlineChord,
    /// `Am[x02210]`, `Dm6[4|x2x132]`
    UserDefinedChord,
    /// Bar lines, strums, repeats: `| / % . ~ [ ]`
    WordOrRhythm,
    /// Any run without whitespace, `|`, `~` or `[`
    WordOrChord,
    Whitespace,
}

/// Every character is either whitespace, one of `| ~ [` (taken by
/// `WordOrRhythm`) or taken by `WordOrChord`, so the last three patterns
/// together match any non-empty input.
const PATTERNS: [Pattern; 16] = [
    Pattern::LineMarker,
    Pattern::Notation,
    Pattern::Direction,
    Pattern::Break,
    Pattern::SymbolQuoted,
    Pattern::ChordProQuoted,
    Pattern::SmartQuoted,
    Pattern::CurlyQuoted,
    Pattern::AngleQuoted,
    Pattern::Embed,
    Pattern::InlineHeader,
    Pattern::InlineChord,
    Pattern::UserDefinedChord,
    Pattern::WordOrRhythm,
    Pattern::WordOrChord,
    Pattern::Whitespace,
];

const SYMBOL_QUOTES: &str = "'_!$&^*+=";
const RHYTHM_CHARS: &str = "[]/|%.~";
const USER_CHORD_SYMBOL_CHARS: &str = "#()+-°/*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineMarker {
    Chord,
    Text,
}

/// What a pending word turns into on a chord line
#[derive(Debug)]
enum Pending {
    Rhythm,
    Chord(Box<ChordInfo>),
}

/// Byte layout of an open / text / close match, relative to the match start
#[derive(Debug, Clone, Copy)]
struct Delimited {
    open_end: usize,
    close_start: usize,
    end: usize,
}

/// Tokenize one line.
///
/// `offset` is the byte offset of the line's first character in the document;
/// it is added to every token span. Markers that are empty strings are ignored.
pub fn tokenize_line(
    line: &str,
    offset: usize,
    chord_line_marker: &str,
    text_line_marker: &str,
) -> TokenizedLine {
    Lexer::new(line, offset, chord_line_marker, text_line_marker).tokenize()
}

/// Single-use tokenizer state for one line
pub struct Lexer<'a> {
    line: &'a str,
    offset: usize,
    chord_line_marker: &'a str,
    text_line_marker: &'a str,
    position: usize,
    tokens: Vec<Token>,
    pending: Vec<(usize, Pending)>,
    word_count: usize,
    marker: Option<LineMarker>,
    has_user_defined_chord: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(line: &'a str, offset: usize, chord_line_marker: &'a str, text_line_marker: &'a str) -> Self {
        Self {
            line,
            offset,
            chord_line_marker,
            text_line_marker,
            position: 0,
            tokens: Vec::new(),
            pending: Vec::new(),
            word_count: 0,
            marker: None,
            has_user_defined_chord: false,
        }
    }

    pub fn tokenize(mut self) -> TokenizedLine {
        if let Some(header) = self.header_line() {
            return header;
        }

        let line = self.line;
        while self.position < line.len() {
            let rest = &line[self.position..];
            let consumed = match PATTERNS.iter().find_map(|&pattern| self.apply(pattern, rest)) {
                Some(consumed) => consumed,
                None => unreachable!("no token pattern matched remaining line {:?}", rest),
            };
            debug_assert!(consumed > 0, "token pattern matched an empty prefix of {:?}", rest);
            self.position += consumed;
        }

        self.finish()
    }

    /// Whole-line `[Header]`, the only place a bracketed name is a header
    fn header_line(&mut self) -> Option<TokenizedLine> {
        let line = self.line;
        let lead = line.len() - line.trim_start().len();
        let name_len = line[lead..].strip_prefix('[')?.find(']')?;
        if name_len == 0 {
            return None;
        }
        let header_end = lead + name_len + 2;
        if !line[header_end..].chars().all(char::is_whitespace) {
            return None;
        }

        if lead > 0 {
            self.push(TokenKind::Whitespace, 0, lead);
        }
        let text = &line[lead..header_end];
        let parts = HeaderParts {
            open: Part::slice(text, 0, 1),
            name: Part::slice(text, 1, 1 + name_len),
            close: Part::slice(text, 1 + name_len, 2 + name_len),
        };
        self.push(TokenKind::Header(parts), lead, header_end);
        if header_end < line.len() {
            self.push(TokenKind::Whitespace, header_end, line.len());
        }

        Some(TokenizedLine {
            tokens: std::mem::take(&mut self.tokens),
            is_chord_line: false,
        })
    }

    /// Try one pattern at the current position; on a match push its token and
    /// return the number of bytes consumed.
    fn apply(&mut self, pattern: Pattern, rest: &str) -> Option<usize> {
        let start = self.position;
        match pattern {
            Pattern::LineMarker => {
                let (marker, len) = self.scan_line_marker(rest)?;
                self.marker = Some(marker);
                self.push(TokenKind::Marker, start, start + len);
                Some(len)
            }
            Pattern::Notation => {
                let len = scan_notation(rest)?;
                self.push(TokenKind::Notation, start, start + len);
                Some(len)
            }
            Pattern::Direction => {
                let open_end = scan_direction(rest)?;
                let parts = DirectionParts {
                    open: Part::slice(rest, 0, open_end),
                    text: Part::slice(rest, open_end, rest.len()),
                };
                self.push(TokenKind::Direction(parts), start, start + rest.len());
                Some(rest.len())
            }
            Pattern::Break => {
                if rest != "---" {
                    return None;
                }
                self.push(TokenKind::Break, start, start + rest.len());
                Some(rest.len())
            }
            Pattern::SymbolQuoted => {
                let m = scan_symbol_quoted(rest)?;
                Some(self.push_quoted(rest, m, None))
            }
            Pattern::ChordProQuoted => {
                let m = scan_chordpro(rest)?;
                Some(self.push_quoted(rest, m, Some(QuoteStyle::ChordPro)))
            }
            Pattern::SmartQuoted => {
                let m = scan_pair(rest, '‘', '’')?;
                Some(self.push_quoted(rest, m, None))
            }
            Pattern::CurlyQuoted => {
                let m = scan_pair(rest, '{', '}')?;
                Some(self.push_quoted(rest, m, None))
            }
            Pattern::AngleQuoted => {
                let m = scan_pair(rest, '<', '>')?;
                Some(self.push_quoted(rest, m, None))
            }
            Pattern::Embed => {
                let (len, embed) = scan_embed(rest)?;
                self.push(TokenKind::Embed(embed), start, start + len);
                Some(len)
            }
            Pattern::InlineHeader => {
                let colon = rest.find(':').filter(|&i| i > 0)?;
                let text = &rest[..=colon];
                let parts = InlineHeaderParts {
                    name: Part::slice(text, 0, colon),
                    close: Part::slice(text, colon, colon + 1),
                };
                self.push(TokenKind::InlineHeader(parts), start, start + colon + 1);
                Some(colon + 1)
            }
            Pattern::InlineChord => {
                let m = scan_inline_chord(rest)?;
                self.push_inline_chord(rest, m);
                Some(m.end)
            }
            Pattern::UserDefinedChord => {
                let len = self.push_user_defined_chord(rest)?;
                Some(len)
            }
            Pattern::WordOrRhythm => {
                let len = scan_run(rest, |c| RHYTHM_CHARS.contains(c))?;
                let index = self.push(TokenKind::Word, start, start + len);
                self.pending.push((index, Pending::Rhythm));
                Some(len)
            }
            Pattern::WordOrChord => {
                let len = scan_run(rest, |c| !(c.is_whitespace() || c == '|' || c == '~' || c == '['))?;
                let word = &rest[..len];
                let index = self.push(TokenKind::Word, start, start + len);
                if let Some(chord) = parse_chord(word) {
                    let info = ChordInfo {
                        chord,
                        symbol: Part::slice(word, 0, len),
                        inline_chord: None,
                        user_defined_chord: None,
                    };
                    self.pending.push((index, Pending::Chord(Box::new(info))));
                }
                self.word_count += 1;
                Some(len)
            }
            Pattern::Whitespace => {
                let len = scan_run(rest, char::is_whitespace)?;
                self.push(TokenKind::Whitespace, start, start + len);
                Some(len)
            }
        }
    }

    /// Push a token for line bytes `[start, end)`, returning its index
    fn push(&mut self, kind: TokenKind, start: usize, end: usize) -> usize {
        let span = Span::new(start, end).offset(self.offset);
        self.tokens.push(Token::new(kind, &self.line[start..end], span));
        self.tokens.len() - 1
    }

    fn push_quoted(&mut self, rest: &str, m: Delimited, style: Option<QuoteStyle>) -> usize {
        let text = &rest[..m.end];
        let style = style
            .or_else(|| text.chars().next().and_then(QuoteStyle::from_open))
            .unwrap_or(QuoteStyle::Plain);
        let parts = QuotedParts {
            style,
            open: Part::slice(text, 0, m.open_end),
            text: Part::slice(text, m.open_end, m.close_start),
            close: Part::slice(text, m.close_start, m.end),
        };
        self.push(TokenKind::Quoted(parts), self.position, self.position + m.end);
        m.end
    }

    fn push_inline_chord(&mut self, rest: &str, m: Delimited) {
        let start = self.position;
        let text = &rest[..m.end];
        let symbol = &text[1..m.open_end];

        let Some(chord) = parse_chord(symbol) else {
            trace!(text, "bracketed text is not a chord, keeping it as a word");
            self.push(TokenKind::Word, start, start + m.end);
            return;
        };

        let aux_text = (m.close_start > m.open_end).then(|| Part::slice(text, m.open_end, m.close_start));
        let info = ChordInfo {
            chord,
            symbol: Part::slice(text, 1, m.open_end),
            inline_chord: Some(InlineChord {
                open: Part::slice(text, 0, 1),
                aux_text,
                close: Part::slice(text, m.close_start, m.end),
            }),
            user_defined_chord: None,
        };
        self.push(TokenKind::Chord(Box::new(info)), start, start + m.end);
    }

    /// `Symbol[` optional `position|` `frets]`
    fn push_user_defined_chord(&mut self, rest: &str) -> Option<usize> {
        if !rest.starts_with(|c: char| c.is_ascii_uppercase()) {
            return None;
        }
        let symbol_end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || USER_CHORD_SYMBOL_CHARS.contains(c)))
            .unwrap_or(rest.len());
        if !rest[symbol_end..].starts_with('[') {
            return None;
        }

        let mut cursor = symbol_end + 1;
        let mut position = None;
        if let Some(digits) = scan_run(&rest[cursor..], |c| c.is_ascii_digit()) {
            if rest[cursor + digits..].starts_with('|') {
                position = Some((cursor, cursor + digits));
                cursor += digits + 1;
            }
        }
        let frets_len = scan_run(&rest[cursor..], |c| c.is_ascii_digit() || c == 'x' || c == '_')?;
        let frets_end = cursor + frets_len;
        if !rest[frets_end..].starts_with(']') {
            return None;
        }
        let end = frets_end + 1;
        let text = &rest[..end];

        let position_part = position.map(|(s, e)| Part::slice(text, s, e));
        let frets = Part::slice(text, cursor, frets_end);

        let mut chord = parse_chord(&text[..symbol_end]).unwrap_or_default();
        chord.user_shape = Some(UserShape {
            frets: frets.text.clone(),
            position: position_part.as_ref().and_then(|p| p.text.parse().ok()).unwrap_or(0),
        });

        let info = ChordInfo {
            chord,
            symbol: Part::slice(text, 0, symbol_end),
            inline_chord: None,
            user_defined_chord: Some(UserDefinedChord {
                open: Part::slice(text, symbol_end, symbol_end + 1),
                position_separator: position.map(|(_, e)| Part::slice(text, e, e + 1)),
                position: position_part,
                frets,
                close: Part::slice(text, frets_end, end),
            }),
        };
        let start = self.position;
        self.push(TokenKind::Chord(Box::new(info)), start, start + end);
        self.has_user_defined_chord = true;
        Some(end)
    }

    fn scan_line_marker(&self, rest: &str) -> Option<(LineMarker, usize)> {
        [
            (LineMarker::Text, self.text_line_marker),
            (LineMarker::Chord, self.chord_line_marker),
        ]
        .into_iter()
        .filter(|(_, marker)| !marker.is_empty())
        .find(|(_, marker)| {
            rest.strip_prefix(marker)
                .is_some_and(|tail| tail.chars().all(char::is_whitespace))
        })
        .map(|(kind, marker)| (kind, marker.len()))
    }

    /// Classify the line and rewrite pending tokens on chord lines
    fn finish(mut self) -> TokenizedLine {
        let is_chord_line = if self.marker == Some(LineMarker::Chord) || self.has_user_defined_chord {
            true
        } else if self.marker == Some(LineMarker::Text) {
            false
        } else {
            2 * self.pending.len() > self.word_count
        };
        debug!(
            line = self.line,
            pending = self.pending.len(),
            words = self.word_count,
            marker = ?self.marker,
            is_chord_line,
            "classified line"
        );

        if is_chord_line {
            for (index, pending) in self.pending {
                self.tokens[index].kind = match pending {
                    Pending::Rhythm => TokenKind::Rhythm,
                    Pending::Chord(info) => TokenKind::Chord(info),
                };
            }
        }

        TokenizedLine {
            tokens: self.tokens,
            is_chord_line,
        }
    }
}

/// Length of the longest non-empty prefix whose chars all satisfy `pred`
fn scan_run(s: &str, pred: impl Fn(char) -> bool) -> Option<usize> {
    let len = s.find(|c: char| !pred(c)).unwrap_or(s.len());
    (len > 0).then_some(len)
}

fn scan_notation(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix('@')?;
    scan_run(body, |c| !c.is_whitespace()).map(|len| len + 1)
}

/// Returns the end of the opening part; the text runs to the end of the line
fn scan_direction(rest: &str) -> Option<usize> {
    if let Some(digits) = rest.strip_prefix('x').and_then(|s| scan_run(s, |c| c.is_ascii_digit())) {
        return Some(1 + digits);
    }
    if rest.starts_with("->") {
        return Some(2);
    }
    let tail = rest.strip_prefix("//")?;
    let space = tail.chars().next().filter(|c| c.is_whitespace()).map_or(0, char::len_utf8);
    Some(2 + space)
}

/// Open with one of [`SYMBOL_QUOTES`], close with the same symbol, at least
/// one other character between them.
fn scan_symbol_quoted(rest: &str) -> Option<Delimited> {
    let open = rest.chars().next().filter(|&c| SYMBOL_QUOTES.contains(c))?;
    scan_pair(rest, open, open)
}

/// `{name: text}`: the opening part runs through the first colon and any
/// whitespace after it
fn scan_chordpro(rest: &str) -> Option<Delimited> {
    if !rest.starts_with('{') {
        return None;
    }
    let colon = rest.find(':').filter(|&i| i > 1)?;
    let after_colon = colon + 1;
    let ws_len = rest[after_colon..]
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(rest.len() - after_colon);
    let mut open_end = after_colon + ws_len;
    if !rest[open_end..].starts_with(|c: char| c != '}') {
        // the text needs a character; lend it the last whitespace
        let last_ws = rest[after_colon..open_end].chars().next_back()?;
        open_end -= last_ws.len_utf8();
    }
    let close_start = open_end + rest[open_end..].find('}')?;
    Some(Delimited {
        open_end,
        close_start,
        end: close_start + 1,
    })
}

/// `open`, one or more characters other than `close`, then `close`
fn scan_pair(rest: &str, open: char, close: char) -> Option<Delimited> {
    let body = rest.strip_prefix(open)?;
    let open_end = open.len_utf8();
    let text_len = body.find(close).filter(|&i| i > 0)?;
    let close_start = open_end + text_len;
    Some(Delimited {
        open_end,
        close_start,
        end: close_start + close.len_utf8(),
    })
}

/// `![[src]]` or `![[src|width]]` or `![[src|widthxheight]]`
fn scan_embed(rest: &str) -> Option<(usize, EmbedRef)> {
    const PREFIX: usize = 3;
    let body = rest.strip_prefix("![[")?;
    let run = body.find(['[', '|']).unwrap_or(body.len());
    if run == 0 {
        return None;
    }

    if let Some(size) = body[run..].strip_prefix('|') {
        if let Some((size_len, width, height)) = scan_embed_size(size) {
            let embed = EmbedRef {
                src: body[..run].to_string(),
                width,
                height,
            };
            return Some((PREFIX + run + 1 + size_len, embed));
        }
    }

    // No size: the longest source that is followed by "]]"
    let src_end = body[..run].rfind("]]").filter(|&i| i > 0)?;
    let embed = EmbedRef {
        src: body[..src_end].to_string(),
        width: None,
        height: None,
    };
    Some((PREFIX + src_end + 2, embed))
}

/// `width]]` or `widthxheight]]`, returning the consumed length
fn scan_embed_size(s: &str) -> Option<(usize, Option<u32>, Option<u32>)> {
    let width_len = scan_run(s, |c| c.is_ascii_digit())?;
    let width = s[..width_len].parse().ok();
    let tail = &s[width_len..];

    if let Some(height_len) = tail.strip_prefix('x').and_then(|h| scan_run(h, |c| c.is_ascii_digit())) {
        if tail[1 + height_len..].starts_with("]]") {
            let height = tail[1..1 + height_len].parse().ok();
            return Some((width_len + 1 + height_len + 2, width, height));
        }
    }
    tail.starts_with("]]").then_some((width_len + 2, width, None))
}

/// `[symbol aux]`: `open_end` is where the symbol stops and the aux text
/// begins; the symbol itself starts after the bracket.
fn scan_inline_chord(rest: &str) -> Option<Delimited> {
    let body = rest.strip_prefix('[')?;
    let symbol_len = scan_run(body, |c| !(c.is_whitespace() || c == ']'))?;
    let symbol_end = 1 + symbol_len;
    let region_len = rest[symbol_end..].find(['[', '(', ')']).unwrap_or(rest.len() - symbol_end);
    let close_start = symbol_end + rest[symbol_end..symbol_end + region_len].rfind(']')?;
    Some(Delimited {
        open_end: symbol_end,
        close_start,
        end: close_start + 1,
    })
}
