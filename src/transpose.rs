//! Chord transposition and enharmonic respelling.
//!
//! Both operations take chord occurrences (see
//! [`TokenizedLine::chord_occurrences`](crate::token::TokenizedLine::chord_occurrences))
//! and return replacement edits. Nothing is applied here.
//!
//! Spelling is fixed by direction so repeated transposition does not wander
//! between spellings: up prefers sharps, down keeps the accidental direction of
//! the step and drops double accidentals.

use crate::chord::split_symbol;
use crate::error::SheetError;
use crate::pitch::Pitch;
use crate::span::Span;
use crate::token::ChordOccurrence;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(SheetError::ConfigError(format!(
                "transpose direction must be 'up' or 'down', got '{}'",
                other
            ))),
        }
    }
}

/// Replace the document text in `span` with `text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edit {
    pub span: Span,
    pub text: String,
}

/// Move every chord one semitone in `direction`.
///
/// Chords with a user-defined shape are left alone: their frets pin a physical
/// position that a new letter name would contradict.
///
/// # Examples
/// ```
/// use chordsheet::tokenize_line;
/// use chordsheet::transpose::{transpose, Direction};
///
/// let line = tokenize_line("Am F/C", 0, "%c", "%t");
/// let edits = transpose(&line.chord_occurrences(), Direction::Up);
/// let texts: Vec<_> = edits.iter().map(|e| e.text.as_str()).collect();
/// assert_eq!(texts, vec!["A#m", "F#/C#"]);
/// ```
pub fn transpose(chords: &[ChordOccurrence], direction: Direction) -> Vec<Edit> {
    let step = |pitch: Pitch| {
        let moved = pitch.minor_second(direction);
        match direction {
            Direction::Up => moved.enharmonic(),
            Direction::Down => moved.simplify(),
        }
    };
    chords
        .iter()
        .filter(|occurrence| occurrence.chord.user_shape.is_none())
        .filter_map(|occurrence| respell(occurrence, step))
        .collect()
}

/// Swap tonic and bass for their other common spelling (`C#` <-> `Db`).
///
/// Unlike [`transpose`] this also rewrites chords with user-defined shapes,
/// since the pitch does not move.
pub fn enharmonic_toggle(chords: &[ChordOccurrence]) -> Vec<Edit> {
    chords
        .iter()
        .filter_map(|occurrence| respell(occurrence, |pitch: Pitch| pitch.enharmonic()))
        .collect()
}

/// Rebuild a symbol with its tonic and bass mapped through `map`. Returns an
/// edit only when the text changes.
fn respell(occurrence: &ChordOccurrence, map: impl Fn(Pitch) -> Pitch) -> Option<Edit> {
    let Some(parts) = split_symbol(&occurrence.symbol) else {
        trace!(symbol = %occurrence.symbol, "no tonic to move, leaving chord unchanged");
        return None;
    };

    let mut text = spell(parts.tonic, parts.tonic_text, &map);
    text.push_str(parts.suffix);
    if let Some((bass, bass_text)) = parts.bass {
        text.push('/');
        text.push_str(&spell(bass, bass_text, &map));
    }

    (text != occurrence.symbol).then(|| Edit {
        span: occurrence.span,
        text,
    })
}

/// Written text stays as it was when the spelling is unchanged
fn spell(pitch: Pitch, written: &str, map: &impl Fn(Pitch) -> Pitch) -> String {
    let mapped = map(pitch);
    if mapped == pitch {
        written.to_string()
    } else {
        mapped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::{parse_chord, Chord, UserShape};

    fn occurrence(symbol: &str, start: usize) -> ChordOccurrence {
        ChordOccurrence {
            span: Span::new(start, start + symbol.len()),
            symbol: symbol.to_string(),
            chord: parse_chord(symbol).unwrap_or_default(),
        }
    }

    fn texts(edits: &[Edit]) -> Vec<&str> {
        edits.iter().map(|e| e.text.as_str()).collect()
    }

    /// Apply a single-chord transformation, falling back to the input when no edit is made
    fn apply(symbol: &str, f: impl Fn(&[ChordOccurrence]) -> Vec<Edit>) -> String {
        f(&[occurrence(symbol, 0)])
            .pop()
            .map(|e| e.text)
            .unwrap_or_else(|| symbol.to_string())
    }

    #[test]
    fn test_transpose_up_prefers_sharps() {
        let chords = [occurrence("C", 0), occurrence("Eb", 2), occurrence("B7", 5), occurrence("Am", 8)];
        let edits = transpose(&chords, Direction::Up);
        assert_eq!(texts(&edits), vec!["C#", "E", "C7", "A#m"]);
        assert_eq!(edits[2].span, Span::new(5, 7));
    }

    #[test]
    fn test_transpose_down_simplifies() {
        let chords = [occurrence("C", 0), occurrence("F", 2), occurrence("Db", 4), occurrence("A", 7)];
        let edits = transpose(&chords, Direction::Down);
        assert_eq!(texts(&edits), vec!["B", "E", "C", "G#"]);
    }

    #[test]
    fn test_transpose_moves_bass_and_keeps_suffix() {
        let edits = transpose(&[occurrence("Dm7/C", 10)], Direction::Up);
        assert_eq!(
            edits,
            vec![Edit {
                span: Span::new(10, 15),
                text: "D#m7/C#".to_string()
            }]
        );

        assert_eq!(apply("C6/9", |c| transpose(c, Direction::Down)), "B6/9");
    }

    #[test]
    fn test_round_trip_restores_spelling() {
        for symbol in ["C", "C#", "D", "E", "F", "F#m", "G7", "G#", "A", "Bsus4", "E/G#"] {
            let up = apply(symbol, |c| transpose(c, Direction::Up));
            let back = apply(&up, |c| transpose(c, Direction::Down));
            assert_eq!(back, symbol, "{} -> {} -> {}", symbol, up, back);
        }
    }

    #[test]
    fn test_enharmonic_toggle() {
        let chords = [occurrence("C#m", 0), occurrence("Db7", 4), occurrence("G", 8), occurrence("A#/C#", 10)];
        let edits = enharmonic_toggle(&chords);
        assert_eq!(texts(&edits), vec!["Dbm", "C#7", "Bb/Db"]);
    }

    #[test]
    fn test_enharmonic_toggle_is_an_involution() {
        for symbol in ["C#", "Db", "F#m7", "Gbmaj7", "Ab/Eb", "D#dim"] {
            let once = apply(symbol, enharmonic_toggle);
            let twice = apply(&once, enharmonic_toggle);
            assert_ne!(once, symbol);
            assert_eq!(twice, symbol);
        }
    }

    #[test]
    fn test_no_edit_when_nothing_changes() {
        assert!(enharmonic_toggle(&[occurrence("Am", 0), occurrence("G/B", 3)]).is_empty());
        // lower-case tonic with unchanged spelling keeps its case
        assert!(enharmonic_toggle(&[occurrence("em", 0)]).is_empty());
    }

    #[test]
    fn test_transpose_skips_user_defined_shapes() {
        let mut shaped = occurrence("Am", 0);
        shaped.chord.user_shape = Some(UserShape {
            frets: "x02210".to_string(),
            position: 0,
        });
        assert!(transpose(&[shaped.clone()], Direction::Up).is_empty());

        let mut sharp = occurrence("C#", 0);
        sharp.chord.user_shape = shaped.chord.user_shape.clone();
        assert_eq!(texts(&enharmonic_toggle(&[sharp])), vec!["Db"]);
    }

    #[test]
    fn test_malformed_symbols_are_skipped() {
        let broken = ChordOccurrence {
            span: Span::new(0, 5),
            symbol: "Hello".to_string(),
            chord: Chord::default(),
        };
        let chords = [broken, occurrence("G", 6)];
        let edits = transpose(&chords, Direction::Up);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].text, "G#");
        assert!(enharmonic_toggle(&chords[..1]).is_empty());
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("down".parse::<Direction>().unwrap(), Direction::Down);
        assert!(matches!("sideways".parse::<Direction>(), Err(SheetError::ConfigError(_))));
    }
}
