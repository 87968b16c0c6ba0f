//! # Chord Model and Chord Symbol Parser
//!
//! Turns a bare word such as `Am7`, `F#m7b5/E` or `Cmaj7` into a [`Chord`].
//!
//! ## Grammar
//! ```text
//! symbol  = tonic suffix [ "/" bass ]
//! tonic   = letter [ "#"+ | "b"+ ]        letter is A-G in either case
//! suffix  = any alias from the quality dictionary (may be empty)
//! bass    = tonic
//! ```
//!
//! A slash only introduces a bass note when what follows it is exactly a
//! pitch name; `C6/9` keeps `6/9` as its suffix.
//!
//! ## Supported Qualities
//! - **Triads**: `""`/`M`/`maj`, `m`/`min`/`-`, `dim`/`°`/`o`, `aug`/`+`
//! - **Sixths**: `6`, `m6`, `69`/`6/9`, `m69`
//! - **Sevenths**: `7`, `maj7`/`Δ`, `m7`, `m7b5`/`ø`, `dim7`, `mmaj7`, `7#5`, `7b5`
//! - **Suspended**: `sus2`, `sus4`/`sus`, `7sus4`
//! - **Extended**: `9`, `maj9`, `m9`, `11`, `m11`, `13`, `maj13`, `m13`
//! - **Altered**: `7b9`, `7#9`, `7#11`, `9#11`, `alt`
//! - **Other**: `5`, `add9`, `madd9`
//!
//! Each quality keeps its full alias list because fret-shape databases spell
//! suffixes their own way (`mmaj7` vs `mM7`); see [`crate::diagram`].
//!
//! This layer does not know about lyrics. `A` and `Do` are chords here; the
//! tokenizer decides from the rest of the line whether to treat them as such.

use crate::pitch::Pitch;
use serde::Serialize;

/// A parsed chord symbol.
///
/// `tonic` is non-empty exactly when the symbol was recognised as a chord. The
/// only way to get an unrecognised `Chord` is a user-defined shape whose symbol
/// does not parse (`C*4[3|x32010]`): the shape is still usable even though the
/// symbol means nothing to the parser.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chord {
    pub tonic: String,
    pub quality: String,
    pub quality_aliases: Vec<String>,
    pub bass: Option<String>,
    pub user_shape: Option<UserShape>,
}

/// Fingering written directly in the sheet, e.g. `Dm6[4|x2x132]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserShape {
    /// Fret per string; `x` mutes, `_` marks a barre boundary
    pub frets: String,
    /// Barre position, 0 when not given
    pub position: u32,
}

impl Chord {
    pub fn is_recognized(&self) -> bool {
        !self.tonic.is_empty()
    }

    pub fn tonic_pitch(&self) -> Option<Pitch> {
        Pitch::parse(&self.tonic)
    }

    pub fn bass_pitch(&self) -> Option<Pitch> {
        self.bass.as_deref().and_then(Pitch::parse)
    }
}

/// A chord quality with its canonical name and accepted suffix spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

const fn quality(name: &'static str, aliases: &'static [&'static str]) -> Quality {
    Quality { name, aliases }
}

/// Quality dictionary. Aliases are matched case-sensitively (`M7` is not `m7`).
pub const QUALITIES: &[Quality] = &[
    // Triads and dyads
    quality("major", &["M", "^", "", "maj"]),
    quality("minor", &["m", "min", "-"]),
    quality("augmented", &["aug", "+", "+5", "^#5"]),
    quality("minor augmented", &["m#5", "-#5", "m+"]),
    quality("diminished", &["dim", "°", "o"]),
    quality("fifth", &["5"]),
    quality("suspended fourth", &["sus4", "sus"]),
    quality("suspended second", &["sus2"]),
    quality("added ninth", &["add9", "add2"]),
    quality("minor added ninth", &["madd9", "m(add9)", "madd2"]),
    // Sixths
    quality("sixth", &["6", "add6", "add13", "M6"]),
    quality("minor sixth", &["m6", "-6"]),
    quality("sixth added ninth", &["69", "6add9", "6/9", "M69"]),
    quality("minor sixth added ninth", &["m69", "-69", "m6/9"]),
    // Sevenths
    quality("major seventh", &["maj7", "Δ", "ma7", "M7", "Maj7", "^7", "Δ7"]),
    quality("minor seventh", &["m7", "min7", "mi7", "-7"]),
    quality("dominant seventh", &["7", "dom"]),
    quality("half-diminished", &["m7b5", "ø", "-7b5", "h7", "h"]),
    quality("diminished seventh", &["dim7", "°7", "o7"]),
    quality(
        "minor/major seventh",
        &["mmaj7", "m/ma7", "m/maj7", "mM7", "mMaj7", "m/M7", "-Δ7", "mΔ", "-^7", "-maj7"],
    ),
    quality("minor/major seventh flat fifth", &["mmaj7b5", "mM7b5"]),
    quality("augmented seventh", &["maj7#5", "maj7+5", "+maj7", "^7#5"]),
    quality("augmented dominant seventh", &["aug7", "7#5", "+7", "7+", "7aug"]),
    quality("dominant flat fifth", &["7b5"]),
    quality("major seventh flat fifth", &["maj7b5", "M7b5"]),
    quality("suspended fourth seventh", &["7sus4", "7sus"]),
    // Extended and altered
    quality("dominant ninth", &["9"]),
    quality("major ninth", &["maj9", "Δ9", "^9", "M9"]),
    quality("minor ninth", &["m9", "-9", "min9"]),
    quality("minor/major ninth", &["mmaj9", "mM9", "mMaj9", "-^9"]),
    quality("augmented ninth", &["aug9", "9#5", "+9"]),
    quality("ninth flat fifth", &["9b5"]),
    quality("dominant flat ninth", &["7b9"]),
    quality("dominant sharp ninth", &["7#9"]),
    quality("eleventh", &["11", "_11"]),
    quality("major eleventh", &["maj11", "M11"]),
    quality("minor eleventh", &["m11", "-11"]),
    quality("minor/major eleventh", &["mmaj11", "mM11"]),
    quality("lydian dominant seventh", &["7#11", "7#4"]),
    quality("ninth sharp eleventh", &["9#11", "_9#11"]),
    quality("major seventh sharp eleventh", &["maj7#11", "Δ#11", "M7#11", "^7#11", "maj#4"]),
    quality("dominant thirteenth", &["13"]),
    quality("major thirteenth", &["maj13", "Maj13", "^13"]),
    quality("minor thirteenth", &["m13", "-13"]),
    quality("altered", &["alt", "alt7"]),
];

impl Quality {
    /// Find the quality a suffix spells, if any
    pub fn lookup(suffix: &str) -> Option<&'static Quality> {
        QUALITIES.iter().find(|q| q.aliases.contains(&suffix))
    }
}

/// A chord symbol cut into its written pieces.
///
/// The slices borrow from the symbol so callers can rebuild it with some
/// pieces replaced (see [`crate::transpose`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolParts<'a> {
    pub tonic: Pitch,
    pub tonic_text: &'a str,
    pub suffix: &'a str,
    pub bass: Option<(Pitch, &'a str)>,
}

/// Split a symbol into tonic, suffix and bass without judging the suffix.
///
/// Returns `None` only when the symbol does not start with a pitch name.
///
/// # Examples
/// ```
/// use chordsheet::chord::split_symbol;
///
/// let parts = split_symbol("Dbmaj7/F").unwrap();
/// assert_eq!(parts.tonic_text, "Db");
/// assert_eq!(parts.suffix, "maj7");
/// assert_eq!(parts.bass.map(|(_, text)| text), Some("F"));
///
/// // Not a pitch after the slash: stays in the suffix
/// assert_eq!(split_symbol("C6/9").unwrap().suffix, "6/9");
/// assert!(split_symbol("Hello").is_none());
/// ```
pub fn split_symbol(symbol: &str) -> Option<SymbolParts<'_>> {
    let (tonic, consumed) = Pitch::parse_prefix(symbol)?;
    let tonic_text = &symbol[..consumed];
    let rest = &symbol[consumed..];

    let (suffix, bass) = match rest.rsplit_once('/') {
        Some((suffix, bass_text)) => match Pitch::parse(bass_text) {
            Some(bass) => (suffix, Some((bass, bass_text))),
            None => (rest, None),
        },
        None => (rest, None),
    };

    Some(SymbolParts {
        tonic,
        tonic_text,
        suffix,
        bass,
    })
}

/// Parse a chord symbol.
///
/// Returns `None` for anything that is not a chord: no tonic letter, or a
/// suffix outside the quality dictionary.
///
/// # Examples
/// ```
/// use chordsheet::parse_chord;
///
/// let chord = parse_chord("Am7/G").unwrap();
/// assert_eq!(chord.tonic, "A");
/// assert_eq!(chord.quality, "minor seventh");
/// assert_eq!(chord.bass.as_deref(), Some("G"));
///
/// assert_eq!(parse_chord("e").unwrap().quality, "major");
/// assert!(parse_chord("Hello").is_none());
/// assert!(parse_chord("Ana").is_none());
/// ```
pub fn parse_chord(symbol: &str) -> Option<Chord> {
    let parts = split_symbol(symbol)?;
    let quality = Quality::lookup(parts.suffix)?;

    Some(Chord {
        tonic: parts.tonic.to_string(),
        quality: quality.name.to_string(),
        quality_aliases: quality.aliases.iter().map(|a| a.to_string()).collect(),
        bass: parts.bass.map(|(bass, _)| bass.to_string()),
        user_shape: None,
    })
}
