//! # Diagram Resolver
//!
//! Finds a fretboard shape for a parsed chord in a per-instrument database.
//!
//! ## Lookup
//! 1. Tonic key: the first database key (in database order) equal to any of
//!    [`tonic_variations`].
//! 2. Shape, first hit wins:
//!    1. suffix == quality name + `/bass`
//!    2. suffix == any quality alias + `/bass`
//!    3. suffix == quality name
//!    4. suffix == any quality alias
//!
//! Steps 2.1 and 2.2 only apply to slash chords.
//!
//! ## Database Format
//! A flat list of shapes; the order in which keys first appear is kept.
//! ```yaml
//! instrument: guitar
//! chords:
//!   - key: C
//!     suffix: major
//!     frets: x32010
//!   - key: Csharp
//!     suffix: minor
//!     frets: x46654
//!     base-fret: 4
//! ```

use crate::chord::{Chord, UserShape};
use crate::error::SheetError;
use crate::pitch::Pitch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// One fingering from the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FretShape {
    /// Tonic spelling as the database writes it (`C`, `Csharp`, `Eb`)
    pub key: String,
    /// Quality suffix, possibly with `/bass`
    pub suffix: String,
    pub frets: String,
    #[serde(default = "default_base_fret")]
    pub base_fret: u32,
}

fn default_base_fret() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawShapeDatabase {
    instrument: String,
    #[serde(default)]
    chords: Vec<FretShape>,
}

/// Shapes for one instrument, grouped by tonic key.
///
/// Read-only once loaded; share it by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeDatabase {
    pub instrument: String,
    keys: Vec<String>,
    chords: HashMap<String, Vec<FretShape>>,
}

impl ShapeDatabase {
    pub fn new(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            ..Self::default()
        }
    }

    /// Add a shape after all shapes already filed under its key
    pub fn insert(&mut self, shape: FretShape) {
        if !self.chords.contains_key(&shape.key) {
            self.keys.push(shape.key.clone());
        }
        self.chords.entry(shape.key.clone()).or_default().push(shape);
    }

    pub fn from_json(content: &str) -> Result<Self, SheetError> {
        let raw: RawShapeDatabase =
            serde_json::from_str(content).map_err(|e| SheetError::ShapeDatabaseError(e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_yaml(content: &str) -> Result<Self, SheetError> {
        let raw: RawShapeDatabase =
            serde_yaml::from_str(content).map_err(|e| SheetError::ShapeDatabaseError(e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    /// Load from a `.json` file, or YAML for any other extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SheetError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    fn from_raw(raw: RawShapeDatabase) -> Self {
        let mut database = Self::new(raw.instrument);
        for shape in raw.chords {
            database.insert(shape);
        }
        debug!(
            instrument = %database.instrument,
            keys = database.keys.len(),
            shapes = database.len(),
            "loaded shape database"
        );
        database
    }

    /// Tonic keys in the order they first appeared
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn shapes(&self, key: &str) -> &[FretShape] {
        self.chords.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of shapes
    pub fn len(&self) -> usize {
        self.chords.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Spellings of a tonic to try against database keys: as written,
/// simplified, enharmonic, and the first of those containing `#` with the
/// sign spelled out as `sharp`.
///
/// # Examples
/// ```
/// use chordsheet::diagram::tonic_variations;
///
/// assert_eq!(tonic_variations("C#"), vec!["C#", "C#", "Db", "Csharp"]);
/// assert_eq!(tonic_variations("Eb"), vec!["Eb", "Eb", "D#", "Dsharp"]);
/// assert_eq!(tonic_variations("H"), vec!["H"]);
/// ```
pub fn tonic_variations(tonic: &str) -> Vec<String> {
    let mut variations = vec![tonic.to_string()];
    if let Some(pitch) = Pitch::parse(tonic) {
        variations.push(pitch.simplify().to_string());
        variations.push(pitch.enharmonic().to_string());
    }
    let spelled = variations
        .iter()
        .find(|v| v.contains('#'))
        .map(|sharp| sharp.replacen('#', "sharp", 1));
    variations.extend(spelled);
    variations
}

/// Best database shape for `chord`, or `None` when the tonic key or the
/// quality is missing.
pub fn resolve_shape<'a>(chord: &Chord, database: &'a ShapeDatabase) -> Option<&'a FretShape> {
    let variations = tonic_variations(&chord.tonic);
    let Some(key) = database.keys().find(|key| variations.iter().any(|v| v == key)) else {
        trace!(tonic = %chord.tonic, "no database key for tonic");
        return None;
    };
    let shapes = database.shapes(key);

    let exact = |suffix: &str| shapes.iter().find(|shape| shape.suffix == suffix);
    let alias = |bass_suffix: &str| {
        shapes.iter().find(|shape| {
            chord
                .quality_aliases
                .iter()
                .any(|alias| shape.suffix.strip_suffix(bass_suffix) == Some(alias.as_str()))
        })
    };

    let found = match &chord.bass {
        Some(bass) => {
            let bass_suffix = format!("/{}", bass);
            exact(&format!("{}{}", chord.quality, bass_suffix)).or_else(|| alias(&bass_suffix))
        }
        None => None,
    };
    let found = found.or_else(|| exact(&chord.quality)).or_else(|| alias(""));
    if found.is_none() {
        trace!(tonic = %chord.tonic, quality = %chord.quality, key, "no shape for quality");
    }
    found
}

/// The shape to draw for a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagram<'a> {
    /// Fingering written next to the chord in the sheet
    UserDefined(&'a UserShape),
    Database(&'a FretShape),
}

impl Diagram<'_> {
    pub fn frets(&self) -> &str {
        match self {
            Diagram::UserDefined(shape) => &shape.frets,
            Diagram::Database(shape) => &shape.frets,
        }
    }

    /// Barre position or base fret; 0 when a user shape gives none
    pub fn position(&self) -> u32 {
        match self {
            Diagram::UserDefined(shape) => shape.position,
            Diagram::Database(shape) => shape.base_fret,
        }
    }
}

/// A user-defined shape when the sheet has one, otherwise the database match
pub fn chord_diagram<'a>(chord: &'a Chord, database: &'a ShapeDatabase) -> Option<Diagram<'a>> {
    match &chord.user_shape {
        Some(shape) => Some(Diagram::UserDefined(shape)),
        None => resolve_shape(chord, database).map(Diagram::Database),
    }
}
