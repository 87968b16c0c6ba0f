//! # chordsheet
//!
//! Parses plain-text chord sheets (lyrics mixed with chord symbols, headers,
//! rhythm marks and annotations) into typed tokens, and works with the chords
//! it finds: transposition, enharmonic respelling and fret-shape lookup.
//!
//! ## Pipeline
//! ```text
//! line + offset ──tokenize_line──> TokenizedLine ──chord_occurrences──> [ChordOccurrence]
//!                     │                                                   │
//!                parse_chord                                   transpose / enharmonic_toggle
//!                                                                         │
//!                                                                      [Edit]
//! Chord + ShapeDatabase ──resolve_shape──> FretShape
//! ```
//!
//! Everything here is synchronous and free of shared mutable state; lines can
//! be tokenized independently and a [`ShapeDatabase`] can be shared freely.

pub mod chord;
pub mod config;
pub mod diagram;
pub mod error;
pub mod lexer;
pub mod pitch;
pub mod sheet;
pub mod span;
pub mod token;
pub mod transpose;

pub use chord::{parse_chord, Chord, UserShape};
pub use config::SheetConfig;
pub use diagram::{chord_diagram, resolve_shape, Diagram, FretShape, ShapeDatabase};
pub use error::*;
pub use lexer::tokenize_line;
pub use sheet::{chord_occurrences, tokenize_sheet, unique_chords};
pub use span::{Part, Span};
pub use token::{ChordOccurrence, Token, TokenKind, TokenizedLine};
pub use transpose::{enharmonic_toggle, transpose, Direction, Edit};
