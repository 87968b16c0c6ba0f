//! Integration tests for chordsheet
//!
//! Tests the pipeline from sheet text to tokens, edits and fret shapes.

use chordsheet::{
    chord_diagram, chord_occurrences, enharmonic_toggle, resolve_shape, tokenize_line, tokenize_sheet, transpose,
    unique_chords, Direction, Edit, ShapeDatabase, SheetConfig, SheetError, TokenKind,
};
use std::io::Write;
use tempfile::NamedTempFile;

const SONG: &str = r#"[Intro]
Am G F C

[Verse 1]
Am         G
Hello darkness my old friend
[C]I've come to [F#m7 softly]talk with you again
| Dm / / / | E7sus4 / E7 / | %c
A Ana e a Ema %t
"#;

fn apply(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| std::cmp::Reverse(e.span.start));
    let mut text = source.to_string();
    for edit in edits {
        text.replace_range(edit.span.start..edit.span.end, &edit.text);
    }
    text
}

fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_sheet_classification() {
    let lines = tokenize_sheet(SONG, &SheetConfig::default());
    let chord_lines: Vec<bool> = lines.iter().map(|l| l.is_chord_line).collect();
    assert_eq!(
        chord_lines,
        vec![false, true, false, false, true, false, false, true, false, false]
    );
}

#[test]
fn test_sheet_is_lossless() {
    let lines = tokenize_sheet(SONG, &SheetConfig::default());
    let rebuilt: Vec<String> = lines.iter().map(|l| l.text()).collect();
    assert_eq!(rebuilt.join("\n"), SONG);
}

#[test]
fn test_chord_spans_are_document_global() {
    let lines = tokenize_sheet(SONG, &SheetConfig::default());
    let occurrences = chord_occurrences(&lines);
    assert_eq!(occurrences.len(), 11);
    for occurrence in &occurrences {
        assert_eq!(&SONG[occurrence.span.start..occurrence.span.end], occurrence.symbol);
    }
}

#[test]
fn test_transpose_sheet_up_and_back() {
    let lines = tokenize_sheet(SONG, &SheetConfig::default());
    let up = apply(SONG, transpose(&chord_occurrences(&lines), Direction::Up));
    assert!(up.contains("A#m G# F# C#"));
    assert!(up.contains("[C#]I've come to [Gm7 softly]talk"));
    assert!(up.contains("| D#m / / / | F7sus4 / F7 / | %c"));
    // lyrics on text lines are untouched
    assert!(up.contains("Hello darkness my old friend"));
    assert!(up.contains("A Ana e a Ema %t"));

    let lines = tokenize_sheet(&up, &SheetConfig::default());
    let back = apply(&up, transpose(&chord_occurrences(&lines), Direction::Down));
    assert_eq!(back, SONG);
}

#[test]
fn test_enharmonic_toggle_sheet() {
    let source = "C# Gb/Bb Am";
    let lines = tokenize_sheet(source, &SheetConfig::default());
    let toggled = apply(source, enharmonic_toggle(&chord_occurrences(&lines)));
    assert_eq!(toggled, "Db F#/A# Am");
}

#[test]
fn test_user_defined_chord_survives_transpose() {
    let line = tokenize_line("Am[x02210] C", 0, "%c", "%t");
    let edits = transpose(&line.chord_occurrences(), Direction::Up);
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].text, "C#");
}

#[test]
fn test_config_from_file_changes_markers() {
    let file = write_temp("chord-line-marker: '[chords!]'\ntext-line-marker: '[text!]'\n", ".yaml");
    let config = SheetConfig::from_file(file.path()).unwrap();

    let lines = tokenize_sheet("Am G F (comment that breaks chord detection) C [chords!]", &config);
    assert_eq!(lines[0].chords().count(), 4);
    let marker = lines[0].tokens.last().unwrap();
    assert_eq!(marker.kind, TokenKind::Marker);
    assert_eq!(marker.text, "[chords!]");

    // the default marker is now just text
    let lines = tokenize_sheet("Hello there %c", &config);
    assert!(lines[0].tokens.iter().all(|t| t.kind != TokenKind::Marker));
}

#[test]
fn test_config_file_errors() {
    let err = SheetConfig::from_file("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, SheetError::IoError { .. }));

    let file = write_temp("chord-line-marker: '%t'\n", ".yaml");
    let err = SheetConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, SheetError::ConfigError(_)));
}

#[test]
fn test_chord_overview_with_database_file() {
    let db_json = r#"{
        "instrument": "guitar",
        "chords": [
            {"key": "A", "suffix": "minor", "frets": "x02210"},
            {"key": "G", "suffix": "major", "frets": "320003"},
            {"key": "F", "suffix": "major", "frets": "133211", "base-fret": 1},
            {"key": "Fsharp", "suffix": "m7", "frets": "242222", "base-fret": 2}
        ]
    }"#;
    let file = write_temp(db_json, ".json");
    let database = ShapeDatabase::from_file(file.path()).unwrap();

    let lines = tokenize_sheet(SONG, &SheetConfig::default());
    let overview: Vec<(String, Option<String>)> = unique_chords(&lines)
        .into_iter()
        .map(|token| {
            let chord = &token.chord_info().unwrap().chord;
            (token.text.clone(), chord_diagram(chord, &database).map(|d| d.frets().to_string()))
        })
        .collect();

    assert_eq!(overview[0], ("Am".to_string(), Some("x02210".to_string())));
    assert_eq!(overview[1], ("G".to_string(), Some("320003".to_string())));
    assert!(overview.contains(&("[F#m7 softly]".to_string(), Some("242222".to_string()))));
    assert!(overview.contains(&("C".to_string(), None)));
}

#[test]
fn test_database_yaml_file() {
    let yaml = "instrument: ukulele\nchords:\n  - key: C\n    suffix: major\n    frets: '0003'\n";
    let file = write_temp(yaml, ".yaml");
    let database = ShapeDatabase::from_file(file.path()).unwrap();
    let chord = chordsheet::parse_chord("C").unwrap();
    assert_eq!(resolve_shape(&chord, &database).unwrap().frets, "0003");
}

#[test]
fn test_tokens_serialize_to_json() {
    let line = tokenize_line("[Am]Hello", 10, "%c", "%t");
    let json = serde_json::to_value(&line).unwrap();
    assert_eq!(json["isChordLine"], false);
    let chord = &json["tokens"][0];
    assert_eq!(chord["type"], "chord");
    assert_eq!(chord["span"]["start"], 10);
    assert_eq!(chord["chord"]["tonic"], "A");
    assert_eq!(chord["chord"]["quality"], "minor");
    assert_eq!(chord["symbol"]["span"]["start"], 1);
    assert_eq!(chord["inlineChord"]["close"]["text"], "]");
}
