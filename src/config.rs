//! # Sheet Settings
//!
//! Loaded from YAML with kebab-case keys. Every key is optional.
//!
//! ```yaml
//! chord-line-marker: "%c"
//! text-line-marker: "%t"
//! instrument: ukulele
//! show-chord-overview: false
//! ```
//!
//! Only the markers (and the instrument, for picking a shape database) affect
//! parsing. The display toggles are carried for the renderer.

use crate::error::SheetError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Put at the end of a line to force it to be a chord line
    pub chord_line_marker: String,
    /// Put at the end of a line to force it to be a text line
    pub text_line_marker: String,
    pub instrument: String,
    pub show_chord_diagrams_on_hover: bool,
    pub show_chord_overview: bool,
    pub diagram_width: u32,
    pub highlight_chords: bool,
    pub highlight_section_headers: bool,
    pub highlight_rhythm_markers: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            chord_line_marker: "%c".to_string(),
            text_line_marker: "%t".to_string(),
            instrument: "guitar".to_string(),
            show_chord_diagrams_on_hover: true,
            show_chord_overview: true,
            diagram_width: 100,
            highlight_chords: true,
            highlight_section_headers: true,
            highlight_rhythm_markers: true,
        }
    }
}

impl SheetConfig {
    /// Parse and validate YAML settings
    pub fn from_yaml(content: &str) -> Result<Self, SheetError> {
        let config: SheetConfig =
            serde_yaml::from_str(content).map_err(|e| SheetError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SheetError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Markers must be non-empty and distinct, otherwise a line could never
    /// be told apart from the other kind
    pub fn validate(&self) -> Result<(), SheetError> {
        if self.chord_line_marker.is_empty() {
            return Err(SheetError::ConfigError("chord-line-marker must not be empty".to_string()));
        }
        if self.text_line_marker.is_empty() {
            return Err(SheetError::ConfigError("text-line-marker must not be empty".to_string()));
        }
        if self.chord_line_marker == self.text_line_marker {
            return Err(SheetError::ConfigError(format!(
                "chord-line-marker and text-line-marker are both '{}'",
                self.chord_line_marker
            )));
        }
        if self.diagram_width == 0 {
            return Err(SheetError::ConfigError("diagram-width must be positive".to_string()));
        }
        Ok(())
    }
}
