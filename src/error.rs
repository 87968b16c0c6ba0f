//! # Error Types
//!
//! Errors for the parts of the crate that touch the outside world: settings,
//! the fret-shape database and the files the binary reads and writes.
//!
//! The tokenizer, chord parser, transposition engine and diagram resolver never
//! produce these. A word that is not a chord becomes a word token, a chord with
//! no shape resolves to `None`, and a chord that cannot be transposed simply
//! yields no edit.
//!
//! ## Error Types
//! - `ConfigError` - Invalid settings (empty or clashing line markers, bad YAML)
//! - `ShapeDatabaseError` - A fret-shape database that could not be decoded
//! - `IoError` - A file the binary could not read or write
//!
//! ## Usage
//! ```rust
//! use chordsheet::{SheetConfig, SheetError};
//!
//! match SheetConfig::from_yaml("chord-line-marker: ''") {
//!     Ok(_) => unreachable!(),
//!     Err(SheetError::ConfigError(message)) => assert!(message.contains("chord-line-marker")),
//!     Err(e) => panic!("unexpected error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    /// Invalid settings.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::SheetError;
    /// let err = SheetError::ConfigError("text-line-marker must not be empty".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: text-line-marker must not be empty");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The fret-shape database could not be decoded.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::SheetError;
    /// let err = SheetError::ShapeDatabaseError("missing field `suffix`".to_string());
    /// assert_eq!(err.to_string(), "Invalid shape database: missing field `suffix`");
    /// ```
    #[error("Invalid shape database: {0}")]
    ShapeDatabaseError(String),

    /// A file could not be read or written.
    #[error("I/O error on '{path}': {message}")]
    IoError { path: String, message: String },
}
