//! # Error Types
//!
//! All fallible operations of the crate return [`TutorError`].
//!
//! None of these errors is fatal: every operation is a pure function, so the
//! caller recovers by re-invoking with corrected input.
//!
//! ## Error Types
//! - `ParseError` - malformed tone token (`"H4"`, `"C#"`, `"C10"`)
//! - `InvalidChordQuality` - unknown chord quality label
//! - `InvalidSignatureName` - unknown key signature name
//! - `InvalidTuning` - tuning offsets that don't fit the string count
//! - `ConfigError` - invalid YAML trainer configuration
//! - `EmptyRange` - a game range that produced no tones
//!
//! ## Usage
//! ```rust
//! use pianotutor::{Tone, TutorError};
//!
//! match "H4".parse::<Tone>() {
//!     Ok(tone) => println!("{}", tone),
//!     Err(TutorError::ParseError { token, message }) => {
//!         eprintln!("Ignoring '{}': {}", token, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TutorError {
    /// Malformed tone token.
    ///
    /// # Example
    /// ```
    /// # use pianotutor::TutorError;
    /// let err = TutorError::ParseError {
    ///     token: "H4".to_string(),
    ///     message: "unknown letter 'H'".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Parse error in 'H4': unknown letter 'H'");
    /// ```
    #[error("Parse error in '{token}': {message}")]
    ParseError { token: String, message: String },

    /// Unknown chord quality key.
    #[error("Invalid chord quality: {0}")]
    InvalidChordQuality(String),

    /// Unknown key signature name.
    #[error("Invalid key signature: {0}")]
    InvalidSignatureName(String),

    /// Tuning offsets that can't be applied to the requested strings.
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    /// Invalid trainer configuration.
    ///
    /// # Example
    /// ```
    /// # use pianotutor::TutorError;
    /// let err = TutorError::ConfigError("guitar-frets must be at least 1".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: guitar-frets must be at least 1");
    /// ```
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A tone range that resulted in an empty list.
    ///
    /// The range generator itself returns an empty `Vec`; this variant is
    /// raised by callers (the tone game) that can't proceed without tones.
    #[error("Tones range {start}-{end} results in empty list")]
    EmptyRange { start: String, end: String },
}

impl TutorError {
    pub(crate) fn parse(token: &str, message: impl Into<String>) -> Self {
        TutorError::ParseError {
            token: token.to_string(),
            message: message.into(),
        }
    }
}
