//! # Trainer Configuration
//!
//! Optional YAML file selecting the instrument range, the guitar neck and
//! the default game settings. Every key may be omitted.
//!
//! ```yaml
//! keyboard-range: A0-C8
//! guitar-strings: 6
//! guitar-frets: 25
//! tuning: DADGBE
//! tunings:
//!   - name: Open G
//!     key: DGDGBD
//!     offsets: [-2, -2, 0, 0, 0, -2]
//! game:
//!   signature: F dur
//!   tonesCount: 25
//!   startTone: C4
//!   endTone: C6
//! ```
//!
//! The file is read into [`RawConfig`] and then validated into
//! [`TrainerConfig`]; any problem is reported as [`TutorError::ConfigError`].

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::TutorError;
use crate::game::GameSettings;
use crate::guitar::{
    Fretboard, Tuning, DEFAULT_FRET_COUNT, MAX_FRET_COUNT, MAX_TUNING_OFFSET, STANDARD_STRINGS,
};
use crate::range::InstrumentRange;

/// Configuration as written in YAML.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub keyboard_range: Option<String>,
    pub guitar_strings: Option<usize>,
    pub guitar_frets: Option<usize>,
    pub tuning: Option<String>,
    pub tunings: Option<Vec<Tuning>>,
    pub game: Option<GameSettings>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub keyboard_range: InstrumentRange,
    pub guitar_strings: usize,
    pub guitar_frets: usize,
    pub tuning: Tuning,
    /// Tunings added on top of the built-in presets.
    pub tunings: Vec<Tuning>,
    pub game: GameSettings,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            keyboard_range: InstrumentRange::keyboard(),
            guitar_strings: STANDARD_STRINGS.len(),
            guitar_frets: DEFAULT_FRET_COUNT,
            tuning: Tuning::standard(),
            tunings: Vec::new(),
            game: GameSettings::default(),
        }
    }
}

impl TrainerConfig {
    pub fn from_yaml(content: &str) -> Result<Self, TutorError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| TutorError::ConfigError(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TutorError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| TutorError::ConfigError(format!("{}: {}", path.display(), e)))?;
        debug!("loaded config {}", path.display());
        Self::from_yaml(&content)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, TutorError> {
        let defaults = Self::default();

        let keyboard_range = match &raw.keyboard_range {
            Some(range) => range
                .parse()
                .map_err(|e: TutorError| TutorError::ConfigError(format!("keyboard-range: {}", e)))?,
            None => defaults.keyboard_range,
        };

        let guitar_strings = raw.guitar_strings.unwrap_or(defaults.guitar_strings);
        if guitar_strings == 0 || guitar_strings > STANDARD_STRINGS.len() {
            return Err(TutorError::ConfigError(format!(
                "guitar-strings must be 1-{}, got {}",
                STANDARD_STRINGS.len(),
                guitar_strings
            )));
        }

        let guitar_frets = raw.guitar_frets.unwrap_or(defaults.guitar_frets);
        if guitar_frets == 0 || guitar_frets > MAX_FRET_COUNT {
            return Err(TutorError::ConfigError(format!(
                "guitar-frets must be 1-{}, got {}",
                MAX_FRET_COUNT, guitar_frets
            )));
        }

        let tunings = raw.tunings.unwrap_or_default();
        for tuning in &tunings {
            if tuning.offsets.len() != guitar_strings {
                return Err(TutorError::ConfigError(format!(
                    "tuning '{}' has {} offsets for {} strings",
                    tuning.name,
                    tuning.offsets.len(),
                    guitar_strings
                )));
            }
            if let Some(offset) = tuning.offsets.iter().find(|o| o.abs() > MAX_TUNING_OFFSET) {
                return Err(TutorError::ConfigError(format!(
                    "tuning '{}' offset {} is outside -{max}..={max}",
                    tuning.name,
                    offset,
                    max = MAX_TUNING_OFFSET
                )));
            }
        }

        let tuning = match &raw.tuning {
            Some(key) => find_tuning(key, &tunings)?,
            None if guitar_strings == STANDARD_STRINGS.len() => defaults.tuning,
            None => Tuning {
                offsets: vec![0; guitar_strings],
                ..defaults.tuning
            },
        };
        if tuning.offsets.len() != guitar_strings {
            return Err(TutorError::ConfigError(format!(
                "tuning '{}' does not fit {} strings",
                tuning.name, guitar_strings
            )));
        }

        let game = raw.game.unwrap_or(defaults.game);
        game.validate()
            .map_err(|e| TutorError::ConfigError(format!("game: {}", e)))?;

        Ok(Self {
            keyboard_range,
            guitar_strings,
            guitar_frets,
            tuning,
            tunings,
            game,
        })
    }

    /// Fretboard for the configured neck and tuning.
    pub fn fretboard(&self) -> Result<Fretboard, TutorError> {
        Fretboard::new(self.tuning.clone(), self.guitar_frets)
    }
}

/// Custom tunings shadow built-in presets with the same key.
fn find_tuning(key: &str, custom: &[Tuning]) -> Result<Tuning, TutorError> {
    if let Some(tuning) = custom.iter().find(|t| t.key == key || t.name == key) {
        return Ok(tuning.clone());
    }
    Tuning::by_key(key).map_err(|e| TutorError::ConfigError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::Tone;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(TrainerConfig::from_yaml("").unwrap(), TrainerConfig::default());
        assert_eq!(TrainerConfig::from_yaml("  \n").unwrap(), TrainerConfig::default());
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
keyboard-range: C2-C7
guitar-frets: 13
tuning: Drop D
game:
  signature: F dur
  tonesCount: 25
  tonesTime: 10
  startTone: C4
  endTone: C6
"#;
        let config = TrainerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.keyboard_range.to_string(), "C2-C7");
        assert_eq!(config.guitar_strings, 6);
        assert_eq!(config.guitar_frets, 13);
        assert_eq!(config.tuning.key, "DADGBE");
        assert_eq!(config.game.signature, "F dur");
        assert_eq!(config.game.tones_time, 10);
        assert_eq!(config.game.end_tone, Tone::parse("C6").unwrap());

        let board = config.fretboard().unwrap();
        assert_eq!(board.strings()[0].len(), 13);
        assert_eq!(board.strings()[5][0].tone, Tone::parse("D2").unwrap());
    }

    #[test]
    fn test_custom_tuning() {
        let yaml = r#"
tuning: DGDGBD
tunings:
  - name: Open G
    key: DGDGBD
    offsets: [-2, -2, 0, 0, 0, -2]
"#;
        let config = TrainerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.tuning.name, "Open G");
        let board = config.fretboard().unwrap();
        assert_eq!(board.strings()[0][0].tone, Tone::parse("D4").unwrap());
        assert_eq!(board.strings()[4][0].tone, Tone::parse("G2").unwrap());
    }

    #[test]
    fn test_four_string_neck() {
        let config = TrainerConfig::from_yaml("guitar-strings: 4").unwrap();
        assert_eq!(config.tuning.offsets, vec![0; 4]);
        assert_eq!(config.fretboard().unwrap().strings().len(), 4);

        let err = TrainerConfig::from_yaml("guitar-strings: 4\ntuning: EADGBE").unwrap_err();
        assert!(matches!(err, TutorError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_configs() {
        for yaml in [
            "keyboard-range: C8-A0",
            "guitar-strings: 7",
            "guitar-frets: 0",
            "guitar-frets: 37",
            "tunings:\n  - name: Wild\n    key: EADGBE\n    offsets: [0, 0, 0, 0, 0, 1600]",
            "tuning: XYZ",
            "game:\n  tonesCount: 33",
            "unknown-key: 1",
            "guitar-frets: [1, 2]",
        ] {
            let result = TrainerConfig::from_yaml(yaml);
            assert!(
                matches!(result, Err(TutorError::ConfigError(_))),
                "expected ConfigError for {:?}, got {:?}",
                yaml,
                result
            );
        }
    }
}
