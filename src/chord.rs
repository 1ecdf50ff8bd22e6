//! Chord generation from a root tone and a chord quality.
//!
//! Each quality is a list of semitone offsets from the root. Offsets are
//! applied to the root's chromatic index independently, so every chord tone
//! carries into the next octave on its own:
//!
//! ```text
//! A4 major  = A4 (9+0)  C#5 (9+4 → 1, octave+1)  E5 (9+7 → 4, octave+1)
//! C4 minor7 = C4  D#4  G4  A#4
//! ```
//!
//! Chord tones are always spelled on the sharp scale (Eb → D#).

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::pitch::step_pitch;
use crate::tone::{check_octave, Tone};

/// Chord qualities offered by the chord selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChordQuality {
    Major,
    Minor,
    Major7,
    Minor7,
    Dominant7,
}

pub const CHORD_QUALITIES: [ChordQuality; 5] = [
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Major7,
    ChordQuality::Minor7,
    ChordQuality::Dominant7,
];

/// Labels of the chord root selector. Black keys carry both spellings
/// (`"AbG#"`); the sharp half is the one used for generation.
pub const CHORD_ROOT_LABELS: [&str; 12] = [
    "A", "B", "C", "D", "E", "F", "G", "AbG#", "BbA#", "DbC#", "EbD#", "GbF#",
];

impl ChordQuality {
    /// Semitone offsets from the root, root first.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
        }
    }

    /// Selector label.
    pub fn label(self) -> &'static str {
        match self {
            ChordQuality::Major => "MAJOR",
            ChordQuality::Minor => "MINOR",
            ChordQuality::Major7 => "MAJOR 7th",
            ChordQuality::Minor7 => "MINOR 7th",
            ChordQuality::Dominant7 => "DOMINANT 7th",
        }
    }
}

impl FromStr for ChordQuality {
    type Err = TutorError;

    /// Accepts the selector labels (`"MINOR 7th"`), camelCase names
    /// (`"minor7"`) and the usual chord symbols (`"m7"`, `"maj7"`, `"7"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Symbols are case-sensitive ("M7" vs "m7"), labels are not
        match trimmed {
            "M" | "maj" => return Ok(ChordQuality::Major),
            "m" | "min" | "-" => return Ok(ChordQuality::Minor),
            "M7" | "maj7" => return Ok(ChordQuality::Major7),
            "m7" | "min7" | "-7" => return Ok(ChordQuality::Minor7),
            "7" | "dom7" => return Ok(ChordQuality::Dominant7),
            _ => {}
        }
        match trimmed.to_lowercase().as_str() {
            "major" => Ok(ChordQuality::Major),
            "minor" => Ok(ChordQuality::Minor),
            "major 7th" | "major7" => Ok(ChordQuality::Major7),
            "minor 7th" | "minor7" => Ok(ChordQuality::Minor7),
            "dominant 7th" | "dominant7" => Ok(ChordQuality::Dominant7),
            _ => Err(TutorError::InvalidChordQuality(trimmed.to_string())),
        }
    }
}

/// Generate the tones of a chord, root first, in interval table order.
pub fn generate_chord(root: &Tone, quality: ChordQuality) -> Vec<Tone> {
    let (root_index, octave) = root.chromatic_position();
    let tones: Vec<Tone> = quality
        .intervals()
        .iter()
        .map(|&offset| {
            let (index, octave) = step_pitch(root_index, 12, octave, offset as i32);
            Tone::from_chromatic(index, octave)
        })
        .collect();
    debug!("chord {} {}: {:?}", root, quality.label(), tones);
    tones
}

/// Parse a chord root selector label (`"C"`, `"DbC#"`, `"Bb"`) at an octave.
pub fn parse_chord_root(label: &str, octave: i8) -> Result<Tone, TutorError> {
    let label = label.trim();
    let octave = check_octave(octave)?;
    // Dual labels list the flat first: "AbG#" -> "G#"
    let name = match label.char_indices().nth(2) {
        Some((split, _)) if label.chars().count() == 4 => &label[split..],
        _ => label,
    };
    Tone::parse_spelled(&format!("{}{}", name, octave))
}

/// A chord: root plus quality. Tones are computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub root: Tone,
    pub quality: ChordQuality,
}

impl Chord {
    pub fn new(root: Tone, quality: ChordQuality) -> Self {
        Self { root, quality }
    }

    pub fn tones(&self) -> Vec<Tone> {
        generate_chord(&self.root, self.quality)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quality.label().to_lowercase(), self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tones(names: &[&str]) -> Vec<Tone> {
        names.iter().map(|n| Tone::parse(n).unwrap()).collect()
    }

    #[test]
    fn test_chord_generation() {
        let c4 = Tone::parse("C4").unwrap();
        assert_eq!(generate_chord(&c4, ChordQuality::Major), tones(&["C4", "E4", "G4"]));
        assert_eq!(generate_chord(&c4, ChordQuality::Minor), tones(&["C4", "D#4", "G4"]));
        assert_eq!(
            generate_chord(&c4, ChordQuality::Major7),
            tones(&["C4", "E4", "G4", "B4"])
        );
        assert_eq!(
            generate_chord(&c4, ChordQuality::Minor7),
            tones(&["C4", "D#4", "G4", "A#4"])
        );
        assert_eq!(
            generate_chord(&c4, ChordQuality::Dominant7),
            tones(&["C4", "E4", "G4", "A#4"])
        );
    }

    #[test]
    fn test_chord_octave_carry_per_note() {
        // A MAJOR = [A, C#, E], wrapping into the next octave
        let a4 = Tone::parse("A4").unwrap();
        assert_eq!(generate_chord(&a4, ChordQuality::Major), tones(&["A4", "C#5", "E5"]));
        // A DOMINANT 7th = [A, C#, E, G]
        assert_eq!(
            generate_chord(&a4, ChordQuality::Dominant7),
            tones(&["A4", "C#5", "E5", "G5"])
        );
        let g3 = Tone::parse("G3").unwrap();
        assert_eq!(
            generate_chord(&g3, ChordQuality::Major7),
            tones(&["G3", "B3", "D4", "F#4"])
        );
    }

    #[test]
    fn test_quality_parsing() {
        assert_eq!("MAJOR".parse::<ChordQuality>().unwrap(), ChordQuality::Major);
        assert_eq!("MINOR 7th".parse::<ChordQuality>().unwrap(), ChordQuality::Minor7);
        assert_eq!("dominant 7th".parse::<ChordQuality>().unwrap(), ChordQuality::Dominant7);
        assert_eq!("m7".parse::<ChordQuality>().unwrap(), ChordQuality::Minor7);
        assert_eq!("M7".parse::<ChordQuality>().unwrap(), ChordQuality::Major7);
        assert_eq!("7".parse::<ChordQuality>().unwrap(), ChordQuality::Dominant7);
        assert_eq!(
            "sus4".parse::<ChordQuality>(),
            Err(TutorError::InvalidChordQuality("sus4".to_string()))
        );
        for empty in ["", "   "] {
            assert_eq!(
                empty.parse::<ChordQuality>(),
                Err(TutorError::InvalidChordQuality(String::new()))
            );
        }
        for quality in CHORD_QUALITIES {
            assert_eq!(quality.label().parse::<ChordQuality>().unwrap(), quality);
        }
    }

    #[test]
    fn test_chord_root_labels() {
        assert_eq!(parse_chord_root("C", 4).unwrap(), Tone::parse("C4").unwrap());
        assert_eq!(parse_chord_root("AbG#", 3).unwrap(), Tone::parse("G#3").unwrap());
        assert_eq!(parse_chord_root("Bb", 2).unwrap(), Tone::parse("A#2").unwrap());
        for label in CHORD_ROOT_LABELS {
            assert!(parse_chord_root(label, 4).is_ok(), "label {}", label);
        }
    }

    #[test]
    fn test_chord_root_rejects_bad_labels() {
        for label in ["Aéb", "Aébc", "éééé", "H", ""] {
            assert!(
                matches!(parse_chord_root(label, 4), Err(TutorError::ParseError { .. })),
                "label {:?}",
                label
            );
        }
        for octave in [-1, 10, i8::MIN, i8::MAX] {
            assert!(matches!(
                parse_chord_root("C", octave),
                Err(TutorError::ParseError { .. })
            ));
        }
    }

    #[test]
    fn test_chord_display() {
        let chord = Chord::new(Tone::parse("C#4").unwrap(), ChordQuality::Minor7);
        assert_eq!(chord.to_string(), "minor 7th C#4");
        assert_eq!(chord.tones().len(), 4);
    }
}
