//! # Tone
//!
//! The atomic pitch unit: a natural letter, an optional sharp and an octave
//! number (`C#4`). Every other module consumes and produces tones.
//!
//! ## Equality (CRITICAL)
//! Two tones are equal only if letter, accidental and octave all match.
//! There is no enharmonic normalisation: `E#4 != F4`. The games match a key
//! press against one specific spelling, and the key-signature transposer
//! produces spellings like `E#` on purpose.
//!
//! ## Token Format
//! - Strict ([`Tone::parse`], `FromStr`): `<letter>[#]<octave>`, e.g. `C4`, `F#2`
//! - Spelled ([`Tone::parse_spelled`]): also accepts flats and lower-case letters,
//!   converting flats to the sharp enharmonic: `Bb4` → `A#4`, `Cb4` → `B3`
//!
//! ## Example
//! ```rust
//! use pianotutor::Tone;
//!
//! let tone: Tone = "C#4".parse()?;
//! assert_eq!(tone.to_string(), "C#4");
//! assert_eq!(tone.to_string_with_flat(true), "C#/Db4");
//! assert_eq!(tone.chromatic_index(), 1);
//! # Ok::<(), pianotutor::TutorError>(())
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TutorError;
use crate::pitch::{
    chromatic_spelling, flat_to_sharp, sharp_to_flat, step_pitch, Accidental, BlackKeyPosition,
    Letter,
};

/// Highest octave digit accepted by the parser.
pub const MAX_OCTAVE: i8 = 9;

/// Reject octaves outside `0..=MAX_OCTAVE`.
pub fn check_octave(octave: i8) -> Result<i8, TutorError> {
    if (0..=MAX_OCTAVE).contains(&octave) {
        Ok(octave)
    } else {
        Err(TutorError::parse(
            &octave.to_string(),
            format!("octave must be 0-{}", MAX_OCTAVE),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tone {
    letter: Letter,
    accidental: Accidental,
    octave: i8,
}

impl Tone {
    pub const fn new(letter: Letter, accidental: Accidental, octave: i8) -> Self {
        Self {
            letter,
            accidental,
            octave,
        }
    }

    pub const fn natural(letter: Letter, octave: i8) -> Self {
        Self::new(letter, Accidental::Natural, octave)
    }

    pub const fn sharp(letter: Letter, octave: i8) -> Self {
        Self::new(letter, Accidental::Sharp, octave)
    }

    /// Tone at a chromatic index of the sharp scale (wraps past 11 without
    /// touching the octave; use [`step_pitch`] to carry).
    pub fn from_chromatic(index: usize, octave: i8) -> Self {
        let (letter, accidental) = chromatic_spelling(index);
        Self::new(letter, accidental, octave)
    }

    pub fn middle_c() -> Self {
        Self::natural(Letter::C, 4)
    }

    /// Parse a strict `<letter>[#]<octave>` token.
    pub fn parse(token: &str) -> Result<Self, TutorError> {
        parse_token(token, false)
    }

    /// Parse a token that may use flats (`Bb4`) or lower-case letters.
    pub fn parse_spelled(token: &str) -> Result<Self, TutorError> {
        parse_token(token, true)
    }

    pub fn letter(&self) -> Letter {
        self.letter
    }

    pub fn accidental(&self) -> Accidental {
        self.accidental
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    pub fn is_sharp(&self) -> bool {
        self.accidental == Accidental::Sharp
    }

    /// Name without octave, e.g. `C#`.
    pub fn name(&self) -> String {
        format!("{}{}", self.letter.as_char(), self.accidental.symbol())
    }

    /// Position in the 12-tone sharp chromatic scale (C = 0 … B = 11).
    ///
    /// `E#` and `B#` report the index of their enharmonic natural (F, C).
    pub fn chromatic_index(&self) -> usize {
        ((self.letter.semitone() + self.accidental.semitones()) % 12) as usize
    }

    /// Chromatic index together with the octave it really belongs to:
    /// `B#4` sounds as C5, so it reports `(0, 5)`.
    pub fn chromatic_position(&self) -> (usize, i8) {
        let raw = self.letter.semitone() + self.accidental.semitones();
        step_pitch(0, 12, self.octave, raw as i32)
    }

    /// Absolute semitone number where C0 = 0 (A0 = 9, C4 = 48, C8 = 96).
    pub fn pitch(&self) -> i32 {
        let (index, octave) = self.chromatic_position();
        octave as i32 * 12 + index as i32
    }

    /// Which side of the neighbouring black key this natural sits on.
    /// Sharps map straight onto black keys and return `None`.
    pub fn black_key_position(&self) -> Option<BlackKeyPosition> {
        match self.accidental {
            Accidental::Natural => Some(self.letter.black_key_position()),
            Accidental::Sharp => None,
        }
    }

    /// Shift by a number of semitones, respelled on the sharp scale.
    pub fn transpose(&self, semitones: i32) -> Self {
        let (index, octave) = self.chromatic_position();
        let (index, octave) = step_pitch(index, 12, octave, semitones);
        Self::from_chromatic(index, octave)
    }

    /// Canonical string, optionally with the flat alias of a sharp:
    /// `C#4` → `C#/Db4`.
    pub fn to_string_with_flat(&self, with_flat: bool) -> String {
        match (with_flat, self.accidental, sharp_to_flat(self.letter)) {
            (true, Accidental::Sharp, Some(flat)) => format!("{}/{}{}", self.name(), flat, self.octave),
            _ => self.to_string(),
        }
    }
}

fn parse_token(token: &str, allow_flats: bool) -> Result<Tone, TutorError> {
    let trimmed = token.trim();
    let mut chars = trimmed.chars().peekable();

    let letter_char = chars
        .next()
        .ok_or_else(|| TutorError::parse(token, "empty token"))?;
    let letter = match Letter::from_char(letter_char) {
        Some(letter) if allow_flats || letter_char.is_ascii_uppercase() => letter,
        _ => {
            return Err(TutorError::parse(
                token,
                format!("unknown letter '{}'", letter_char),
            ))
        }
    };

    let mut flat = false;
    let mut accidental = Accidental::Natural;
    match chars.peek() {
        Some('#') => {
            accidental = Accidental::Sharp;
            chars.next();
        }
        Some('b') if allow_flats => {
            flat = true;
            chars.next();
        }
        _ => {}
    }

    let rest: String = chars.collect();
    if rest.is_empty() {
        return Err(TutorError::parse(token, "missing octave"));
    }
    if !rest.chars().all(|c| c.is_ascii_digit()) {
        return Err(TutorError::parse(token, format!("unexpected '{}'", rest)));
    }
    let octave = rest
        .parse()
        .ok()
        .and_then(|o| check_octave(o).ok())
        .ok_or_else(|| TutorError::parse(token, format!("octave must be 0-{}", MAX_OCTAVE)))?;

    if flat {
        let (letter, accidental, octave_delta) = flat_to_sharp(letter);
        return Ok(Tone::new(letter, accidental, octave + octave_delta));
    }
    Ok(Tone::new(letter, accidental, octave))
}

/// Split free text like `"C4 e4, Gb4"` into tones (flats allowed).
///
/// Used by the custom chord input; the first malformed token fails the
/// whole list so the user can correct it.
pub fn parse_tone_list(input: &str) -> Result<Vec<Tone>, TutorError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(Tone::parse_spelled)
        .collect()
}

impl FromStr for Tone {
    type Err = TutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::parse(s)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.letter.as_char(), self.accidental.symbol(), self.octave)
    }
}

impl Ord for Tone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pitch()
            .cmp(&other.pitch())
            .then(self.letter.cmp(&other.letter))
            .then(self.accidental.cmp(&other.accidental))
    }
}

impl PartialOrd for Tone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Tone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Tone::parse_spelled(&token).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let tone = Tone::parse("C#4").unwrap();
        assert_eq!(tone.letter(), Letter::C);
        assert_eq!(tone.accidental(), Accidental::Sharp);
        assert_eq!(tone.octave(), 4);

        let tone = Tone::parse("A0").unwrap();
        assert_eq!(tone, Tone::natural(Letter::A, 0));
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "H4", "C", "C#", "c4", "Cb4", "C-1", "C10", "C4x", "#4"] {
            let result = Tone::parse(bad);
            assert!(
                matches!(result, Err(TutorError::ParseError { .. })),
                "expected ParseError for {:?}, got {:?}",
                bad,
                result
            );
        }
    }

    #[test]
    fn test_check_octave() {
        assert_eq!(check_octave(0).unwrap(), 0);
        assert_eq!(check_octave(MAX_OCTAVE).unwrap(), MAX_OCTAVE);
        for bad in [-1, 10, i8::MIN, i8::MAX] {
            assert!(matches!(
                check_octave(bad),
                Err(TutorError::ParseError { .. })
            ));
        }
    }

    #[test]
    fn test_parse_spelled_flats() {
        assert_eq!(Tone::parse_spelled("Bb4").unwrap(), Tone::sharp(Letter::A, 4));
        assert_eq!(Tone::parse_spelled("db3").unwrap(), Tone::sharp(Letter::C, 3));
        assert_eq!(Tone::parse_spelled("Fb4").unwrap(), Tone::natural(Letter::E, 4));
        // Cb crosses the octave boundary downward
        assert_eq!(Tone::parse_spelled("Cb4").unwrap(), Tone::natural(Letter::B, 3));
        assert_eq!(Tone::parse_spelled("g#2").unwrap(), Tone::sharp(Letter::G, 2));
    }

    #[test]
    fn test_strict_equality() {
        let a = Tone::parse("C#4").unwrap();
        assert_eq!(a, Tone::sharp(Letter::C, 4));
        assert_ne!(a, Tone::sharp(Letter::C, 5));
        assert_ne!(a, Tone::natural(Letter::C, 4));
        // E#4 sounds like F4 but is a different spelling
        assert_ne!(Tone::sharp(Letter::E, 4), Tone::natural(Letter::F, 4));
        assert_eq!(Tone::sharp(Letter::E, 4).pitch(), Tone::natural(Letter::F, 4).pitch());
    }

    #[test]
    fn test_flat_alias() {
        assert_eq!(Tone::parse("C#4").unwrap().to_string_with_flat(true), "C#/Db4");
        assert_eq!(Tone::parse("A#0").unwrap().to_string_with_flat(true), "A#/Bb0");
        assert_eq!(Tone::parse("C#4").unwrap().to_string_with_flat(false), "C#4");
        assert_eq!(Tone::parse("E4").unwrap().to_string_with_flat(true), "E4");
        assert_eq!(Tone::sharp(Letter::E, 4).to_string_with_flat(true), "E#4");
    }

    #[test]
    fn test_chromatic_index_and_pitch() {
        assert_eq!(Tone::parse("C4").unwrap().chromatic_index(), 0);
        assert_eq!(Tone::parse("F#4").unwrap().chromatic_index(), 6);
        assert_eq!(Tone::parse("B4").unwrap().chromatic_index(), 11);
        assert_eq!(Tone::parse("A0").unwrap().pitch(), 9);
        assert_eq!(Tone::parse("C8").unwrap().pitch(), 96);
        assert_eq!(Tone::sharp(Letter::B, 4).chromatic_position(), (0, 5));
        assert_eq!(Tone::sharp(Letter::B, 4).pitch(), Tone::parse("C5").unwrap().pitch());
    }

    #[test]
    fn test_black_key_position() {
        assert_eq!(
            Tone::parse("C4").unwrap().black_key_position(),
            Some(BlackKeyPosition::Right)
        );
        assert_eq!(Tone::parse("C#4").unwrap().black_key_position(), None);
    }

    #[test]
    fn test_transpose() {
        let c4 = Tone::middle_c();
        assert_eq!(c4.transpose(12), Tone::parse("C5").unwrap());
        assert_eq!(c4.transpose(-1), Tone::parse("B3").unwrap());
        assert_eq!(c4.transpose(10), Tone::parse("A#4").unwrap());
        assert_eq!(Tone::parse("E2").unwrap().transpose(-5), Tone::parse("B1").unwrap());
    }

    #[test]
    fn test_ordering() {
        let mut tones = vec![
            Tone::parse("C5").unwrap(),
            Tone::parse("A0").unwrap(),
            Tone::parse("C#4").unwrap(),
            Tone::parse("B3").unwrap(),
        ];
        tones.sort();
        let names: Vec<String> = tones.iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["A0", "B3", "C#4", "C5"]);
    }

    #[test]
    fn test_parse_tone_list() {
        let tones = parse_tone_list("C4 e4, Gb4").unwrap();
        assert_eq!(
            tones,
            vec![
                Tone::parse("C4").unwrap(),
                Tone::parse("E4").unwrap(),
                Tone::parse("F#4").unwrap(),
            ]
        );
        assert!(parse_tone_list("   ").unwrap().is_empty());
        assert!(parse_tone_list("C4 X4").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let tone = Tone::parse("G#3").unwrap();
        let json = serde_json::to_string(&tone).unwrap();
        assert_eq!(json, "\"G#3\"");
        let back: Tone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tone);
        assert!(serde_json::from_str::<Tone>("\"Q3\"").is_err());
    }
}
