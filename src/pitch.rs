//! # Pitch Class Tables
//!
//! Static tables shared by every other module:
//! - natural letters `C D E F G A B`
//! - the 12-tone chromatic scale, spelled with sharps and with flats
//! - sharp ↔ flat enharmonic tables
//! - black key adjacency for each natural letter
//!
//! ## Octave Carry
//! Every "advance an index through a scale, wrap, bump the octave" loop in the
//! crate goes through [`step_pitch`]. The chord generator, the range generator,
//! the guitar string generator and the staff line builder all call it, so the
//! wrap rule lives in exactly one place.
//!
//! ```text
//! step_pitch(11, 12, 4, 1)  -> (0, 5)    B4 + 1 semitone = C5
//! step_pitch(0, 7, 4, -2)   -> (5, 3)    C4 - 2 letters  = A3
//! ```

use serde::{Deserialize, Serialize};

/// Natural note letters, ordered from C like the octave numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Letter {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

pub const NATURAL_LETTERS: [Letter; 7] = [
    Letter::C,
    Letter::D,
    Letter::E,
    Letter::F,
    Letter::G,
    Letter::A,
    Letter::B,
];

/// Sharp accidental or none. Flats only exist as input spellings and are
/// converted to their sharp enharmonic (see [`flat_to_sharp`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
}

impl Accidental {
    pub fn symbol(self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
        }
    }

    pub fn semitones(self) -> u8 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
        }
    }
}

/// Where a natural key sits relative to its neighbouring black key(s).
///
/// `Right` means the black key is on the right of the white key (C, F),
/// `Left` on its left (E, B), `Middle` on both sides (D, G, A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlackKeyPosition {
    Left,
    Middle,
    Right,
}

impl Letter {
    /// Index into [`NATURAL_LETTERS`] (C = 0 … B = 6).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Letter {
        NATURAL_LETTERS[index % NATURAL_LETTERS.len()]
    }

    /// Parse a letter, case-insensitive.
    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// Semitone offset from C.
    pub fn semitone(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn black_key_position(self) -> BlackKeyPosition {
        match self {
            Letter::C | Letter::F => BlackKeyPosition::Right,
            Letter::D | Letter::G | Letter::A => BlackKeyPosition::Middle,
            Letter::E | Letter::B => BlackKeyPosition::Left,
        }
    }

    /// Whether a black key sits directly above this letter (C#, D#, F#, G#, A#).
    pub fn has_sharp_key(self) -> bool {
        !matches!(self, Letter::E | Letter::B)
    }
}

/// The chromatic scale spelled with sharps (`C C# D D# E F F# G G# A A# B`).
pub const CHROMATIC_SHARP: [(Letter, Accidental); 12] = [
    (Letter::C, Accidental::Natural),
    (Letter::C, Accidental::Sharp),
    (Letter::D, Accidental::Natural),
    (Letter::D, Accidental::Sharp),
    (Letter::E, Accidental::Natural),
    (Letter::F, Accidental::Natural),
    (Letter::F, Accidental::Sharp),
    (Letter::G, Accidental::Natural),
    (Letter::G, Accidental::Sharp),
    (Letter::A, Accidental::Natural),
    (Letter::A, Accidental::Sharp),
    (Letter::B, Accidental::Natural),
];

pub const CHROMATIC_SHARP_NAMES: [&str; 12] =
    ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

pub const CHROMATIC_FLAT_NAMES: [&str; 12] =
    ["C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B"];

/// Sharp-scale spelling of a chromatic index (wraps past 11).
pub fn chromatic_spelling(index: usize) -> (Letter, Accidental) {
    CHROMATIC_SHARP[index % CHROMATIC_SHARP.len()]
}

/// Flat alias of a sharp spelling: `C#` → `Db`. `None` for E and B, which
/// have no sharp in the chromatic scale.
pub fn sharp_to_flat(letter: Letter) -> Option<&'static str> {
    if !letter.has_sharp_key() {
        return None;
    }
    Some(CHROMATIC_FLAT_NAMES[letter.semitone() as usize + 1])
}

/// Sharp-scale enharmonic of a flat spelling, with the octave delta it causes.
///
/// Cb sits one semitone below C, so it becomes B of the octave below; it is
/// the only flat that crosses the octave boundary.
pub fn flat_to_sharp(letter: Letter) -> (Letter, Accidental, i8) {
    match letter {
        Letter::C => (Letter::B, Accidental::Natural, -1),
        Letter::D => (Letter::C, Accidental::Sharp, 0),
        Letter::E => (Letter::D, Accidental::Sharp, 0),
        Letter::F => (Letter::E, Accidental::Natural, 0),
        Letter::G => (Letter::F, Accidental::Sharp, 0),
        Letter::A => (Letter::G, Accidental::Sharp, 0),
        Letter::B => (Letter::A, Accidental::Sharp, 0),
    }
}

/// Advance `index` by `delta` steps through a scale of `scale_len` entries,
/// carrying the octave on wrap in either direction.
/// The octave saturates at the `i8` bounds.
pub fn step_pitch(index: usize, scale_len: usize, octave: i8, delta: i32) -> (usize, i8) {
    let len = scale_len as i32;
    let raw = index as i32 + delta;
    let carry = raw.div_euclid(len);
    let octave = i8::try_from(octave as i32 + carry)
        .unwrap_or(if carry < 0 { i8::MIN } else { i8::MAX });
    (raw.rem_euclid(len) as usize, octave)
}
