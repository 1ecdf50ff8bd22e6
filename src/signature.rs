//! # Key Signatures
//!
//! The 15 major key signatures, from Cb major (7 flats) to C# major
//! (7 sharps), and the transposer that respells a tone into a signature.
//!
//! ## Table Layout
//! Each signature stores the spelling of every natural letter, index-aligned
//! to `C D E F G A B`:
//!
//! ```text
//! F dur  (b1): C  D  E  F  G  A  Bb
//! D dur  (#2): C# D  E  F# G  A  B
//! Cb dur (b7): Cb Db Eb Fb Gb Ab Bb
//! ```
//!
//! ## Respelling (CRITICAL)
//! [`to_signature`] maps a tone onto the sharp-scale tone the signature makes
//! it sound as. Flat spellings go through the flat → sharp table, and `Cb`
//! is the only spelling that changes the octave:
//!
//! ```text
//! to_signature(C4, Cb dur) = B3
//! to_signature(B4, F dur)  = A#4
//! to_signature(E4, F# dur) = E#4
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::pitch::{flat_to_sharp, Letter, NATURAL_LETTERS};
use crate::tone::Tone;

/// Which accidental family a signature uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccidentalType {
    Sharp,
    Flat,
    Natural,
}

impl AccidentalType {
    pub fn symbol(self) -> &'static str {
        match self {
            AccidentalType::Sharp => "#",
            AccidentalType::Flat => "b",
            AccidentalType::Natural => "",
        }
    }
}

/// Alteration of a letter inside a key signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alteration {
    Flat,
    Natural,
    Sharp,
}

/// A letter with its alteration in a key, e.g. `Bb` or `F#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spelling {
    pub letter: Letter,
    pub alteration: Alteration,
}

impl fmt::Display for Spelling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.alteration {
            Alteration::Flat => "b",
            Alteration::Natural => "",
            Alteration::Sharp => "#",
        };
        write!(f, "{}{}", self.letter.as_char(), symbol)
    }
}

const fn flat(letter: Letter) -> Spelling {
    Spelling { letter, alteration: Alteration::Flat }
}

const fn nat(letter: Letter) -> Spelling {
    Spelling { letter, alteration: Alteration::Natural }
}

const fn sharp(letter: Letter) -> Spelling {
    Spelling { letter, alteration: Alteration::Sharp }
}

use Letter::{A, B, C, D, E, F, G};

/// Identity of a major key signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeySignatureId {
    CFlat,
    GFlat,
    DFlat,
    AFlat,
    EFlat,
    BFlat,
    F,
    C,
    G,
    D,
    A,
    E,
    B,
    FSharp,
    CSharp,
}

impl KeySignatureId {
    pub fn signature(self) -> &'static KeySignature {
        // Table order follows the enum order
        &KEY_SIGNATURES[self as usize]
    }
}

/// A major key signature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySignature {
    pub id: KeySignatureId,
    pub name: &'static str,
    pub accidental_type: AccidentalType,
    pub accidental_count: u8,
    pub tonic: Letter,
    /// Spelling of `C D E F G A B` in this key.
    pub diatonic_spellings: [Spelling; 7],
}

/// All major key signatures, 7 flats through 7 sharps.
pub const KEY_SIGNATURES: [KeySignature; 15] = [
    KeySignature {
        id: KeySignatureId::CFlat,
        name: "Cb dur",
        accidental_type: AccidentalType::Flat,
        accidental_count: 7,
        tonic: C,
        diatonic_spellings: [flat(C), flat(D), flat(E), flat(F), flat(G), flat(A), flat(B)],
    },
    KeySignature {
        id: KeySignatureId::GFlat,
        name: "Gb dur",
        accidental_type: AccidentalType::Flat,
        accidental_count: 6,
        tonic: G,
        diatonic_spellings: [flat(C), flat(D), flat(E), nat(F), flat(G), flat(A), flat(B)],
    },
    KeySignature {
        id: KeySignatureId::DFlat,
        name: "Db dur",
        accidental_type: AccidentalType::Flat,
        accidental_count: 5,
        tonic: D,
        diatonic_spellings: [nat(C), flat(D), flat(E), nat(F), flat(G), flat(A), flat(B)],
    },
    KeySignature {
        id: KeySignatureId::AFlat,
        name: "Ab dur",
        accidental_type: AccidentalType::Flat,
        accidental_count: 4,
        tonic: A,
        diatonic_spellings: [nat(C), flat(D), flat(E), nat(F), nat(G), flat(A), flat(B)],
    },
    KeySignature {
        id: KeySignatureId::EFlat,
        name: "Eb dur",
        accidental_type: AccidentalType::Flat,
        accidental_count: 3,
        tonic: E,
        diatonic_spellings: [nat(C), nat(D), flat(E), nat(F), nat(G), flat(A), flat(B)],
    },
    KeySignature {
        id: KeySignatureId::BFlat,
        name: "Bb dur",
        accidental_type: AccidentalType::Flat,
        accidental_count: 2,
        tonic: B,
        diatonic_spellings: [nat(C), nat(D), flat(E), nat(F), nat(G), nat(A), flat(B)],
    },
    KeySignature {
        id: KeySignatureId::F,
        name: "F dur",
        accidental_type: AccidentalType::Flat,
        accidental_count: 1,
        tonic: F,
        diatonic_spellings: [nat(C), nat(D), nat(E), nat(F), nat(G), nat(A), flat(B)],
    },
    KeySignature {
        id: KeySignatureId::C,
        name: "C dur",
        accidental_type: AccidentalType::Natural,
        accidental_count: 0,
        tonic: C,
        diatonic_spellings: [nat(C), nat(D), nat(E), nat(F), nat(G), nat(A), nat(B)],
    },
    KeySignature {
        id: KeySignatureId::G,
        name: "G dur",
        accidental_type: AccidentalType::Sharp,
        accidental_count: 1,
        tonic: G,
        diatonic_spellings: [nat(C), nat(D), nat(E), sharp(F), nat(G), nat(A), nat(B)],
    },
    KeySignature {
        id: KeySignatureId::D,
        name: "D dur",
        accidental_type: AccidentalType::Sharp,
        accidental_count: 2,
        tonic: D,
        diatonic_spellings: [sharp(C), nat(D), nat(E), sharp(F), nat(G), nat(A), nat(B)],
    },
    KeySignature {
        id: KeySignatureId::A,
        name: "A dur",
        accidental_type: AccidentalType::Sharp,
        accidental_count: 3,
        tonic: A,
        diatonic_spellings: [sharp(C), nat(D), nat(E), sharp(F), sharp(G), nat(A), nat(B)],
    },
    KeySignature {
        id: KeySignatureId::E,
        name: "E dur",
        accidental_type: AccidentalType::Sharp,
        accidental_count: 4,
        tonic: E,
        diatonic_spellings: [sharp(C), sharp(D), nat(E), sharp(F), sharp(G), nat(A), nat(B)],
    },
    KeySignature {
        id: KeySignatureId::B,
        name: "B dur",
        accidental_type: AccidentalType::Sharp,
        accidental_count: 5,
        tonic: B,
        diatonic_spellings: [sharp(C), sharp(D), nat(E), sharp(F), sharp(G), sharp(A), nat(B)],
    },
    KeySignature {
        id: KeySignatureId::FSharp,
        name: "F# dur",
        accidental_type: AccidentalType::Sharp,
        accidental_count: 6,
        tonic: F,
        diatonic_spellings: [sharp(C), sharp(D), sharp(E), sharp(F), sharp(G), sharp(A), nat(B)],
    },
    KeySignature {
        id: KeySignatureId::CSharp,
        name: "C# dur",
        accidental_type: AccidentalType::Sharp,
        accidental_count: 7,
        tonic: C,
        diatonic_spellings: [sharp(C), sharp(D), sharp(E), sharp(F), sharp(G), sharp(A), sharp(B)],
    },
];

impl KeySignature {
    /// C major, the identity signature.
    pub fn c_major() -> &'static KeySignature {
        KeySignatureId::C.signature()
    }

    /// Look up a signature by name.
    ///
    /// Accepts the table names (`"F dur"`), `"F major"`, a bare tonic
    /// (`"F"`, `"Bb"`, `"F#"`) and the selector label `"GbF# dur"`.
    pub fn by_name(name: &str) -> Result<&'static KeySignature, TutorError> {
        let trimmed = name.trim();
        let tonic = trimmed
            .strip_suffix("dur")
            .or_else(|| trimmed.strip_suffix("major"))
            .unwrap_or(trimmed)
            .trim();

        let id = match tonic {
            "Cb" => KeySignatureId::CFlat,
            "Gb" => KeySignatureId::GFlat,
            "Db" => KeySignatureId::DFlat,
            "Ab" => KeySignatureId::AFlat,
            "Eb" => KeySignatureId::EFlat,
            "Bb" => KeySignatureId::BFlat,
            "F" => KeySignatureId::F,
            "C" => KeySignatureId::C,
            "G" => KeySignatureId::G,
            "D" => KeySignatureId::D,
            "A" => KeySignatureId::A,
            "E" => KeySignatureId::E,
            "B" => KeySignatureId::B,
            "F#" | "GbF#" => KeySignatureId::FSharp,
            "C#" => KeySignatureId::CSharp,
            _ => return Err(TutorError::InvalidSignatureName(trimmed.to_string())),
        };
        Ok(id.signature())
    }

    /// Selector label, e.g. `"F dur b1"`.
    pub fn label(&self) -> String {
        format!(
            "{} {}{}",
            self.name,
            self.accidental_type.symbol(),
            self.accidental_count
        )
    }

    pub fn spelling_of(&self, letter: Letter) -> Spelling {
        self.diatonic_spellings[letter.index()]
    }

    /// The seven respelled tones of `C D E F G A B` at `octave`.
    pub fn signature_tones(&self, octave: i8) -> Vec<Tone> {
        NATURAL_LETTERS
            .iter()
            .map(|&letter| to_signature(&Tone::natural(letter, octave), self))
            .collect()
    }

    /// The major scale of this key ascending from the tonic at `octave`.
    pub fn scale(&self, octave: i8) -> Vec<Tone> {
        let start = self.tonic.index();
        (start..start + NATURAL_LETTERS.len())
            .map(|i| {
                let octave = octave.saturating_add((i / 7) as i8);
                let tone = Tone::natural(Letter::from_index(i), octave);
                to_signature(&tone, self)
            })
            .collect()
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Respell a tone into a key signature.
///
/// Only the tone's letter and octave are consulted: in C major the tone is
/// returned unchanged, otherwise the letter takes the signature's spelling.
pub fn to_signature(tone: &Tone, signature: &KeySignature) -> Tone {
    if signature.accidental_count == 0 {
        return *tone;
    }

    let letter = tone.letter();
    let octave = tone.octave();
    let spelling = signature.spelling_of(letter);

    match (signature.accidental_type, spelling.alteration) {
        (AccidentalType::Sharp, Alteration::Sharp) => Tone::sharp(spelling.letter, octave),
        (AccidentalType::Flat, Alteration::Flat) => {
            let (letter, accidental, octave_delta) = flat_to_sharp(spelling.letter);
            Tone::new(letter, accidental, octave.saturating_add(octave_delta))
        }
        _ => Tone::natural(letter, octave),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tones(names: &[&str]) -> Vec<Tone> {
        names.iter().map(|n| Tone::parse(n).unwrap()).collect()
    }

    #[test]
    fn test_table_is_ordered_by_accidentals() {
        for (i, signature) in KEY_SIGNATURES.iter().enumerate() {
            assert_eq!(signature.id as usize, i);
            let fifths = i as i8 - 7;
            assert_eq!(signature.accidental_count as i8, fifths.abs());
            let altered = signature
                .diatonic_spellings
                .iter()
                .filter(|s| s.alteration != Alteration::Natural)
                .count();
            assert_eq!(altered as u8, signature.accidental_count, "{}", signature.name);
        }
    }

    #[test]
    fn test_by_name() {
        assert_eq!(KeySignature::by_name("F dur").unwrap().id, KeySignatureId::F);
        assert_eq!(KeySignature::by_name("Bb major").unwrap().id, KeySignatureId::BFlat);
        assert_eq!(KeySignature::by_name("GbF# dur").unwrap().id, KeySignatureId::FSharp);
        assert_eq!(KeySignature::by_name("Gb").unwrap().id, KeySignatureId::GFlat);
        assert_eq!(
            KeySignature::by_name("H dur"),
            Err(TutorError::InvalidSignatureName("H dur".to_string()))
        );
    }

    #[test]
    fn test_c_major_is_identity() {
        let c_major = KeySignature::c_major();
        for name in ["C4", "C#4", "B0", "F#7", "A0"] {
            let tone = Tone::parse(name).unwrap();
            assert_eq!(to_signature(&tone, c_major), tone);
        }
    }

    #[test]
    fn test_cb_octave_carry() {
        let cb = KeySignatureId::CFlat.signature();
        assert_eq!(to_signature(&Tone::parse("C4").unwrap(), cb), Tone::parse("B3").unwrap());
        assert_eq!(to_signature(&Tone::parse("F4").unwrap(), cb), Tone::parse("E4").unwrap());
        assert_eq!(to_signature(&Tone::parse("D4").unwrap(), cb), Tone::parse("C#4").unwrap());
    }

    #[test]
    fn test_extreme_octaves_do_not_overflow() {
        let cb = KeySignatureId::CFlat.signature();
        let lowest = to_signature(&Tone::natural(C, i8::MIN), cb);
        assert_eq!(lowest, Tone::natural(B, i8::MIN));

        let scale = KeySignatureId::F.signature().scale(i8::MAX);
        assert_eq!(scale.len(), 7);
        assert!(scale.iter().all(|t| t.octave() == i8::MAX));
        assert_eq!(cb.signature_tones(i8::MIN).len(), 7);
    }

    #[test]
    fn test_sharp_signatures() {
        let d = KeySignatureId::D.signature();
        assert_eq!(to_signature(&Tone::parse("C4").unwrap(), d), Tone::parse("C#4").unwrap());
        assert_eq!(to_signature(&Tone::parse("E4").unwrap(), d), Tone::parse("E4").unwrap());

        let f_sharp = KeySignatureId::FSharp.signature();
        let e_sharp = to_signature(&Tone::parse("E4").unwrap(), f_sharp);
        assert_eq!(e_sharp, Tone::sharp(Letter::E, 4));
        assert_eq!(e_sharp.to_string(), "E#4");
    }

    #[test]
    fn test_input_sharp_is_respelled_from_letter() {
        // C#4 in G major: the C letter is natural in G, the sharp is not carried
        let g = KeySignatureId::G.signature();
        assert_eq!(to_signature(&Tone::parse("C#4").unwrap(), g), Tone::parse("C4").unwrap());
    }

    #[test]
    fn test_signature_tones_f_major() {
        let f = KeySignature::by_name("F dur").unwrap();
        assert_eq!(
            f.signature_tones(4),
            tones(&["C4", "D4", "E4", "F4", "G4", "A4", "A#4"])
        );
        assert_eq!(f.scale(4), tones(&["F4", "G4", "A4", "A#4", "C5", "D5", "E5"]));
        assert_eq!(f.label(), "F dur b1");
    }

    #[test]
    fn test_scale_of_every_key_is_a_major_scale() {
        for signature in KEY_SIGNATURES.iter() {
            let scale = signature.scale(4);
            let steps: Vec<i32> = scale.windows(2).map(|w| w[1].pitch() - w[0].pitch()).collect();
            assert_eq!(steps, vec![2, 2, 1, 2, 2, 2], "{}", signature.name);
        }
    }
}
