pub mod chord;
pub mod config;
pub mod error;
pub mod game;
pub mod guitar;
pub mod keyboard;
pub mod pitch;
pub mod range;
pub mod signature;
pub mod staff;
pub mod tone;

pub use chord::{generate_chord, parse_chord_root, Chord, ChordQuality};
pub use config::TrainerConfig;
pub use error::*;
pub use game::{Answer, GameSettings, LetterGame, Round, Scoreboard};
pub use guitar::{generate_strings, FretTone, Fretboard, Tuning};
pub use keyboard::{Key, KeyboardLayout, Rect};
pub use pitch::{Accidental, BlackKeyPosition, Letter};
pub use range::{generate_range, InstrumentRange};
pub use signature::{to_signature, KeySignature, KeySignatureId};
pub use staff::{Clef, NotePlacement, Staff, StaffRange};
pub use tone::{check_octave, parse_tone_list, Tone};

/// Tones of a chord given by a selector label (`"DbC#"`), an octave and a
/// quality name (`"MINOR 7th"`, `"m7"`).
pub fn chord_by_name(root: &str, octave: i8, quality: &str) -> Result<Vec<Tone>, TutorError> {
    let root = parse_chord_root(root, octave)?;
    let quality: ChordQuality = quality.parse()?;
    Ok(generate_chord(&root, quality))
}

/// The seven respelled tones of a named key signature at an octave.
pub fn signature_tones_by_name(name: &str, octave: i8) -> Result<Vec<Tone>, TutorError> {
    let signature = KeySignature::by_name(name)?;
    Ok(signature.signature_tones(check_octave(octave)?))
}

/// Respell a tone token into a named key signature.
pub fn respell(token: &str, signature: &str) -> Result<Tone, TutorError> {
    let tone = Tone::parse_spelled(token)?;
    Ok(to_signature(&tone, KeySignature::by_name(signature)?))
}
