//! Tone ranges: every tone between two endpoints on the natural or the
//! chromatic scale, clamped to what an instrument can play.
//!
//! ```text
//! generate_range(A0, C8, natural, A0-C8)   -> A0 B0 C1 D1 … B7 C8   (52 tones)
//! generate_range(E4, G4, chromatic, A0-C8) -> E4 F4 F#4 G4
//! ```
//!
//! An empty result is a valid answer (e.g. a range lying completely outside
//! the instrument). Callers that need tones check the length themselves.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::pitch::{step_pitch, Letter};
use crate::tone::Tone;

/// Lowest and highest tone an instrument can produce, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentRange {
    pub low: Tone,
    pub high: Tone,
}

impl InstrumentRange {
    pub fn new(low: Tone, high: Tone) -> Self {
        Self { low, high }
    }

    /// The 88-key piano, A0 to C8.
    pub fn keyboard() -> Self {
        Self::new(Tone::natural(Letter::A, 0), Tone::natural(Letter::C, 8))
    }

    pub fn contains(&self, tone: &Tone) -> bool {
        (self.low.pitch()..=self.high.pitch()).contains(&tone.pitch())
    }
}

impl Default for InstrumentRange {
    fn default() -> Self {
        Self::keyboard()
    }
}

impl fmt::Display for InstrumentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl FromStr for InstrumentRange {
    type Err = TutorError;

    /// Parse `"A0-C8"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (low, high) = s
            .split_once('-')
            .ok_or_else(|| TutorError::parse(s, "expected '<low>-<high>'"))?;
        let range = Self::new(Tone::parse_spelled(low)?, Tone::parse_spelled(high)?);
        if range.low.pitch() > range.high.pitch() {
            return Err(TutorError::parse(s, "low tone is above high tone"));
        }
        Ok(range)
    }
}

fn scale_index(tone: &Tone, use_chromatic: bool) -> usize {
    if use_chromatic {
        tone.chromatic_index()
    } else {
        // Sharps on the natural scale start from their letter
        tone.letter().index()
    }
}

fn scale_tone(index: usize, octave: i8, use_chromatic: bool) -> Tone {
    if use_chromatic {
        Tone::from_chromatic(index, octave)
    } else {
        Tone::natural(Letter::from_index(index), octave)
    }
}

/// All tones from `start` to `end`, both inclusive, within `bound`.
///
/// The walk starts at `start`'s scale index in the lower of the two octaves
/// and stops after `end`'s index in the higher one, or once it climbs past
/// `bound.high`. Tones below `bound.low` are skipped.
pub fn generate_range(
    start: &Tone,
    end: &Tone,
    use_chromatic: bool,
    bound: &InstrumentRange,
) -> Vec<Tone> {
    let scale_len = if use_chromatic { 12 } else { 7 };
    let end_octave = start.octave().max(end.octave());
    let end_index = scale_index(end, use_chromatic);
    let low = bound.low.pitch();
    let high = bound.high.pitch();

    let mut octave = start.octave().min(end.octave());
    let mut index = scale_index(start, use_chromatic);
    let mut tones = Vec::new();

    loop {
        if octave > end_octave || (octave == end_octave && index > end_index) {
            break;
        }
        let tone = scale_tone(index, octave, use_chromatic);
        if tone.pitch() > high {
            break;
        }
        if tone.pitch() >= low {
            tones.push(tone);
        }
        (index, octave) = step_pitch(index, scale_len, octave, 1);
    }

    if tones.is_empty() {
        warn!("range {}-{} within {} is empty", start, end, bound);
    } else {
        debug!("range {}-{}: {} tones", start, end, tones.len());
    }
    tones
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(name: &str) -> Tone {
        Tone::parse(name).unwrap()
    }

    #[test]
    fn test_full_keyboard_natural() {
        let bound = InstrumentRange::keyboard();
        let tones = generate_range(&tone("A0"), &tone("C8"), false, &bound);
        assert_eq!(tones.len(), 52);
        assert_eq!(tones[0], tone("A0"));
        assert_eq!(tones[2], tone("C1"));
        assert_eq!(tones[51], tone("C8"));
        assert!(tones.iter().all(|t| !t.is_sharp()));
    }

    #[test]
    fn test_full_keyboard_chromatic() {
        let bound = InstrumentRange::keyboard();
        let tones = generate_range(&tone("A0"), &tone("C8"), true, &bound);
        assert_eq!(tones.len(), 88);
        assert!(tones.windows(2).all(|w| w[1].pitch() == w[0].pitch() + 1));
    }

    #[test]
    fn test_small_ranges() {
        let bound = InstrumentRange::keyboard();
        assert_eq!(
            generate_range(&tone("E4"), &tone("G4"), true, &bound),
            vec![tone("E4"), tone("F4"), tone("F#4"), tone("G4")]
        );
        assert_eq!(
            generate_range(&tone("A3"), &tone("D4"), false, &bound),
            vec![tone("A3"), tone("B3"), tone("C4"), tone("D4")]
        );
        // Sharp start on the natural scale begins at its letter
        assert_eq!(
            generate_range(&tone("C#4"), &tone("E4"), false, &bound),
            vec![tone("C4"), tone("D4"), tone("E4")]
        );
    }

    #[test]
    fn test_stops_after_end_octave() {
        // B is the last natural letter; the walk must not run on to the bound
        let bound = InstrumentRange::keyboard();
        let tones = generate_range(&tone("G4"), &tone("B4"), false, &bound);
        assert_eq!(tones, vec![tone("G4"), tone("A4"), tone("B4")]);
    }

    #[test]
    fn test_clamped_to_bound() {
        let bound = InstrumentRange::keyboard();
        let tones = generate_range(&tone("C0"), &tone("D1"), false, &bound);
        assert_eq!(tones, vec![tone("A0"), tone("B0"), tone("C1"), tone("D1")]);

        let tones = generate_range(&tone("A7"), &tone("G8"), true, &bound);
        assert_eq!(tones.last(), Some(&tone("C8")));
        assert_eq!(tones.len(), 4);
    }

    #[test]
    fn test_empty_range() {
        let bound = InstrumentRange::keyboard();
        assert!(generate_range(&tone("C0"), &tone("G0"), false, &bound).is_empty());
        // Start index above end index in the same octave
        assert!(generate_range(&tone("G4"), &tone("C4"), false, &bound).is_empty());
    }

    #[test]
    fn test_instrument_range_parse() {
        let range: InstrumentRange = "A0-C8".parse().unwrap();
        assert_eq!(range, InstrumentRange::keyboard());
        assert_eq!(range.to_string(), "A0-C8");
        assert!(range.contains(&tone("C4")));
        assert!(!range.contains(&tone("G#0")));
        assert!("C8-A0".parse::<InstrumentRange>().is_err());
        assert!("A0".parse::<InstrumentRange>().is_err());
    }
}
