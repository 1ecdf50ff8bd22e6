//! # Guitar Fretboard
//!
//! Tone tables of a guitar neck for a tuning, and the lookups the fretboard
//! view needs.
//!
//! ## String Order
//! String 0 is the highest string. Tuning offsets are written the way
//! guitarists name tunings, lowest string first, so string `i` takes
//! `offsets[len - 1 - i]`:
//!
//! ```text
//! Drop D  offsets [-2, 0, 0, 0, 0, 0]
//! string 0 (E4) +0 -> E4 F4 F#4 ...
//! string 5 (E2) -2 -> D2 D#2 E2 ...
//! ```
//!
//! Fret 0 is the open string; a table of `fret_count` frets therefore ends at
//! fret `fret_count - 1`.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::pitch::Letter;
use crate::tone::Tone;

/// Open strings of standard tuning, highest first.
pub const STANDARD_STRINGS: [Tone; 6] = [
    Tone::natural(Letter::E, 4),
    Tone::natural(Letter::B, 3),
    Tone::natural(Letter::G, 3),
    Tone::natural(Letter::D, 3),
    Tone::natural(Letter::A, 2),
    Tone::natural(Letter::E, 2),
];

/// Frets marked with an inlay dot.
pub const INLAY_FRETS: [usize; 10] = [3, 5, 7, 9, 12, 15, 17, 19, 21, 24];

pub const DEFAULT_FRET_COUNT: usize = 25;

/// Longest neck supported, open string included.
pub const MAX_FRET_COUNT: usize = 36;

/// Largest retuning of a single string, in semitones either way.
pub const MAX_TUNING_OFFSET: i32 = 24;

/// A built-in tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuningPreset {
    pub name: &'static str,
    /// Open string names, lowest first (`"DADGBE"`).
    pub key: &'static str,
    pub offsets: [i32; 6],
}

pub const TUNINGS: [TuningPreset; 9] = [
    TuningPreset { name: "Standard", key: "EADGBE", offsets: [0, 0, 0, 0, 0, 0] },
    TuningPreset { name: "Drop D", key: "DADGBE", offsets: [-2, 0, 0, 0, 0, 0] },
    TuningPreset { name: "Half step down", key: "D#G#C#F#A#D#", offsets: [-1, -1, -1, -1, -1, -1] },
    TuningPreset { name: "Drop C#", key: "C#G#C#F#A#D#", offsets: [-3, -1, -1, -1, -1, -1] },
    TuningPreset { name: "Two steps down", key: "DGCFAD", offsets: [-2, -2, -2, -2, -2, -2] },
    TuningPreset { name: "Drop C", key: "CGCFAD", offsets: [-4, -2, -2, -2, -2, -2] },
    TuningPreset { name: "C", key: "CFA#D#GC", offsets: [-4, -4, -4, -4, -4, -4] },
    TuningPreset { name: "Drop B", key: "BF#BEG#C#", offsets: [-5, -3, -3, -3, -3, -3] },
    TuningPreset { name: "Drop A#", key: "A#FA#D#GC", offsets: [-6, -4, -4, -4, -4, -4] },
];

/// Semitone offsets from standard tuning, lowest string first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuning {
    pub name: String,
    pub key: String,
    pub offsets: Vec<i32>,
}

impl Tuning {
    pub fn standard() -> Self {
        Self::from(&TUNINGS[0])
    }

    /// Built-in tuning by key (`"DADGBE"`) or name (`"Drop D"`).
    pub fn by_key(key: &str) -> Result<Self, TutorError> {
        TUNINGS
            .iter()
            .find(|preset| preset.key == key || preset.name.eq_ignore_ascii_case(key))
            .map(Self::from)
            .ok_or_else(|| TutorError::InvalidTuning(format!("unknown tuning '{}'", key)))
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<&TuningPreset> for Tuning {
    fn from(preset: &TuningPreset) -> Self {
        Self {
            name: preset.name.to_string(),
            key: preset.key.to_string(),
            offsets: preset.offsets.to_vec(),
        }
    }
}

/// One cell of the fretboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FretTone {
    pub tone: Tone,
    pub string: usize,
    pub fret: usize,
}

impl FretTone {
    /// Cell caption: black-key tones show both spellings (`"C#/Db3"`).
    pub fn label(&self) -> String {
        self.tone.to_string_with_flat(true)
    }
}

/// Build the `[string][fret]` tone table.
pub fn generate_strings(
    string_count: usize,
    fret_count: usize,
    offsets: &[i32],
) -> Result<Vec<Vec<FretTone>>, TutorError> {
    if string_count > STANDARD_STRINGS.len() {
        return Err(TutorError::InvalidTuning(format!(
            "at most {} strings are supported, got {}",
            STANDARD_STRINGS.len(),
            string_count
        )));
    }
    if offsets.len() != string_count {
        return Err(TutorError::InvalidTuning(format!(
            "expected {} offsets, got {}",
            string_count,
            offsets.len()
        )));
    }
    if fret_count > MAX_FRET_COUNT {
        return Err(TutorError::InvalidTuning(format!(
            "at most {} frets are supported, got {}",
            MAX_FRET_COUNT, fret_count
        )));
    }
    if let Some(offset) = offsets.iter().find(|o| o.abs() > MAX_TUNING_OFFSET) {
        return Err(TutorError::InvalidTuning(format!(
            "offset {} is outside -{max}..={max}",
            offset,
            max = MAX_TUNING_OFFSET
        )));
    }

    let strings = STANDARD_STRINGS[..string_count]
        .iter()
        .enumerate()
        .map(|(string, open)| {
            let open = open.transpose(offsets[offsets.len() - 1 - string]);
            (0..fret_count)
                .map(|fret| FretTone {
                    tone: open.transpose(fret as i32),
                    string,
                    fret,
                })
                .collect()
        })
        .collect();
    Ok(strings)
}

/// Pixel metrics of the fretboard canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FretboardMetrics {
    pub line_width: f64,
    pub line_height: f64,
    pub cell_height: f64,
    pub padding: f64,
}

impl Default for FretboardMetrics {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            line_height: 1.0,
            cell_height: 30.0,
            padding: 10.0,
        }
    }
}

/// A tuned neck with its tone table.
#[derive(Debug, Clone, PartialEq)]
pub struct Fretboard {
    tuning: Tuning,
    fret_count: usize,
    strings: Vec<Vec<FretTone>>,
    metrics: FretboardMetrics,
}

impl Fretboard {
    pub fn new(tuning: Tuning, fret_count: usize) -> Result<Self, TutorError> {
        let strings = generate_strings(tuning.offsets.len(), fret_count, &tuning.offsets)?;
        debug!(
            "fretboard {} ({}): {} strings x {} frets",
            tuning.name,
            tuning.key,
            strings.len(),
            fret_count
        );
        Ok(Self {
            tuning,
            fret_count,
            strings,
            metrics: FretboardMetrics::default(),
        })
    }

    pub fn standard() -> Result<Self, TutorError> {
        Self::new(Tuning::standard(), DEFAULT_FRET_COUNT)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn strings(&self) -> &[Vec<FretTone>] {
        &self.strings
    }

    pub fn get(&self, string: usize, fret: usize) -> Option<&FretTone> {
        self.strings.get(string)?.get(fret)
    }

    /// Every cell holding exactly this tone.
    pub fn positions_of(&self, tone: &Tone) -> Vec<FretTone> {
        self.cells().filter(|cell| cell.tone == *tone).copied().collect()
    }

    /// Every cell holding one of the tones, e.g. a chord.
    pub fn positions_of_any(&self, tones: &[Tone]) -> Vec<FretTone> {
        self.cells()
            .filter(|cell| tones.contains(&cell.tone))
            .copied()
            .collect()
    }

    /// Inlay frets that exist on this neck.
    pub fn inlay_frets(&self) -> impl Iterator<Item = usize> + '_ {
        INLAY_FRETS.into_iter().filter(move |fret| *fret < self.fret_count)
    }

    /// Width of one fret cell on a canvas `width` pixels wide.
    pub fn cell_width(&self, width: f64) -> f64 {
        let frets = self.fret_count as f64;
        ((width - 2.0 * self.metrics.padding - (frets + 1.0) * self.metrics.line_width) / frets)
            .floor()
    }

    pub fn height(&self) -> f64 {
        let strings = self.strings.len() as f64;
        self.metrics.cell_height * strings
            + (strings + 1.0) * self.metrics.line_height
            + 2.0 * self.metrics.padding
    }

    /// Cell under a click on a canvas `width` pixels wide.
    pub fn cell_at(&self, x: f64, y: f64, width: f64) -> Option<&FretTone> {
        let x = x - self.metrics.padding;
        let y = y - self.metrics.padding;
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let fret = (x / (self.cell_width(width) + self.metrics.line_width)).floor() as usize;
        let string = (y / (self.metrics.cell_height + self.metrics.line_height)).floor() as usize;
        self.get(string, fret)
    }

    fn cells(&self) -> impl Iterator<Item = &FretTone> {
        self.strings.iter().flatten()
    }
}
