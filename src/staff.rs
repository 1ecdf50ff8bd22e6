//! # Staff Layout
//!
//! Maps tones onto the lines of a treble or bass staff and back.
//!
//! ## Line Table
//! A staff is a list of lines, top to bottom. The first line carries the
//! range's top reference tone; every following line is two letters lower,
//! carrying the octave when the letter wraps below C. The five main staff
//! lines sit after the top help lines:
//!
//! ```text
//! treble (game range)   C8 A7 F7 D7 B6 G6 E6 C6 A5 | F5 D5 B4 G4 E4 | C4
//! bass   (game range)   C4 | A3 F3 D3 B2 G2 | E2 C2 A1 F1 D1 B0
//! ```
//!
//! Line `i` sits at `y = padding + i * (line_height + line_distance)`.
//!
//! ## Placement
//! [`Staff::find_line`] returns the line a note is drawn on or next to.
//! Tones between two lines report `exact = false` and a `direction`:
//! `+1` when the note hangs below the line, `-1` when it sits above. The note
//! head is then offset by half a line distance ([`Staff::note_y`]).
//!
//! ## Ledger Lines
//! Notes beyond the main lines get a short tick on every help line between
//! the staff and the note ([`Staff::ledger_lines`]).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::pitch::{step_pitch, Letter};
use crate::tone::Tone;

/// Number of main lines of a staff.
pub const MAIN_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    Treble,
    Bass,
}

impl Clef {
    /// The staff a tone is shown on: bass below middle C, treble otherwise.
    pub fn for_tone(tone: &Tone) -> Clef {
        if tone.octave() < Tone::middle_c().octave() {
            Clef::Bass
        } else {
            Clef::Treble
        }
    }

    /// Tones sitting on the five main lines, bottom to top.
    pub fn line_tones(self) -> [Tone; 5] {
        match self {
            Clef::Treble => [
                Tone::natural(Letter::E, 4),
                Tone::natural(Letter::G, 4),
                Tone::natural(Letter::B, 4),
                Tone::natural(Letter::D, 5),
                Tone::natural(Letter::F, 5),
            ],
            Clef::Bass => [
                Tone::natural(Letter::G, 2),
                Tone::natural(Letter::B, 2),
                Tone::natural(Letter::D, 3),
                Tone::natural(Letter::F, 3),
                Tone::natural(Letter::A, 3),
            ],
        }
    }

    /// Tones in the four spaces between the main lines, bottom to top.
    pub fn space_tones(self) -> [Tone; 4] {
        match self {
            Clef::Treble => [
                Tone::natural(Letter::F, 4),
                Tone::natural(Letter::A, 4),
                Tone::natural(Letter::C, 5),
                Tone::natural(Letter::E, 5),
            ],
            Clef::Bass => [
                Tone::natural(Letter::A, 2),
                Tone::natural(Letter::C, 3),
                Tone::natural(Letter::E, 3),
                Tone::natural(Letter::G, 3),
            ],
        }
    }
}

/// Pixel metrics of a staff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMetrics {
    /// Space above the first and below the last line.
    pub padding: f64,
    pub line_height: f64,
    pub line_distance: f64,
    /// Clicks farther than this from a line select the neighbouring space.
    pub click_distance_threshold: f64,
}

impl Default for StaffMetrics {
    fn default() -> Self {
        Self {
            padding: 30.0,
            line_height: 3.0,
            line_distance: 14.0,
            click_distance_threshold: 4.0,
        }
    }
}

impl StaffMetrics {
    /// Distance between two neighbouring lines.
    pub fn line_step(&self) -> f64 {
        self.line_height + self.line_distance
    }
}

/// One end of a staff: how many help lines extend past the main lines and
/// the tone of the outermost one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffEdge {
    pub help_lines: usize,
    pub tone: Tone,
}

/// Vertical extent of a staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRange {
    pub top: StaffEdge,
    pub bottom: StaffEdge,
}

impl StaffRange {
    fn edge(help_lines: usize, letter: Letter, octave: i8) -> StaffEdge {
        StaffEdge {
            help_lines,
            tone: Tone::natural(letter, octave),
        }
    }

    /// Range used by the tone game: the two staves meet at middle C.
    pub fn game(clef: Clef) -> Self {
        match clef {
            Clef::Treble => Self {
                top: Self::edge(9, Letter::C, 8),
                bottom: Self::edge(1, Letter::C, 4),
            },
            Clef::Bass => Self {
                top: Self::edge(1, Letter::C, 4),
                bottom: Self::edge(6, Letter::B, 0),
            },
        }
    }

    /// Range used by the learning pages: the staves overlap around middle C.
    pub fn learn(clef: Clef) -> Self {
        match clef {
            Clef::Treble => Self {
                top: Self::edge(9, Letter::C, 8),
                bottom: Self::edge(2, Letter::A, 3),
            },
            Clef::Bass => Self {
                top: Self::edge(2, Letter::E, 4),
                bottom: Self::edge(6, Letter::B, 0),
            },
        }
    }

    pub fn line_count(&self) -> usize {
        self.top.help_lines + MAIN_LINES + self.bottom.help_lines
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffLine {
    pub tone: Tone,
    pub y: f64,
    pub main: bool,
    pub index: usize,
}

impl StaffLine {
    pub fn letter_index(&self) -> usize {
        self.tone.letter().index()
    }

    pub fn octave(&self) -> i8 {
        self.tone.octave()
    }
}

/// Where a note is drawn relative to the line table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePlacement {
    pub tone: Tone,
    pub line_index: usize,
    pub exact: bool,
    /// `0` on the line, `+1` below it, `-1` above it.
    pub direction: i8,
}

/// Build the line table of a staff, top to bottom.
pub fn build_staff_lines(range: &StaffRange, metrics: &StaffMetrics) -> Vec<StaffLine> {
    let main = range.top.help_lines..range.top.help_lines + MAIN_LINES;
    let mut letter_index = range.top.tone.letter().index();
    let mut octave = range.top.tone.octave();

    (0..range.line_count())
        .map(|index| {
            let line = StaffLine {
                tone: Tone::natural(Letter::from_index(letter_index), octave),
                y: metrics.padding + index as f64 * metrics.line_step(),
                main: main.contains(&index),
                index,
            };
            (letter_index, octave) = step_pitch(letter_index, 7, octave, -2);
            line
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Staff {
    clef: Clef,
    metrics: StaffMetrics,
    lines: Vec<StaffLine>,
}

impl Staff {
    pub fn build(clef: Clef, range: StaffRange, metrics: StaffMetrics) -> Self {
        let lines = build_staff_lines(&range, &metrics);
        debug!("{:?} staff: {} lines", clef, lines.len());
        Self {
            clef,
            metrics,
            lines,
        }
    }

    /// Staff with the game range and default metrics.
    pub fn new(clef: Clef) -> Self {
        Self::build(clef, StaffRange::game(clef), StaffMetrics::default())
    }

    pub fn clef(&self) -> Clef {
        self.clef
    }

    pub fn lines(&self) -> &[StaffLine] {
        &self.lines
    }

    pub fn main_lines(&self) -> impl Iterator<Item = &StaffLine> {
        self.lines.iter().filter(|line| line.main)
    }

    /// Canvas height: every line plus padding on both sides.
    pub fn height(&self) -> f64 {
        self.metrics.padding * 2.0 + self.lines.len() as f64 * self.metrics.line_step()
    }

    /// Find the line a tone is drawn on or next to.
    ///
    /// Lines are scanned from the bottom; the first one in the tone's octave
    /// whose letter is at most one step away wins. Only the letter is placed,
    /// a sharp is drawn as a separate sign.
    pub fn find_line(&self, tone: &Tone) -> Option<NotePlacement> {
        let letter_index = tone.letter().index() as i32;
        self.lines
            .iter()
            .rev()
            .find(|line| {
                line.octave() == tone.octave()
                    && (line.letter_index() as i32 - letter_index).abs() <= 1
            })
            .map(|line| {
                let exact = line.letter_index() as i32 == letter_index;
                let direction = match (line.letter_index() as i32).cmp(&letter_index) {
                    std::cmp::Ordering::Equal => 0,
                    std::cmp::Ordering::Greater => 1,
                    std::cmp::Ordering::Less => -1,
                };
                NotePlacement {
                    tone: *tone,
                    line_index: line.index,
                    exact,
                    direction,
                }
            })
    }

    /// Vertical centre of the note head.
    pub fn note_y(&self, placement: &NotePlacement) -> f64 {
        let y = self.lines[placement.line_index].y;
        y + placement.direction as f64 * self.metrics.line_distance / 2.0
    }

    /// Indices of the help lines that need a tick through the note.
    pub fn ledger_lines(&self, placement: &NotePlacement) -> Vec<usize> {
        let (first_main, last_main) = match (
            self.main_lines().next(),
            self.main_lines().last(),
        ) {
            (Some(first), Some(last)) => (first.index, last.index),
            _ => return Vec::new(),
        };
        let line_index = placement.line_index;

        if line_index < first_main {
            return (line_index..first_main).collect();
        }
        if line_index > last_main {
            let max = line_index as i64 + placement.direction as i64;
            let tone = placement.tone;
            let mut ticks = Vec::new();
            for i in (last_main + 1) as i64..=max {
                // C1 hangs below the D1 line, the B0 line under it stays blank
                if i as usize >= self.lines.len()
                    || (i == max
                        && tone.letter() == Letter::C
                        && tone.octave() == 1)
                {
                    break;
                }
                ticks.push(i as usize);
            }
            return ticks;
        }
        Vec::new()
    }

    /// Tone under a click at height `y`.
    ///
    /// Clicks near a line select the line's tone; farther clicks select the
    /// space next to it, one letter up or down.
    pub fn tone_at(&self, y: f64) -> Option<Tone> {
        let nearest = self.lines.iter().min_by(|a, b| {
            (a.y - y)
                .abs()
                .partial_cmp(&(b.y - y).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

        if (nearest.y - y).abs() <= self.metrics.click_distance_threshold {
            return Some(nearest.tone);
        }
        // Lower on the canvas is a lower tone
        let delta = if y > nearest.y { -1 } else { 1 };
        let (index, octave) = step_pitch(nearest.letter_index(), 7, nearest.octave(), delta);
        Some(Tone::natural(Letter::from_index(index), octave))
    }
}
