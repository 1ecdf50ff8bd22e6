//! # Recognition Games
//!
//! Timer-free state of the two keyboard games. The UI owns the countdowns
//! and calls [`Round::time_out`] / [`LetterGame::time_out`] when they expire.
//!
//! ## Tone Game
//! A note is shown on the staff and the player presses the key it sounds as
//! in the selected key signature:
//!
//! ```text
//! settings -> generate_range -> draw N tones -> next_tone -> answer / time_out
//!                                                  ^                  |
//!                                                  +------------------+
//! ```
//!
//! A key press matches only the exact spelling [`to_signature`] produces,
//! see the equality rules of [`Tone`].
//!
//! ## Letter Game
//! A natural letter is named and the player presses any key of that letter
//! (`C#` counts for `C`).

use std::fmt;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TutorError;
use crate::pitch::{Letter, NATURAL_LETTERS};
use crate::range::{generate_range, InstrumentRange};
use crate::signature::{to_signature, KeySignature};
use crate::tone::Tone;

/// Selectable number of tones per round.
pub const TONES_COUNTS: [usize; 4] = [25, 50, 75, 100];

/// Selectable seconds per tone.
pub const TONES_TIMES: [u32; 6] = [5, 10, 15, 20, 25, 30];

/// Settings of the tone game, stored by the UI as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSettings {
    pub signature: String,
    pub tones_count: usize,
    pub tones_time: u32,
    /// Draw from the chromatic scale instead of naturals only.
    pub sharp_tones: bool,
    /// Print the tone name next to the note head.
    pub show_tone: bool,
    pub sound: bool,
    pub start_tone: Tone,
    pub end_tone: Tone,
}

impl Default for GameSettings {
    fn default() -> Self {
        let keyboard = InstrumentRange::keyboard();
        Self {
            signature: KeySignature::c_major().name.to_string(),
            tones_count: TONES_COUNTS[1],
            tones_time: TONES_TIMES[0],
            sharp_tones: true,
            show_tone: false,
            sound: false,
            start_tone: keyboard.low,
            end_tone: keyboard.high,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), TutorError> {
        KeySignature::by_name(&self.signature)?;
        if !TONES_COUNTS.contains(&self.tones_count) {
            return Err(TutorError::ConfigError(format!(
                "tonesCount must be one of {:?}, got {}",
                TONES_COUNTS, self.tones_count
            )));
        }
        if !TONES_TIMES.contains(&self.tones_time) {
            return Err(TutorError::ConfigError(format!(
                "tonesTime must be one of {:?}, got {}",
                TONES_TIMES, self.tones_time
            )));
        }
        Ok(())
    }

    pub fn key_signature(&self) -> Result<&'static KeySignature, TutorError> {
        KeySignature::by_name(&self.signature)
    }

    /// Read the record the UI keeps in local storage.
    pub fn from_json(json: &str) -> Result<Self, TutorError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| TutorError::ConfigError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, TutorError> {
        serde_json::to_string(self).map_err(|e| TutorError::ConfigError(e.to_string()))
    }
}

/// Progress counters of a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// 1-based position of the current tone.
    pub order: usize,
    pub count: usize,
    pub correct: usize,
    pub wrong: usize,
}

impl Scoreboard {
    /// Info panel line: `"<msg> - order 3/50 correct 2 wrong 1"`.
    pub fn status(&self, message: &str) -> String {
        format!(
            "{} - order {}/{} correct {} wrong {}",
            message, self.order, self.count, self.correct, self.wrong
        )
    }
}

/// Outcome of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// The pressed key; the game waits for the next tone.
    Correct(Tone),
    Wrong,
    /// No tone is waiting for an answer.
    Ignored,
}

impl Answer {
    pub fn is_correct(&self) -> bool {
        matches!(self, Answer::Correct(_))
    }

    pub fn message(&self) -> String {
        match self {
            Answer::Correct(tone) => format!("Success, tone was {}", tone),
            Answer::Wrong => "Wrong, the tone is incorrect!".to_string(),
            Answer::Ignored => String::new(),
        }
    }
}

/// Draw `count` tones from `candidates` without immediate repeats.
///
/// A single candidate has nothing to alternate with and is repeated.
pub fn draw_tones<R: Rng + ?Sized>(candidates: &[Tone], count: usize, rng: &mut R) -> Vec<Tone> {
    let mut tones: Vec<Tone> = Vec::with_capacity(count);
    if candidates.is_empty() {
        return tones;
    }
    while tones.len() < count {
        let tone = candidates[rng.gen_range(0..candidates.len())];
        if candidates.len() == 1 || tones.last() != Some(&tone) {
            tones.push(tone);
        }
    }
    tones
}

/// One round of the tone game.
#[derive(Debug, Clone)]
pub struct Round {
    signature: &'static KeySignature,
    queue: Vec<Tone>,
    current: Option<Tone>,
    score: Scoreboard,
}

impl Round {
    /// Start a round on the full piano keyboard.
    pub fn start<R: Rng + ?Sized>(settings: &GameSettings, rng: &mut R) -> Result<Self, TutorError> {
        Self::start_within(settings, &InstrumentRange::keyboard(), rng)
    }

    /// Start a round with tones clamped to `bound`.
    pub fn start_within<R: Rng + ?Sized>(
        settings: &GameSettings,
        bound: &InstrumentRange,
        rng: &mut R,
    ) -> Result<Self, TutorError> {
        settings.validate()?;
        let signature = settings.key_signature()?;
        let candidates = generate_range(
            &settings.start_tone,
            &settings.end_tone,
            settings.sharp_tones,
            bound,
        );
        if candidates.is_empty() {
            return Err(TutorError::EmptyRange {
                start: settings.start_tone.to_string(),
                end: settings.end_tone.to_string(),
            });
        }

        let mut queue = draw_tones(&candidates, settings.tones_count, rng);
        queue.reverse();
        info!(
            "round started: {} tones from {} candidates in {}",
            settings.tones_count,
            candidates.len(),
            signature
        );
        Ok(Self {
            signature,
            queue,
            current: None,
            score: Scoreboard {
                count: settings.tones_count,
                ..Scoreboard::default()
            },
        })
    }

    pub fn signature(&self) -> &'static KeySignature {
        self.signature
    }

    pub fn score(&self) -> &Scoreboard {
        &self.score
    }

    /// Tone waiting for an answer.
    pub fn current(&self) -> Option<&Tone> {
        self.current.as_ref()
    }

    /// The key that answers the current tone.
    pub fn expected(&self) -> Option<Tone> {
        self.current.map(|tone| to_signature(&tone, self.signature))
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty() && self.current.is_none()
    }

    /// Show the next tone. `None` once every tone was played.
    pub fn next_tone(&mut self) -> Option<Tone> {
        let tone = self.queue.pop()?;
        self.current = Some(tone);
        self.score.order += 1;
        debug!("tone {}/{}: {}", self.score.order, self.score.count, tone);
        Some(tone)
    }

    /// Check a key press against the current tone.
    ///
    /// A wrong key counts as a mistake but the tone stays up; a correct key
    /// closes it.
    pub fn answer(&mut self, pressed: &Tone) -> Answer {
        let Some(expected) = self.expected() else {
            return Answer::Ignored;
        };
        if *pressed == expected {
            self.score.correct += 1;
            self.current = None;
            Answer::Correct(expected)
        } else {
            self.score.wrong += 1;
            Answer::Wrong
        }
    }

    /// The countdown of the current tone expired. Returns the missed key.
    pub fn time_out(&mut self) -> Option<Tone> {
        let expected = self.expected()?;
        self.current = None;
        self.score.wrong += 1;
        Some(expected)
    }
}

/// A natural letter different from `previous`.
pub fn random_letter<R: Rng + ?Sized>(rng: &mut R, previous: Option<Letter>) -> Letter {
    loop {
        let letter = NATURAL_LETTERS[rng.gen_range(0..NATURAL_LETTERS.len())];
        if Some(letter) != previous {
            return letter;
        }
    }
}

/// Whether a pressed key names the letter; sharps count for their letter.
pub fn letter_matches(pressed: &Tone, expected: Letter) -> bool {
    pressed.letter() == expected
}

/// The "find the letter" game.
#[derive(Debug, Clone, Default)]
pub struct LetterGame {
    current: Option<Letter>,
    waiting: bool,
}

impl LetterGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the next letter, never the same one twice in a row.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Letter {
        let letter = random_letter(rng, self.current);
        self.current = Some(letter);
        self.waiting = true;
        letter
    }

    pub fn current(&self) -> Option<Letter> {
        self.current
    }

    pub fn answer(&mut self, pressed: &Tone) -> Answer {
        match self.current {
            Some(letter) if self.waiting => {
                if letter_matches(pressed, letter) {
                    self.waiting = false;
                    Answer::Correct(*pressed)
                } else {
                    Answer::Wrong
                }
            }
            _ => Answer::Ignored,
        }
    }

    pub fn time_out(&mut self) -> Option<Letter> {
        if !self.waiting {
            return None;
        }
        self.waiting = false;
        self.current
    }
}

impl fmt::Display for LetterGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.current {
            Some(letter) => write!(f, "Find note {}", letter.as_char()),
            None => write!(f, "Info panel"),
        }
    }
}
