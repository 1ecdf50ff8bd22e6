//! # Keyboard Geometry
//!
//! Bounding boxes of the 88 piano keys on the keyboard sprite, hit testing and
//! the highlight shapes drawn over a pressed key.
//!
//! ## Layout
//! The sprite is `1775 x 330` pixels at ratio 1. White keys start at
//! `x = 18`; black keys overlap the top of the white keys:
//!
//! ```text
//! white  A0 B0 | C D E F G A B (x7, octaves 1-7) | C8      52 keys
//! black  A#0   | C# D# F# G# A# (x7)                       36 keys
//! ```
//!
//! Every coordinate is multiplied by the layout ratio, so a layout built with
//! [`KeyboardLayout::fit_width`] matches a resized canvas.
//!
//! ## Highlight Shapes
//! A pressed white key is highlighted in two parts so the black key on top of
//! it stays visible: a narrow upper notch beside the black key and the full
//! width lower part below it. The notch depends on where the black key sits
//! ([`BlackKeyPosition`]).

use serde::{Deserialize, Serialize};

use crate::pitch::{BlackKeyPosition, Letter, NATURAL_LETTERS};
use crate::tone::Tone;

/// Unscaled sprite size.
pub const SPRITE_WIDTH: f64 = 1775.0;
pub const SPRITE_HEIGHT: f64 = 330.0;

const OCTAVES: i8 = 7;

const WHITE_X: f64 = 18.0;
const WHITE_Y: f64 = 17.0;
const WHITE_HEIGHT: f64 = 292.0;
/// Widths of A0 and B0; C8 reuses the first one.
const WHITE_START_WIDTHS: [f64; 2] = [34.0, 33.0];
/// Widths of C..B in every full octave.
const WHITE_WIDTHS: [f64; 7] = [34.0, 33.0, 33.0, 34.0, 33.0, 34.0, 33.0];

const BLACK_WIDTH: f64 = 26.0;
const BLACK_HEIGHT: f64 = 162.0;
const BLACK_Y: f64 = 17.0;
/// x of A#0 and of C#1.
const BLACK_START_X: [f64; 2] = [38.0, 105.0];
/// Gaps after C#, D#, F#, G# and A# in every full octave.
const BLACK_GAPS: [f64; 5] = [34.0, 67.0, 33.0, 34.0, 66.0];
const BLACK_LETTERS: [Letter; 5] = [Letter::C, Letter::D, Letter::F, Letter::G, Letter::A];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn scaled(x: f64, y: f64, width: f64, height: f64, ratio: f64) -> Self {
        Self::new(x * ratio, y * ratio, width * ratio, height * ratio)
    }

    /// Inclusive on every edge.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    pub tone: Tone,
    pub rect: Rect,
    pub is_black: bool,
}

impl Key {
    /// `"C#/Db4"` for black keys, `"C4"` for white ones.
    pub fn label(&self) -> String {
        self.tone.to_string_with_flat(self.is_black)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardLayout {
    ratio: f64,
    white: Vec<Key>,
    black: Vec<Key>,
}

impl KeyboardLayout {
    pub fn new(ratio: f64) -> Self {
        Self {
            ratio,
            white: white_keys(ratio),
            black: black_keys(ratio),
        }
    }

    /// Ratio that fits the sprite into `available` pixels, never enlarging it.
    pub fn fit_width(available: f64) -> f64 {
        available.min(SPRITE_WIDTH).max(0.0) / SPRITE_WIDTH
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Scaled sprite size `(width, height)`.
    pub fn size(&self) -> (f64, f64) {
        (SPRITE_WIDTH * self.ratio, SPRITE_HEIGHT * self.ratio)
    }

    pub fn white_keys(&self) -> &[Key] {
        &self.white
    }

    pub fn black_keys(&self) -> &[Key] {
        &self.black
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.white.iter().chain(self.black.iter())
    }

    /// Key under a point. Black keys lie on top of white keys and win.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&Key> {
        self.black
            .iter()
            .chain(self.white.iter())
            .find(|key| key.rect.contains(x, y))
    }

    /// Key of exactly this tone (strict equality, so `E#4` has no key).
    pub fn find_by_tone(&self, tone: &Tone) -> Option<&Key> {
        let keys = if tone.is_sharp() { &self.black } else { &self.white };
        keys.iter().find(|key| key.tone == *tone)
    }

    /// The black key sitting on a white key, if any.
    ///
    /// C, D, F, G and A look up their own sharp; E and B look up the sharp of
    /// the letter below them.
    fn neighbour_black_key(&self, white: &Key) -> Option<&Key> {
        let letter = white.tone.letter();
        let sharp_letter = if letter.has_sharp_key() {
            letter
        } else {
            NATURAL_LETTERS[letter.index() - 1]
        };
        self.find_by_tone(&Tone::sharp(sharp_letter, white.tone.octave()))
    }

    /// Rectangles to fill when a key is highlighted.
    pub fn highlight_rects(&self, key: &Key) -> Vec<Rect> {
        if key.is_black {
            return vec![key.rect];
        }
        let Some(black) = self.neighbour_black_key(key) else {
            return vec![key.rect];
        };

        let rect = key.rect;
        let (x, width) = match key.tone.letter().black_key_position() {
            BlackKeyPosition::Right => (rect.x, rect.width * 0.6),
            // Octave 0 only has A#0, to the right of A0
            BlackKeyPosition::Middle if key.tone.octave() == 0 => (rect.x, rect.width * 0.6),
            BlackKeyPosition::Middle => (rect.x + rect.width * 0.7 / 2.0, rect.width * 0.3),
            BlackKeyPosition::Left => (rect.x + rect.width * 0.4, rect.width * 0.6),
        };
        let split = black.rect.bottom();

        vec![
            Rect::new(x, rect.y, width, split - rect.y),
            Rect::new(rect.x, split, rect.width, rect.bottom() - split),
        ]
    }
}

fn white_keys(ratio: f64) -> Vec<Key> {
    let mut keys = Vec::with_capacity(52);
    let mut x = WHITE_X;
    let mut push = |letter: Letter, octave: i8, width: f64, x: &mut f64| {
        keys.push(Key {
            tone: Tone::natural(letter, octave),
            rect: Rect::scaled(*x, WHITE_Y, width, WHITE_HEIGHT, ratio),
            is_black: false,
        });
        *x += width;
    };

    push(Letter::A, 0, WHITE_START_WIDTHS[0], &mut x);
    push(Letter::B, 0, WHITE_START_WIDTHS[1], &mut x);
    for octave in 1..=OCTAVES {
        for (letter, width) in NATURAL_LETTERS.iter().zip(WHITE_WIDTHS) {
            push(*letter, octave, width, &mut x);
        }
    }
    push(Letter::C, OCTAVES + 1, WHITE_START_WIDTHS[0], &mut x);
    keys
}

fn black_keys(ratio: f64) -> Vec<Key> {
    let key = |letter: Letter, octave: i8, x: f64| Key {
        tone: Tone::sharp(letter, octave),
        rect: Rect::scaled(x, BLACK_Y, BLACK_WIDTH, BLACK_HEIGHT, ratio),
        is_black: true,
    };

    let mut keys = Vec::with_capacity(36);
    keys.push(key(Letter::A, 0, BLACK_START_X[0]));
    let mut x = BLACK_START_X[1];
    for octave in 1..=OCTAVES {
        for (letter, gap) in BLACK_LETTERS.iter().zip(BLACK_GAPS) {
            keys.push(key(*letter, octave, x));
            x += gap;
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(name: &str) -> Tone {
        Tone::parse(name).unwrap()
    }

    #[test]
    fn test_key_counts() {
        let layout = KeyboardLayout::new(1.0);
        assert_eq!(layout.white_keys().len(), 52);
        assert_eq!(layout.black_keys().len(), 36);
        assert_eq!(layout.white_keys()[0].tone, tone("A0"));
        assert_eq!(layout.white_keys()[51].tone, tone("C8"));
        assert_eq!(layout.black_keys()[0].tone, tone("A#0"));
        assert_eq!(layout.black_keys()[35].tone, tone("A#7"));
    }

    #[test]
    fn test_key_positions() {
        let layout = KeyboardLayout::new(1.0);
        let c1 = layout.find_by_tone(&tone("C1")).unwrap();
        assert_eq!(c1.rect, Rect::new(85.0, 17.0, 34.0, 292.0));
        let c_sharp1 = layout.find_by_tone(&tone("C#1")).unwrap();
        assert_eq!(c_sharp1.rect, Rect::new(105.0, 17.0, 26.0, 162.0));
        let f_sharp1 = layout.find_by_tone(&tone("F#1")).unwrap();
        assert_eq!(f_sharp1.rect.x, 206.0);
        let c8 = layout.find_by_tone(&tone("C8")).unwrap();
        assert_eq!(c8.rect.x + c8.rect.width + WHITE_X, SPRITE_WIDTH);
    }

    #[test]
    fn test_scaled_layout() {
        let layout = KeyboardLayout::new(0.5);
        let c1 = layout.find_by_tone(&tone("C1")).unwrap();
        assert_eq!(c1.rect, Rect::new(42.5, 8.5, 17.0, 146.0));
        assert_eq!(layout.size(), (887.5, 165.0));
        assert_eq!(KeyboardLayout::fit_width(887.5), 0.5);
        assert_eq!(KeyboardLayout::fit_width(4000.0), 1.0);
    }

    #[test]
    fn test_hit_test_prefers_black_keys() {
        let layout = KeyboardLayout::new(1.0);
        // Top of C1 under C#1
        assert_eq!(layout.hit_test(110.0, 50.0).map(|k| k.tone), Some(tone("C#1")));
        // Same column below the black key
        assert_eq!(layout.hit_test(110.0, 250.0).map(|k| k.tone), Some(tone("C1")));
        assert!(layout.hit_test(5.0, 5.0).is_none());
        assert!(layout.hit_test(100.0, 320.0).is_none());
    }

    #[test]
    fn test_find_by_tone_is_strict() {
        let layout = KeyboardLayout::new(1.0);
        assert!(layout.find_by_tone(&tone("G#0")).is_none());
        assert!(layout.find_by_tone(&Tone::sharp(Letter::E, 4)).is_none());
        assert!(layout.find_by_tone(&tone("C#8")).is_none());
        assert!(layout.find_by_tone(&tone("C#4")).unwrap().is_black);
        assert_eq!(layout.find_by_tone(&tone("C#4")).unwrap().label(), "C#/Db4");
    }

    #[test]
    fn test_highlight_rects() {
        let layout = KeyboardLayout::new(1.0);
        let rects = |name: &str| layout.highlight_rects(layout.find_by_tone(&tone(name)).unwrap());

        let black = rects("C#1");
        assert_eq!(black.len(), 1);

        // C1: notch on the left 60 %
        let c1 = rects("C1");
        assert_eq!(c1[0], Rect::new(85.0, 17.0, 34.0 * 0.6, 162.0));
        assert_eq!(c1[1], Rect::new(85.0, 179.0, 34.0, 130.0));

        // D1: centred 30 % notch
        let d1 = rects("D1");
        assert_eq!(d1[0].x, 119.0 + 33.0 * 0.7 / 2.0);
        assert_eq!(d1[0].width, 33.0 * 0.3);

        // E1: notch on the right 60 %
        let e1 = rects("E1");
        assert_eq!(e1[0].x, 152.0 + 33.0 * 0.4);
        assert_eq!(e1[0].width, 33.0 * 0.6);

        // A0 has only A#0 to its right
        let a0 = rects("A0");
        assert_eq!(a0[0], Rect::new(18.0, 17.0, 34.0 * 0.6, 162.0));

        // C8 has no black neighbour
        let c8 = layout.find_by_tone(&tone("C8")).unwrap();
        assert_eq!(layout.highlight_rects(c8), vec![c8.rect]);
    }
}
