use pianotutor::guitar::TUNINGS;
use pianotutor::signature::KEY_SIGNATURES;
use pianotutor::staff::StaffLine;
use pianotutor::{
    Clef, GameSettings, InstrumentRange, Key, KeySignature, KeyboardLayout, NotePlacement, Rect,
    Staff, Tone, Tuning, TutorError,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct BindingError {
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToneInfo {
    tone: Tone,
    label: String,
    chromatic_index: usize,
    pitch: i32,
    clef: Clef,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignatureInfo {
    name: &'static str,
    label: String,
    tones: Vec<Tone>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyHighlight {
    key: Key,
    rects: Vec<Rect>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StaffNote {
    placement: NotePlacement,
    y: f64,
    ledger_lines: Vec<StaffLine>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FretCell {
    tone: Tone,
    label: String,
    string: usize,
    fret: usize,
}

fn to_js_error(e: TutorError) -> JsValue {
    let error = BindingError {
        message: e.to_string(),
    };
    match serde_json::to_string(&error) {
        Ok(json) => JsValue::from_str(&json),
        Err(_) => JsValue::from_str(&error.message),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_clef(clef: &str) -> Result<Clef, JsValue> {
    match clef {
        "treble" => Ok(Clef::Treble),
        "bass" => Ok(Clef::Bass),
        other => Err(to_js_error(TutorError::ConfigError(format!(
            "unknown clef '{}'",
            other
        )))),
    }
}

/// Parse a tone token and describe it
#[wasm_bindgen]
pub fn parse_tone(token: &str) -> Result<String, JsValue> {
    let tone = Tone::parse_spelled(token).map_err(to_js_error)?;
    to_json(&ToneInfo {
        tone,
        label: tone.to_string_with_flat(true),
        chromatic_index: tone.chromatic_index(),
        pitch: tone.pitch(),
        clef: Clef::for_tone(&tone),
    })
}

/// Tones of a chord, e.g. `chord("DbC#", 4, "MINOR 7th")`
#[wasm_bindgen]
pub fn chord(root: &str, octave: i8, quality: &str) -> Result<String, JsValue> {
    let tones = pianotutor::chord_by_name(root, octave, quality).map_err(to_js_error)?;
    to_json(&tones)
}

/// All key signatures for the signature selector
#[wasm_bindgen]
pub fn key_signatures() -> Result<String, JsValue> {
    let signatures: Vec<SignatureInfo> = KEY_SIGNATURES
        .iter()
        .map(|signature| SignatureInfo {
            name: signature.name,
            label: signature.label(),
            tones: signature.scale(4),
        })
        .collect();
    to_json(&signatures)
}

/// The seven tones of a key signature at an octave
#[wasm_bindgen]
pub fn signature_tones(name: &str, octave: i8) -> Result<String, JsValue> {
    let tones = pianotutor::signature_tones_by_name(name, octave).map_err(to_js_error)?;
    to_json(&tones)
}

/// Respell a tone into a key signature
#[wasm_bindgen]
pub fn to_signature(token: &str, signature: &str) -> Result<String, JsValue> {
    let tone = pianotutor::respell(token, signature).map_err(to_js_error)?;
    to_json(&tone)
}

/// Tones between two endpoints on the piano keyboard
#[wasm_bindgen]
pub fn generate_range(start: &str, end: &str, chromatic: bool) -> Result<String, JsValue> {
    let start = Tone::parse_spelled(start).map_err(to_js_error)?;
    let end = Tone::parse_spelled(end).map_err(to_js_error)?;
    let tones =
        pianotutor::generate_range(&start, &end, chromatic, &InstrumentRange::keyboard());
    to_json(&tones)
}

/// Key rectangles for a canvas `available_width` pixels wide
#[wasm_bindgen]
pub fn keyboard_layout(available_width: f64) -> Result<JsValue, JsValue> {
    let layout = KeyboardLayout::new(KeyboardLayout::fit_width(available_width));
    let keys: Vec<&Key> = layout.keys().collect();
    serde_wasm_bindgen::to_value(&keys).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Key under a click, with its highlight shape; `null` when no key was hit
#[wasm_bindgen]
pub fn keyboard_hit(available_width: f64, x: f64, y: f64) -> Result<String, JsValue> {
    let layout = KeyboardLayout::new(KeyboardLayout::fit_width(available_width));
    let hit = layout.hit_test(x, y).map(|key| KeyHighlight {
        key: *key,
        rects: layout.highlight_rects(key),
    });
    to_json(&hit)
}

/// Highlight shape of a tone's key; `null` for tones without a key
#[wasm_bindgen]
pub fn keyboard_highlight(available_width: f64, token: &str) -> Result<String, JsValue> {
    let layout = KeyboardLayout::new(KeyboardLayout::fit_width(available_width));
    let tone = Tone::parse_spelled(token).map_err(to_js_error)?;
    let highlight = layout.find_by_tone(&tone).map(|key| KeyHighlight {
        key: *key,
        rects: layout.highlight_rects(key),
    });
    to_json(&highlight)
}

/// Lines of a staff
#[wasm_bindgen]
pub fn staff_lines(clef: &str) -> Result<String, JsValue> {
    let staff = Staff::new(parse_clef(clef)?);
    to_json(&staff.lines())
}

/// Where a note is drawn on a staff; `null` when it doesn't fit the staff
#[wasm_bindgen]
pub fn staff_note(clef: &str, token: &str) -> Result<String, JsValue> {
    let staff = Staff::new(parse_clef(clef)?);
    let tone = Tone::parse_spelled(token).map_err(to_js_error)?;
    let note = staff.find_line(&tone).map(|placement| StaffNote {
        placement,
        y: staff.note_y(&placement),
        ledger_lines: staff
            .ledger_lines(&placement)
            .into_iter()
            .map(|i| staff.lines()[i])
            .collect(),
    });
    to_json(&note)
}

/// Tone under a click on a staff
#[wasm_bindgen]
pub fn staff_tone_at(clef: &str, y: f64) -> Result<String, JsValue> {
    let staff = Staff::new(parse_clef(clef)?);
    to_json(&staff.tone_at(y))
}

/// Built-in guitar tunings
#[wasm_bindgen]
pub fn tunings() -> Result<String, JsValue> {
    let tunings: Vec<Tuning> = TUNINGS.iter().map(Tuning::from).collect();
    to_json(&tunings)
}

/// Fretboard tone table for a tuning key such as `"DADGBE"`
#[wasm_bindgen]
pub fn guitar_strings(tuning_key: &str, fret_count: usize) -> Result<String, JsValue> {
    let tuning = Tuning::by_key(tuning_key).map_err(to_js_error)?;
    let board = pianotutor::Fretboard::new(tuning, fret_count).map_err(to_js_error)?;
    let cells: Vec<Vec<FretCell>> = board
        .strings()
        .iter()
        .map(|string| {
            string
                .iter()
                .map(|cell| FretCell {
                    tone: cell.tone,
                    label: cell.label(),
                    string: cell.string,
                    fret: cell.fret,
                })
                .collect()
        })
        .collect();
    to_json(&cells)
}

/// Validate the stored game settings, filling in defaults
#[wasm_bindgen]
pub fn game_settings(json: &str) -> Result<String, JsValue> {
    let settings = if json.trim().is_empty() {
        GameSettings::default()
    } else {
        GameSettings::from_json(json).map_err(to_js_error)?
    };
    settings.to_json().map_err(to_js_error)
}

/// Check a pressed key against a shown tone in a key signature
#[wasm_bindgen]
pub fn check_answer(shown: &str, pressed: &str, signature: &str) -> Result<bool, JsValue> {
    let shown = Tone::parse_spelled(shown).map_err(to_js_error)?;
    let pressed = Tone::parse_spelled(pressed).map_err(to_js_error)?;
    let signature = KeySignature::by_name(signature).map_err(to_js_error)?;
    Ok(pianotutor::to_signature(&shown, signature) == pressed)
}
