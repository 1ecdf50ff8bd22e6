use std::env;
use std::process;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use pianotutor::guitar::TUNINGS;
use pianotutor::signature::KEY_SIGNATURES;
use pianotutor::{
    check_octave, chord_by_name, generate_range, Clef, KeySignature, KeyboardLayout, Round, Staff,
    Tone, TrainerConfig, Tuning, TutorError,
};

const USAGE: &str = "\
Usage: pianotutor [--config FILE] <command>

Commands:
  tone <TOKEN>                    describe a tone (C#4, Bb3)
  chord <ROOT> <QUALITY> [OCTAVE] chord tones (C MINOR, DbC# m7 3)
  signature [NAME] [OCTAVE]       key signature tones, or list all signatures
  range <START> <END> [--chromatic]
  staff <treble|bass> <TONE>      staff placement and ledger lines
  key <X> <Y> [RATIO]             keyboard key under a point
  guitar [TUNING | --list]        fretboard of a tuning, or list tunings
  game <SEED>                     simulate a tone game round";

fn main() {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut config = TrainerConfig::default();
    if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 {
            eprintln!("{}", USAGE);
            process::exit(1);
        }
        config = match TrainerConfig::from_file(&args[1]) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        };
        args = args.split_off(2);
    }

    if args.is_empty() {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    match run(&config, &args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str, TutorError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| TutorError::ConfigError(format!("missing argument <{}>\n\n{}", name, USAGE)))
}

fn number<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> Result<T, TutorError> {
    match args.get(index) {
        Some(value) => value
            .parse()
            .map_err(|_| TutorError::ConfigError(format!("'{}' is not a number", value))),
        None => Ok(default),
    }
}

fn join(tones: &[Tone]) -> String {
    tones
        .iter()
        .map(Tone::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn run(config: &TrainerConfig, args: &[String]) -> Result<String, TutorError> {
    debug!("command {:?}", args);
    match args[0].as_str() {
        "tone" => {
            let tone = Tone::parse_spelled(arg(args, 1, "TOKEN")?)?;
            Ok(format!(
                "{} chromatic index {} pitch {} clef {:?}",
                tone.to_string_with_flat(true),
                tone.chromatic_index(),
                tone.pitch(),
                Clef::for_tone(&tone)
            ))
        }
        "chord" => {
            let octave = number(args, 3, Tone::middle_c().octave())?;
            let tones = chord_by_name(arg(args, 1, "ROOT")?, octave, arg(args, 2, "QUALITY")?)?;
            Ok(join(&tones))
        }
        "signature" => match args.get(1) {
            Some(name) => {
                let signature = KeySignature::by_name(name)?;
                let octave = check_octave(number(args, 2, 4)?)?;
                Ok(format!(
                    "{}\n  letters: {}\n  scale:   {}",
                    signature.label(),
                    join(&signature.signature_tones(octave)),
                    join(&signature.scale(octave))
                ))
            }
            None => Ok(KEY_SIGNATURES
                .iter()
                .map(|s| s.label())
                .collect::<Vec<_>>()
                .join("\n")),
        },
        "range" => {
            let start = Tone::parse_spelled(arg(args, 1, "START")?)?;
            let end = Tone::parse_spelled(arg(args, 2, "END")?)?;
            let chromatic = args.iter().any(|a| a == "--chromatic");
            let tones = generate_range(&start, &end, chromatic, &config.keyboard_range);
            if tones.is_empty() {
                return Err(TutorError::EmptyRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
            Ok(format!("{} tones: {}", tones.len(), join(&tones)))
        }
        "staff" => {
            let clef = match arg(args, 1, "CLEF")? {
                "treble" => Clef::Treble,
                "bass" => Clef::Bass,
                other => {
                    return Err(TutorError::ConfigError(format!("unknown clef '{}'", other)))
                }
            };
            let tone = Tone::parse_spelled(arg(args, 2, "TONE")?)?;
            let staff = Staff::new(clef);
            match staff.find_line(&tone) {
                Some(placement) => {
                    let line = staff.lines()[placement.line_index];
                    let ledger: Vec<Tone> = staff
                        .ledger_lines(&placement)
                        .into_iter()
                        .map(|i| staff.lines()[i].tone)
                        .collect();
                    Ok(format!(
                        "{} on line {} ({}) exact {} direction {} y {}\n  ledger lines: {}",
                        tone,
                        placement.line_index,
                        line.tone,
                        placement.exact,
                        placement.direction,
                        staff.note_y(&placement),
                        join(&ledger)
                    ))
                }
                None => Ok(format!("{} does not fit the {:?} staff", tone, clef)),
            }
        }
        "key" => {
            let x = number(args, 1, 0.0)?;
            let y = number(args, 2, 0.0)?;
            let ratio = number(args, 3, 1.0)?;
            let layout = KeyboardLayout::new(ratio);
            match layout.hit_test(x, y) {
                Some(key) => {
                    let rects = layout.highlight_rects(key);
                    Ok(format!("{} highlight {:?}", key.label(), rects))
                }
                None => Ok("no key".to_string()),
            }
        }
        "guitar" => {
            if args.get(1).map(String::as_str) == Some("--list") {
                return Ok(TUNINGS
                    .iter()
                    .map(|t| format!("{:<16}{}", t.name, t.key))
                    .collect::<Vec<_>>()
                    .join("\n"));
            }
            let tuning = match args.get(1) {
                Some(key) => Tuning::by_key(key)?,
                None => config.tuning.clone(),
            };
            let board = pianotutor::Fretboard::new(tuning, config.guitar_frets)?;
            let mut lines = vec![format!("{} ({})", board.tuning().name, board.tuning().key)];
            lines.extend(board.strings().iter().map(|string| {
                string
                    .iter()
                    .map(|cell| format!("{:>7}", cell.label()))
                    .collect::<String>()
            }));
            Ok(lines.join("\n"))
        }
        "game" => {
            let seed = number(args, 1, 0u64)?;
            let mut rng = StdRng::seed_from_u64(seed);
            let mut round = Round::start_within(&config.game, &config.keyboard_range, &mut rng)?;
            let mut lines = vec![round.score().status("Game has started!")];
            while let Some(shown) = round.next_tone() {
                let expected = round.expected().unwrap_or(shown);
                lines.push(format!("{} -> {}", shown, expected));
                round.time_out();
            }
            lines.push(round.score().status("Finish"));
            Ok(lines.join("\n"))
        }
        other => Err(TutorError::ConfigError(format!(
            "unknown command '{}'\n\n{}",
            other, USAGE
        ))),
    }
}
