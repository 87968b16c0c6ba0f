use chordsheet::{
    chord_diagram, chord_occurrences, enharmonic_toggle, tokenize_sheet, transpose, unique_chords, Direction,
    Edit, ShapeDatabase, SheetConfig,
};
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "Usage: chordsheet [--config <settings.yaml>] [--shapes <db.json|db.yaml>] \
                     [--transpose up|down | --enharmonic] <input> [output]";

enum Mode {
    Tokens,
    Transpose(Direction),
    Enharmonic,
    Overview(String),
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let mut config_path: Option<&String> = None;
    let mut mode = Mode::Tokens;
    let mut positional: Vec<&String> = Vec::new();

    // Parse flags
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => config_path = Some(flag_value(&mut iter, "--config")),
            "--shapes" => mode = Mode::Overview(flag_value(&mut iter, "--shapes").clone()),
            "--transpose" => {
                let value = flag_value(&mut iter, "--transpose");
                match value.parse() {
                    Ok(direction) => mode = Mode::Transpose(direction),
                    Err(e) => {
                        eprintln!("{}", e);
                        process::exit(1);
                    }
                }
            }
            "--enharmonic" => mode = Mode::Enharmonic,
            _ => positional.push(arg),
        }
    }

    let (input_path, output_path) = match positional.as_slice() {
        [input] => (*input, None),
        [input, output] => (*input, Some(*output)),
        _ => {
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    let config = match config_path {
        Some(path) => SheetConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("{}", e);
            process::exit(1);
        }),
        None => SheetConfig::default(),
    };

    // Read input file
    let source = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    let lines = tokenize_sheet(&source, &config);

    let output = match mode {
        Mode::Tokens => {
            let mut out = String::new();
            for line in &lines {
                match serde_json::to_string(line) {
                    Ok(json) => {
                        out.push_str(&json);
                        out.push('\n');
                    }
                    Err(e) => {
                        eprintln!("Error serializing tokens: {}", e);
                        process::exit(1);
                    }
                }
            }
            out
        }
        Mode::Transpose(direction) => apply_edits(&source, transpose(&chord_occurrences(&lines), direction)),
        Mode::Enharmonic => apply_edits(&source, enharmonic_toggle(&chord_occurrences(&lines))),
        Mode::Overview(shapes_path) => {
            let database = ShapeDatabase::from_file(&shapes_path).unwrap_or_else(|e| {
                eprintln!("{}", e);
                process::exit(1);
            });
            if database.instrument != config.instrument {
                tracing::warn!(
                    configured = %config.instrument,
                    database = %database.instrument,
                    "shape database is for a different instrument"
                );
            }
            let mut out = String::new();
            for token in unique_chords(&lines) {
                let Some(info) = token.chord_info() else { continue };
                let shape = chord_diagram(&info.chord, &database)
                    .map(|diagram| diagram.frets().to_string())
                    .unwrap_or_else(|| "no shape".to_string());
                out.push_str(&format!("{}\t{}\n", token.text, shape));
            }
            out
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote {}", path);
        }
        None => {
            print!("{}", output);
        }
    }
}

fn flag_value<'a>(iter: &mut std::slice::Iter<'a, String>, flag: &str) -> &'a String {
    match iter.next() {
        Some(value) => value,
        None => {
            eprintln!("Missing value for {}", flag);
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    }
}

/// Replace each edited span, last first so earlier offsets stay valid
fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| std::cmp::Reverse(edit.span.start));
    let mut text = source.to_string();
    for edit in edits {
        text.replace_range(edit.span.start..edit.span.end, &edit.text);
    }
    text
}
