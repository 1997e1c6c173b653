//! Tabletop Templates CLI
//!
//! Usage:
//!   tabletop-templates [OPTIONS] [FILE]
//!
//! Options:
//!   -g, --generation <GEN>  Schema generation: legacy (v1) or current (v2)
//!   -c, --config <FILE>     Config file (TOML format)
//!   --schema                Print the JSON Schema for the generation
//!   --normalize             Print the document with all defaults filled in
//!   --format <FORMAT>       Report format: text or json
//!   --no-color              Disable colored output
//!   -v, --verbose           Increase log output (repeatable)
//!   -h, --help              Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tabletop_templates::{
    check, normalize, schema, CheckConfig, CheckError, Generation, ParseError,
};

#[derive(Parser)]
#[command(name = "tabletop-templates")]
#[command(about = "Check tabletop simulator object templates against their schema")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Schema generation the document is written against
    #[arg(short, long, value_enum)]
    generation: Option<Generation>,

    /// Config file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the JSON Schema for the selected generation
    #[arg(long)]
    schema: bool,

    /// Print the document with every default written out
    #[arg(long)]
    normalize: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config, then let flags override it
    let mut config = match &cli.config {
        Some(path) => match CheckConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => CheckConfig::default(),
    };
    if let Some(generation) = cli.generation {
        config.generation = generation;
    }
    if cli.no_color {
        config.color = false;
    }
    debug!(generation = %config.generation, "configuration loaded");

    if cli.schema {
        return match schema::to_string_pretty(config.generation) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error generating schema: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return ExitCode::SUCCESS;
    }

    let filename = cli
        .input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    if cli.normalize {
        return run_normalize(&source, &filename, &config);
    }

    match check(&source, &config) {
        Ok(report) => {
            match cli.format {
                Format::Text => print!("{}", report.render(&source, &filename, config.color)),
                Format::Json => println!("{}", pretty(&report.to_json())),
            }
            if report.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(CheckError::Parse(errors)) => {
            match cli.format {
                Format::Text => print_parse_errors(&errors, &source, &filename, config.color),
                Format::Json => println!("{}", pretty(&parse_errors_json(&errors))),
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_normalize(source: &str, filename: &str, config: &CheckConfig) -> ExitCode {
    match normalize(source, config.generation) {
        Ok(value) => {
            println!("{}", pretty(&value));
            ExitCode::SUCCESS
        }
        Err(CheckError::Parse(errors)) => {
            print_parse_errors(&errors, source, filename, config.color);
            ExitCode::FAILURE
        }
        Err(CheckError::Invalid(violations)) => {
            for violation in &violations {
                eprintln!("{}: {}", filename, violation);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_parse_errors(errors: &[ParseError], source: &str, filename: &str, color: bool) {
    for error in errors {
        eprint!("{}", error.format(source, filename, color));
    }
}

fn parse_errors_json(errors: &[ParseError]) -> serde_json::Value {
    let errors: Vec<serde_json::Value> = errors
        .iter()
        .map(|e| {
            serde_json::json!({
                "message": e.to_string(),
                "start": e.span().start,
                "end": e.span().end,
            })
        })
        .collect();
    serde_json::json!({ "valid": false, "parse_errors": errors })
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn print_intro() {
    println!(
        r#"Tabletop Templates - check object template documents

USAGE:
    tabletop-templates [OPTIONS] [FILE]
    cat template.json | tabletop-templates

OPTIONS:
    -g, --generation   legacy (v1) or current (v2, default)
    -c, --config       Config file (TOML)
    --schema           Print the JSON Schema for the generation
    --normalize        Print the document with defaults filled in
    --format           text or json report
    --no-color         Plain output
    -v, --verbose      More log output on stderr
    -h, --help         Print help

Exits with status 1 when the document is not a valid template."#
    );
}
