//! Command-line interface for zatlin
//! This binary checks zatlin sources and generates words from them.
//!
//! Usage:
//!   zatlin check `<path>` [--format `<format>`]                         - Report diagnostics
//!   zatlin generate `<path>` [-n `<count>`] [--unique] [--seed `<n>`]    - Generate words
//!   zatlin tokens `<path>` [--format `<format>`]                        - Dump the token stream
//!
//! Settings come from the built-in defaults, then a `zatlin.toml` beside the source, then the
//! file given with `--config <file>`, then the flags above.
//! Set `RUST_LOG=zatlin=debug` to see what the compiler is doing.

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;
use zatlin::zatlin::config::{Loader, Overrides, ZatlinConfig};
use zatlin::zatlin::formats::{render_diagnostics, render_tokens, render_words, OutputFormat};
use zatlin::zatlin::lexing::tokenize;
use zatlin::{Zatlin, ZatlinError};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path_arg = Arg::new("path")
        .help("Path to the zatlin source")
        .required(true)
        .index(1);
    let format_arg = Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format: text, json or yaml (default from config)");
    let config_arg = Arg::new("config")
        .long("config")
        .short('c')
        .help("TOML configuration file layered over the defaults");

    let matches = Command::new("zatlin")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate pseudo-words from zatlin grammars")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("check")
                .about("Compile a source and report its diagnostics")
                .arg(path_arg.clone())
                .arg(format_arg.clone())
                .arg(config_arg.clone()),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate words from a source")
                .arg(path_arg.clone())
                .arg(
                    Arg::new("count")
                        .long("count")
                        .short('n')
                        .help("Number of words to generate")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("unique")
                        .long("unique")
                        .short('u')
                        .help("Do not repeat words within one run")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .short('s')
                        .help("Seed for reproducible output")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(format_arg.clone())
                .arg(config_arg.clone()),
        )
        .subcommand(
            Command::new("tokens")
                .about("Dump the token stream of a source")
                .arg(path_arg)
                .arg(format_arg)
                .arg(config_arg),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("check", check_matches)) => handle_check_command(check_matches),
        Some(("generate", generate_matches)) => handle_generate_command(generate_matches),
        Some(("tokens", tokens_matches)) => handle_tokens_command(tokens_matches),
        _ => unreachable!(),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

/// Builds the configuration for `source`: defaults, its project file, `--config`, then flags.
fn load_config(matches: &ArgMatches, source: &str) -> Result<ZatlinConfig, ZatlinError> {
    let overrides = Overrides {
        count: matches.try_get_one::<u64>("count").ok().flatten().copied(),
        unique: matches.try_get_one::<bool>("unique").ok().flatten() == Some(&true),
        seed: matches.try_get_one::<u64>("seed").ok().flatten().copied(),
        format: matches.get_one::<String>("format").cloned(),
    };

    let mut loader = Loader::from_defaults().with_project_file(source);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    loader.with_overrides(&overrides)?.build()
}

fn load_source(matches: &ArgMatches) -> Result<(String, Zatlin, ZatlinConfig), ZatlinError> {
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    let config = load_config(matches, path)?;
    let mut zatlin = match config.generate.seed {
        Some(seed) => Zatlin::with_seed(seed),
        None => Zatlin::new(),
    };
    zatlin.load_file(path)?;
    Ok((path.clone(), zatlin, config))
}

/// Handle the check command. Exits with 1 when the source has errors.
fn handle_check_command(matches: &ArgMatches) -> Result<i32, ZatlinError> {
    let (_, zatlin, config) = load_source(matches)?;
    let format = config.output.format()?;

    let mut records = zatlin.records();
    if !config.output.show_warnings {
        records.retain(|r| r.severity == zatlin::Severity::Error);
    }
    let output = render_diagnostics(&records, format)?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(if zatlin.is_available() { 0 } else { 1 })
}

/// Handle the generate command. Diagnostics go to stderr, words to stdout.
fn handle_generate_command(matches: &ArgMatches) -> Result<i32, ZatlinError> {
    let (path, mut zatlin, config) = load_source(matches)?;
    let format = config.output.format()?;

    if !zatlin.is_available() {
        eprintln!("{} does not compile:", path);
        eprintln!("{}", render_diagnostics(&zatlin.records(), OutputFormat::Text)?);
        return Ok(1);
    }

    if config.output.show_warnings && !zatlin.warnings().is_empty() {
        eprintln!("{}", render_diagnostics(&zatlin.records(), OutputFormat::Text)?);
    }

    let words = zatlin.generate_batch(
        config.generate.count,
        config.generate.unique,
        config.generate.unique_attempts,
    );
    let records = if config.output.show_warnings {
        zatlin.records()
    } else {
        Vec::new()
    };
    println!("{}", render_words(&words, &records, format)?);
    Ok(0)
}

/// Handle the tokens command
fn handle_tokens_command(matches: &ArgMatches) -> Result<i32, ZatlinError> {
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    let config = load_config(matches, path)?;
    let source = fs::read_to_string(path).map_err(|source| ZatlinError::Read {
        path: path.into(),
        source,
    })?;

    let lexed = tokenize(&source);
    println!("{}", render_tokens(&lexed.tokens, config.output.format()?)?);
    Ok(if lexed.diagnostics.has_errors() { 1 } else { 0 })
}
