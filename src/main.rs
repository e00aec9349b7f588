use anyhow::{bail, Context};
use clap::{crate_version, App, AppSettings, Arg, SubCommand};
use monkey::parser::ParseError;
use monkey::token::NO_FILEPATH;
use monkey::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{info, Level};

const PROMPT: &str = ">> ";

fn main() {
    let matches = App::new("monkey")
        .version(crate_version!())
        .about("monkey is a toy programming language.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .global(true)
                .help("Log more; repeat for more detail"),
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("Runs the monkey program in the given file")
                .arg(
                    Arg::with_name("FILE")
                        .help("Program to run, a .monkey file")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(SubCommand::with_name("repl").about("Starts a read-evaluate-print loop"))
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let result = match matches.subcommand() {
        ("run", Some(args)) => run_file(args.value_of("FILE").unwrap_or_default()),
        ("repl", Some(_)) => run_prompt(),
        _ => Ok(()),
    };
    if let Err(err) = result {
        eprintln!("monkey: {:#}", err);
        std::process::exit(1);
    }
}

fn run_file(file: &str) -> anyhow::Result<()> {
    let path = Path::new(file);
    let is_monkey = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("monkey"));
    if !is_monkey {
        bail!("expected [filename.monkey], got {}", file);
    }
    let path = fs::canonicalize(path).with_context(|| format!("file {} does not exist", file))?;
    let shown = path.display().to_string();
    let contents =
        fs::read_to_string(&path).with_context(|| format!("could not read {}", shown))?;
    info!(path = %shown, bytes = contents.len(), "running file");

    match monkey::run(&contents, &shown) {
        Ok(value) => {
            println!("{}", value.inspect());
            Ok(())
        }
        Err(Error::Parse(errors)) => {
            eprint!("{}", format_parse_errors(&errors));
            std::process::exit(65);
        }
        Err(err @ Error::Eval(_)) => {
            eprintln!("{}", err);
            std::process::exit(70);
        }
    }
}

fn run_prompt() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line.context("could not read from stdin")?,
            None => return Ok(()),
        };
        match monkey::run(&line, NO_FILEPATH) {
            Ok(value) => println!("{}", value.inspect()),
            Err(Error::Parse(errors)) => print!("{}", format_parse_errors(&errors)),
            Err(err) => println!("{}", err),
        }
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    let mut out = String::from("found parse errors\n\n");
    for (i, err) in errors.iter().enumerate() {
        let location = &err.location;
        out.push_str(&format!(
            "[{}] In {} (line {}, col {}): {}\n",
            i + 1,
            location.path,
            location.line,
            location.column,
            err.message
        ));
    }
    out
}
