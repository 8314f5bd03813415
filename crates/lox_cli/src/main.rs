//! lox: Scan Lox scripts and print their tokens.
//!
//! Usage:
//!   lox [options] [script]
//!
//! With a script, scans the file and exits non-zero if any error was
//! reported. Without one, starts an interactive prompt that scans each line.

mod report;

use clap::{Parser as ClapParser, ValueEnum};
use lox_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticSink};
use lox_options::{OptionsError, OutputFormat, ScanOptions};
use lox_scanner::{scan_tokens, Token};
use report::SourceReport;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// Exit statuses, following sysexits.h.
const EXIT_USAGE: i32 = 64;
const EXIT_DATA_ERROR: i32 = 65;
const EXIT_NO_INPUT: i32 = 66;
const EXIT_IO_ERROR: i32 = 74;
const EXIT_CONFIG: i32 = 78;

const PROMPT: &str = "λ ";
const REPL_SOURCE_NAME: &str = "<prompt>";

#[derive(ClapParser, Debug)]
#[command(name = "lox", about = "Scan Lox source into tokens", version)]
struct Cli {
    /// Script to scan. Starts an interactive prompt when omitted.
    #[arg(value_name = "SCRIPT")]
    scripts: Vec<PathBuf>,

    /// How to print the tokens.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Path to a lox.json (defaults to ./lox.json when present).
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Print diagnostics as plain `[line N] Error: ...` lines.
    #[arg(long)]
    plain: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("cannot serialize tokens: {0}")]
    Json(#[from] serde_json::Error),
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let script = match script_arg(&cli) {
        Ok(script) => script,
        Err(code) => {
            eprintln!("Usage: lox [script]");
            process::exit(code);
        }
    };

    let options = match resolve_options(&cli) {
        Ok(options) => options,
        Err(e) => {
            print_error(&e.to_string());
            process::exit(EXIT_CONFIG);
        }
    };
    debug!(?options, "resolved options");

    let exit_code = match script {
        Some(path) => run_file(path, &options),
        None => run_prompt(&options),
    };
    process::exit(exit_code);
}

/// The script to run, or the usage exit status when more than one is given.
fn script_arg(cli: &Cli) -> Result<Option<&Path>, i32> {
    match cli.scripts.as_slice() {
        [] => Ok(None),
        [path] => Ok(Some(path.as_path())),
        _ => Err(EXIT_USAGE),
    }
}

/// Config file values, overridden by command-line flags.
fn resolve_options(cli: &Cli) -> Result<ScanOptions, OptionsError> {
    let from_file = match cli.config {
        Some(ref path) => lox_options::parse_options_file(path)?,
        None => lox_options::find_options(Path::new("."))?.unwrap_or_default(),
    };
    let from_flags = ScanOptions {
        output: cli.format.map(OutputFormat::from),
        pretty: cli.plain.then_some(false),
    };
    Ok(from_file.merge(from_flags))
}

fn run_file(path: &Path, options: &ScanOptions) -> i32 {
    let name = path.display().to_string();
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            print_error(&format!("cannot read '{}': {}", name, e));
            return EXIT_NO_INPUT;
        }
    };
    info!(file = %name, bytes = source.len(), "scanning file");

    let mut sink = DiagnosticCollection::new();
    if source.is_empty() {
        sink.report(Diagnostic::new(1, &messages::EMPTY_SOURCE_FILE, &[name.as_str()]));
    }

    match run(&name, &source, options, &mut sink) {
        Ok(()) if sink.had_error() => EXIT_DATA_ERROR,
        Ok(()) => 0,
        Err(e) => {
            print_error(&e.to_string());
            EXIT_IO_ERROR
        }
    }
}

fn run_prompt(options: &ScanOptions) -> i32 {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("{}", PROMPT);
        if let Err(e) = io::stdout().flush() {
            print_error(&e.to_string());
            return EXIT_IO_ERROR;
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                println!();
                return 0;
            }
            Ok(_) => {}
            Err(e) => {
                print_error(&e.to_string());
                return EXIT_IO_ERROR;
            }
        }
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');

        match run_line(line, options) {
            Ok(had_error) => debug!(had_error, "prompt line scanned"),
            Err(e) => {
                print_error(&e.to_string());
                return EXIT_IO_ERROR;
            }
        }
    }
}

/// Scan one prompt line. Each line starts with a clean error flag.
fn run_line(line: &str, options: &ScanOptions) -> Result<bool, CliError> {
    let mut sink = DiagnosticCollection::new();
    run(REPL_SOURCE_NAME, line, options, &mut sink)?;
    Ok(sink.had_error())
}

/// Scan one source unit, print its tokens to stdout and its diagnostics to stderr.
fn run(
    name: &str,
    source: &str,
    options: &ScanOptions,
    sink: &mut DiagnosticCollection,
) -> Result<(), CliError> {
    let tokens = scan_tokens(source, sink);

    let stdout = io::stdout();
    write_tokens(&mut stdout.lock(), &tokens, options.output())?;

    let pretty = options.pretty() && atty_is_terminal();
    print_diagnostics(sink, name, source, pretty);
    Ok(())
}

fn write_tokens(out: &mut impl Write, tokens: &[Token], format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => {
            for token in tokens {
                writeln!(out, "{}", token)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, tokens)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn print_diagnostics(sink: &DiagnosticCollection, name: &str, source: &str, pretty: bool) {
    for diag in sink.diagnostics() {
        if pretty {
            let report = miette::Report::new(SourceReport::new(diag, name, source));
            eprintln!("{:?}", report);
        } else {
            eprintln!("{}", diag);
        }
    }

    if sink.has_errors() {
        let count = sink.error_count();
        eprintln!(
            "Found {} error{}.",
            count,
            if count == 1 { "" } else { "s" }
        );
    }
}

fn print_error(msg: &str) {
    if atty_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn atty_is_terminal() -> bool {
    // On Unix, check if stderr is a terminal
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        true // Assume terminal on other platforms
    }
}
