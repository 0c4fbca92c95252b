//! `docgrade` - grade one document against its assignment.
//!
//! ```text
//! docgrade <document> --assignment <assignment.json> [--config <options.yaml>] [--format text|yaml] [-v]
//! ```
//!
//! Prints the report on stdout. Exits with 2 when the document, the
//! assignment or the configuration cannot be loaded.

use clap::{Parser, ValueEnum};
use docgrade::{GradingOptions, Report, grade};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Yaml,
}

/// Grade a Word, Writer, Excel or Calc file against an assignment.
#[derive(Parser)]
#[command(name = "docgrade", version, about)]
struct Args {
    /// Document to grade (.docx, .odt, .xlsx, .ods)
    document: PathBuf,

    /// Assignment specification (JSON)
    #[arg(short, long)]
    assignment: PathBuf,

    /// Grading options overriding the defaults (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Stop after the first fatal failure
    #[arg(long)]
    fail_fast: bool,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let fmt = fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(fmt).with(filter).init();
}

fn run(args: &Args) -> docgrade::Result<Report> {
    let options = match &args.config {
        Some(path) => GradingOptions::load(path)?,
        None => GradingOptions::default(),
    };
    let options = if args.fail_fast {
        options.with_fail_fast_on_fatal(true)
    } else {
        options
    };
    grade(&args.document, &args.assignment, &options)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            error!(document = %args.document.display(), "{}", e);
            eprintln!("docgrade: {}", e);
            return ExitCode::from(2);
        },
    };

    match args.format {
        Format::Text => println!("{}", report),
        Format::Yaml => match report.to_yaml() {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => {
                eprintln!("docgrade: {}", e);
                return ExitCode::from(2);
            },
        },
    }
    ExitCode::SUCCESS
}
