//! CLI application for reading-order text extraction.
//!
//! `pdf`, `ocr` and `blocks` print exactly one JSON object on stdout, also on
//! failure, and exit with status 1 when `success` is false. Diagnostics go to
//! stderr.

mod commands;
mod output;
mod quiet;

use std::io::Write;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{blocks, config, ocr, pdf, Context};

/// Reconstruct reading order from PDF pages, OCR scans and block dumps
#[derive(Parser)]
#[command(name = "readorder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (logs go to stderr)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Give up after this many seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a PDF in reading order
    Pdf(pdf::PdfArgs),

    /// Recognize text in an image
    Ocr(ocr::OcrArgs),

    /// Order blocks from a JSON dump
    Blocks(blocks::BlocksArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() {
    quiet::preserve_stdout();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            process::exit(0);
        }
        Err(e) => {
            let message = e.to_string();
            let first_line = message.lines().next().unwrap_or("invalid arguments");
            finish(output::emit_error(first_line.trim_start_matches("error: "), false));
        }
    };

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {}", e);
    }

    let pretty = cli.pretty;
    match run(cli).await {
        Ok(()) => finish(0),
        Err(e) => finish(output::emit_error(&format!("{:#}", e), pretty)),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    let load = || Context::load(config_path, cli.verbose, cli.timeout);

    // Execute command
    match cli.command {
        Commands::Pdf(args) => output::emit(&pdf::run(args, &load()?).await?, cli.pretty),
        Commands::Ocr(args) => output::emit(&ocr::run(args, &load()?).await?, cli.pretty),
        Commands::Blocks(args) => output::emit(&blocks::run(args, &load()?).await?, cli.pretty),
        Commands::Config(args) => config::run(args, config_path),
    }
}

/// Flush and exit without waiting for blocking workers abandoned by a timeout.
fn finish(code: i32) -> ! {
    let _ = std::io::stdout().flush();
    process::exit(code)
}
