//! MatrixSync - keep a keyboard firmware sketch in sync with generated matrices
//!
//! Reads the matrix generator's output, validates it, and patches the
//! sketch's size constants, keycode matrices and pin arrays in place.

use clap::{Parser, Subcommand};
use matrixsync::cli::{ConfigArgs, DoctorArgs, ExitCode, ExtractArgs, PatchArgs, RunArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// MatrixSync - keep a keyboard firmware sketch in sync with generated matrices
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract and validate generator output
    Extract(ExtractArgs),
    /// Patch the sketch from generator output
    Patch(PatchArgs),
    /// Full flow: decoder, review, generate, patch, upload
    Run(RunArgs),
    /// Check programs and files the workflow needs
    Doctor(DoctorArgs),
    /// Show or change configuration
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so --json output on stdout stays parseable
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Command::Extract(args) => args.execute(),
        Command::Patch(args) => args.execute(),
        Command::Run(args) => args.execute(),
        Command::Doctor(args) => args.execute(),
        Command::Config(args) => args.execute(),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(err.kind.code());
    }
    std::process::exit(ExitCode::Success.code());
}
