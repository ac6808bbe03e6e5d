//! CLI command handlers for MatrixSync.
//!
//! Each subcommand is a clap `Args` struct with an `execute` method that
//! returns [`CliResult`]; `main` maps the error kind to the process exit code.

pub mod common;
pub mod config;
pub mod doctor;
pub mod extract;
pub mod patch;
pub mod run;

pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use doctor::DoctorArgs;
pub use extract::ExtractArgs;
pub use patch::PatchArgs;
pub use run::RunArgs;

use crate::collaborators::{MatrixGenerator, SavedOutput, ScriptedGenerator};
use crate::config::Config;
use std::path::PathBuf;

/// Loads the configuration file, reporting a broken file as a validation error.
pub(crate) fn load_config() -> CliResult<Config> {
    Config::load()
        .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
}

/// Replays `input` when given, otherwise runs the configured generator.
pub(crate) fn generator_for(
    input: Option<&PathBuf>,
    config: &Config,
) -> Box<dyn MatrixGenerator> {
    match input {
        Some(path) => Box::new(SavedOutput::new(path)),
        None => Box::new(ScriptedGenerator::new(
            &config.generator,
            &config.paths.generator_dir,
        )),
    }
}

/// Prints a serializable value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}
