//! Configuration management CLI commands.

use crate::cli::common::{CliError, CliResult};
use crate::cli::{load_config, print_json};
use crate::config::Config;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Firmware sketch to patch
    #[arg(long, value_name = "FILE")]
    sketch: Option<PathBuf>,

    /// Key list the generator reads
    #[arg(long, value_name = "FILE")]
    keyboard_file: Option<PathBuf>,

    /// Directory the generator runs in
    #[arg(long, value_name = "DIR")]
    generator_dir: Option<PathBuf>,

    /// Fully qualified board name
    #[arg(long, value_name = "FQBN")]
    fqbn: Option<String>,

    /// Upload port
    #[arg(long, value_name = "PORT")]
    port: Option<String>,

    /// Editor used to review the key list (clears `editor.args`)
    #[arg(long, value_name = "PROGRAM")]
    editor: Option<String>,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;

        if self.json {
            print_json(&config)
        } else {
            output_human_readable(&config);
            Ok(())
        }
    }
}

impl ConfigSetArgs {
    const fn is_empty(&self) -> bool {
        self.sketch.is_none()
            && self.keyboard_file.is_none()
            && self.generator_dir.is_none()
            && self.fqbn.is_none()
            && self.port.is_none()
            && self.editor.is_none()
    }

    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.is_empty() {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --sketch, --keyboard-file, --generator-dir, --fqbn, --port or --editor",
            ));
        }

        let mut config = Config::load().unwrap_or_default();

        if let Some(path) = &self.sketch {
            if !path.is_file() {
                return Err(CliError::validation(format!(
                    "Sketch does not exist: {}",
                    path.display()
                )));
            }
            config.paths.sketch.clone_from(path);
        }
        if let Some(path) = &self.keyboard_file {
            config.paths.keyboard_file.clone_from(path);
        }
        if let Some(path) = &self.generator_dir {
            if !path.is_dir() {
                return Err(CliError::validation(format!(
                    "Generator directory does not exist: {}",
                    path.display()
                )));
            }
            config.paths.generator_dir.clone_from(path);
        }
        if let Some(fqbn) = &self.fqbn {
            config.toolchain.fqbn.clone_from(fqbn);
        }
        if let Some(port) = &self.port {
            config.toolchain.port.clone_from(port);
        }
        if let Some(editor) = &self.editor {
            config.editor.program.clone_from(editor);
            // Extra arguments belong to the previous program
            config.editor.args.clear();
        }

        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated successfully.");

        Ok(())
    }
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    println!("MatrixSync Configuration");
    println!("========================");
    println!();

    println!("Paths:");
    println!("  Sketch:         {}", config.paths.sketch.display());
    println!("  Keyboard File:  {}", config.paths.keyboard_file.display());
    println!("  Generator Dir:  {}", config.paths.generator_dir.display());
    println!();

    println!("Generator:");
    println!(
        "  Command: {} {}",
        config.generator.program,
        config.generator.args.join(" ")
    );
    println!("  Answers: {}", config.generator.answers.join(", "));
    println!();

    println!("Toolchain:");
    println!("  CLI:      {}", config.toolchain.cli);
    println!("  FQBN:     {}", config.toolchain.fqbn);
    println!("  Port:     {}", config.toolchain.port);
    println!("  Decoder:  {}", config.toolchain.decoder_sketch.display());
    println!("  Firmware: {}", config.toolchain.firmware_sketch.display());
    println!();

    println!("Editor:");
    println!(
        "  {} {} (Ln {}, Col {})",
        config.editor.program,
        config.editor.args.join(" "),
        config.editor.line,
        config.editor.column
    );
    if config.editor.timeout_secs > 0 {
        println!("  Review window: {}s", config.editor.timeout_secs);
    } else {
        println!("  Review window: unlimited");
    }
    println!();
}
