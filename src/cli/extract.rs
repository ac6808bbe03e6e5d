//! Extract command: parse generator output without touching the sketch.

use crate::cli::common::CliResult;
use crate::cli::{generator_for, load_config, print_json};
use crate::models::{DerivedDimensions, MatrixSet, PinAssignment};
use crate::pipeline::Pipeline;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Extract matrices and pins from generator output and validate them
#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Saved generator output (runs the configured generator when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Treat shape warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ExtractOutput<'a> {
    dimensions: DerivedDimensions,
    matrices: &'a MatrixSet,
    pins: &'a PinAssignment,
    warnings: Vec<String>,
}

impl ExtractArgs {
    /// Execute the extract command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let output = generator_for(self.input.as_ref(), &config).generate()?;
        let prepared = Pipeline::new(&config).strict(self.strict).prepare(&output)?;

        if self.json {
            return print_json(&ExtractOutput {
                dimensions: prepared.dimensions,
                matrices: &prepared.matrices,
                pins: &prepared.pins,
                warnings: prepared
                    .report
                    .warnings
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            });
        }

        println!("Dimensions: {}", prepared.dimensions);
        println!(
            "Input pins:  {}",
            PinAssignment::format_literal(&prepared.pins.input_pins)
        );
        println!(
            "Output pins: {}",
            PinAssignment::format_literal(&prepared.pins.output_pins)
        );
        println!();
        for (name, literal) in prepared.matrices.iter() {
            println!("{name}:");
            println!("{literal}");
            println!();
        }
        if !prepared.report.is_clean() {
            print!("{}", prepared.report.format_message());
        }

        Ok(())
    }
}
