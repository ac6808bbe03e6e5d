//! Patch command: rewrite the sketch from generator output.

use crate::cli::common::CliResult;
use crate::cli::{generator_for, load_config, print_json};
use crate::firmware::AnchorChange;
use crate::models::DerivedDimensions;
use crate::pipeline::{Pipeline, SketchUpdate};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Patch the firmware sketch with matrices and pins from generator output
#[derive(Debug, Clone, Args)]
pub struct PatchArgs {
    /// Saved generator output (runs the configured generator when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Sketch to patch (defaults to the configured sketch)
    #[arg(short, long, value_name = "FILE")]
    pub sketch: Option<PathBuf>,

    /// Report what would change without writing the sketch
    #[arg(long)]
    pub dry_run: bool,

    /// Treat shape warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PatchOutput<'a> {
    sketch: String,
    dimensions: DerivedDimensions,
    written: bool,
    dry_run: bool,
    anchors: &'a [AnchorChange],
    warnings: Vec<String>,
}

impl PatchArgs {
    /// Execute the patch command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let sketch = self.sketch.as_ref().unwrap_or(&config.paths.sketch);

        let output = generator_for(self.input.as_ref(), &config).generate()?;
        let pipeline = Pipeline::new(&config)
            .strict(self.strict)
            .dry_run(self.dry_run);
        let prepared = pipeline.prepare(&output)?;
        let update = pipeline.update_sketch(sketch, prepared)?;

        if self.json {
            print_json(&PatchOutput {
                sketch: update.sketch.display().to_string(),
                dimensions: update.prepared.dimensions,
                written: update.written,
                dry_run: self.dry_run,
                anchors: &update.changes,
                warnings: update
                    .prepared
                    .report
                    .warnings
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
        } else {
            print_summary(&update, self.dry_run);
            Ok(())
        }
    }
}

/// Prints one line per anchor followed by what happened to the file.
pub(crate) fn print_summary(update: &SketchUpdate, dry_run: bool) {
    println!(
        "Sketch: {} ({})",
        update.sketch.display(),
        update.prepared.dimensions
    );
    for change in &update.changes {
        let state = if change.changed { "updated" } else { "unchanged" };
        println!("  {:<40} {}", change.anchor, state);
    }
    if !update.prepared.report.is_clean() {
        print!("{}", update.prepared.report.format_message());
    }

    let any_changed = update.changes.iter().any(|c| c.changed);
    if update.written {
        println!("✓ Sketch updated");
    } else if dry_run && any_changed {
        println!("Dry run: sketch not written");
    } else {
        println!("✓ Sketch already up to date");
    }
}
