//! Pipeline orchestration: extract → infer → validate → patch.
//!
//! Each stage consumes the complete output of the previous one. Any failure
//! stops the run before the sketch is written, and the sketch is only
//! replaced (atomically) after every substitution succeeded in memory.

use crate::collaborators::{Editor, MatrixGenerator};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::firmware::{
    AnchorChange, ConsistencyValidator, DocumentPatcher, FirmwareToolchain, ValidationReport,
};
use crate::models::{DerivedDimensions, MatrixName, MatrixSet, PinAssignment};
use crate::parser::{extract, infer_dimensions, Extraction};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Validated generator data, ready to patch into a sketch.
#[derive(Debug, Clone)]
pub struct PreparedUpdate {
    /// Matrix literals by header
    pub matrices: MatrixSet,
    /// Teensy pin lists
    pub pins: PinAssignment,
    /// Shape inferred from the ONE matrix
    pub dimensions: DerivedDimensions,
    /// Non-fatal validation findings
    pub report: ValidationReport,
}

/// Result of patching a sketch on disk.
#[derive(Debug, Clone)]
pub struct SketchUpdate {
    /// Sketch that was patched
    pub sketch: PathBuf,
    /// Data that went into the sketch
    pub prepared: PreparedUpdate,
    /// Per-anchor summary
    pub changes: Vec<AnchorChange>,
    /// Whether the file on disk was replaced
    pub written: bool,
}

/// Which external steps of a full run to perform.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip compiling and uploading the decoder sketch
    pub skip_decoder: bool,
    /// Skip reviewing the key list in the editor
    pub skip_editor: bool,
    /// Skip compiling and uploading the patched firmware
    pub skip_upload: bool,
}

/// External programs used by a full run.
pub struct Collaborators<'c> {
    /// Produces generator output
    pub generator: &'c dyn MatrixGenerator,
    /// Compiles and flashes sketches
    pub toolchain: &'c dyn FirmwareToolchain,
    /// Lets the operator review the key list
    pub editor: &'c dyn Editor,
}

/// Sequences the pipeline stages with explicit paths and anchor names.
pub struct Pipeline<'a> {
    config: &'a Config,
    strict: bool,
    dry_run: bool,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline over a configuration.
    pub const fn new(config: &'a Config) -> Self {
        Self {
            config,
            strict: false,
            dry_run: false,
        }
    }

    /// Fails on shape warnings instead of reporting them.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Patches in memory only; the sketch is never written.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs extract, infer and validate over generator output text.
    pub fn prepare(&self, output: &str) -> PipelineResult<PreparedUpdate> {
        let Extraction { matrices, pins } = extract(output)?;
        info!(
            "Extracted {} matrix blocks, {} input / {} output pins",
            matrices.len(),
            pins.input_pins.len(),
            pins.output_pins.len()
        );

        let one = matrices
            .get(MatrixName::One)
            .ok_or_else(|| PipelineError::MissingMatrix {
                name: MatrixName::One.header().to_string(),
            })?;
        let dimensions = infer_dimensions(MatrixName::One.header(), one)?;
        info!("Inferred matrix dimensions {}", dimensions);

        let report = ConsistencyValidator::new(&matrices, &pins)
            .with_dimensions(dimensions)
            .strict(self.strict)
            .validate()?;
        for warning in &report.warnings {
            warn!("{}", warning);
        }

        Ok(PreparedUpdate {
            matrices,
            pins,
            dimensions,
            report,
        })
    }

    /// Patches `sketch` with prepared data and persists it if anything changed.
    pub fn update_sketch(
        &self,
        sketch: &Path,
        prepared: PreparedUpdate,
    ) -> PipelineResult<SketchUpdate> {
        let document =
            std::fs::read_to_string(sketch).map_err(|e| PipelineError::io(sketch, e))?;

        let outcome = DocumentPatcher::new(&self.config.anchors).patch(
            &document,
            &prepared.matrices,
            &prepared.pins,
            prepared.dimensions,
        )?;

        let written = if !outcome.is_changed() {
            info!("{} is already up to date", sketch.display());
            false
        } else if self.dry_run {
            info!("Dry run: leaving {} untouched", sketch.display());
            false
        } else {
            atomic_write(sketch, &outcome.document)?;
            info!("Updated {}", sketch.display());
            true
        };

        Ok(SketchUpdate {
            sketch: sketch.to_path_buf(),
            prepared,
            changes: outcome.changes,
            written,
        })
    }

    /// Generates, validates and patches the configured sketch.
    pub fn sync(&self, generator: &dyn MatrixGenerator) -> PipelineResult<SketchUpdate> {
        let output = generator.generate()?;
        let prepared = self.prepare(&output)?;
        self.update_sketch(&self.config.paths.sketch, prepared)
    }

    /// Full flow: flash the decoder, review the key list, generate, patch,
    /// then flash the patched firmware.
    pub fn run(
        &self,
        options: RunOptions,
        collaborators: &Collaborators<'_>,
    ) -> PipelineResult<SketchUpdate> {
        let paths = &self.config.paths;
        let toolchain = &self.config.toolchain;

        if !options.skip_decoder {
            info!("Flashing decoder sketch {}", toolchain.decoder_sketch.display());
            collaborators
                .toolchain
                .compile_and_upload(&toolchain.decoder_sketch)?;
        }

        require_file(&paths.keyboard_file)?;
        if !options.skip_editor {
            collaborators.editor.review(&paths.keyboard_file)?;
            require_file(&paths.keyboard_file)?;
        }

        let update = self.sync(collaborators.generator)?;

        if options.skip_upload || self.dry_run {
            info!("Skipping firmware upload");
        } else {
            info!("Flashing firmware sketch {}", toolchain.firmware_sketch.display());
            collaborators
                .toolchain
                .compile_and_upload(&toolchain.firmware_sketch)?;
        }

        Ok(update)
    }
}

fn require_file(path: &Path) -> PipelineResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::io(
            path,
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        ))
    }
}

/// Writes via a sibling temp file and rename so the sketch is never half-written.
fn atomic_write(path: &Path, content: &str) -> PipelineResult<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    std::fs::write(&temp_path, content).map_err(|e| PipelineError::io(&temp_path, e))?;
    std::fs::rename(&temp_path, path).map_err(|e| PipelineError::io(path, e))?;

    Ok(())
}
