//! Run command: the full decoder → review → generate → patch → flash flow.

use crate::cli::common::CliResult;
use crate::cli::load_config;
use crate::cli::patch::print_summary;
use crate::collaborators::{ExternalEditor, ScriptedGenerator};
use crate::firmware::ArduinoCli;
use crate::pipeline::{Collaborators, Pipeline, RunOptions};
use clap::Args;

/// Flash the decoder, review the key list, regenerate and flash the firmware
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Do not compile or upload the decoder sketch
    #[arg(long)]
    pub skip_decoder: bool,

    /// Do not open the key list in the editor
    #[arg(long)]
    pub skip_editor: bool,

    /// Do not compile or upload the patched firmware
    #[arg(long)]
    pub skip_upload: bool,

    /// Patch in memory only; implies --skip-upload
    #[arg(long)]
    pub dry_run: bool,

    /// Treat shape warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl RunArgs {
    /// Execute the run command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;

        let generator = ScriptedGenerator::new(&config.generator, &config.paths.generator_dir);
        let toolchain = ArduinoCli::new(&config.toolchain);
        let editor = ExternalEditor::new(&config.editor);
        let collaborators = Collaborators {
            generator: &generator,
            toolchain: &toolchain,
            editor: &editor,
        };
        let options = RunOptions {
            skip_decoder: self.skip_decoder,
            skip_editor: self.skip_editor,
            skip_upload: self.skip_upload,
        };

        let update = Pipeline::new(&config)
            .strict(self.strict)
            .dry_run(self.dry_run)
            .run(options, &collaborators)?;

        print_summary(&update, self.dry_run);
        if !(self.skip_upload || self.dry_run) {
            println!("✓ Firmware uploaded");
        }
        Ok(())
    }
}
