//! Matrix generator invocation.
//!
//! The generator is an interactive script. It is fed a fixed list of answers
//! on stdin and its stdout becomes the text the extractor parses.

use crate::config::GeneratorConfig;
use crate::error::{PipelineError, PipelineResult};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Source of generator output.
pub trait MatrixGenerator {
    /// Produces the full generator output text.
    fn generate(&self) -> PipelineResult<String>;
}

/// Runs the generator as a subprocess with scripted stdin answers.
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    program: String,
    args: Vec<String>,
    answers: Vec<String>,
    working_dir: PathBuf,
}

impl ScriptedGenerator {
    /// Creates a generator from configuration, run inside `working_dir`.
    pub fn new(config: &GeneratorConfig, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            answers: config.answers.clone(),
            working_dir: working_dir.into(),
        }
    }

    /// Stdin payload: one answer per line.
    fn script(&self) -> String {
        self.answers
            .iter()
            .map(|answer| format!("{answer}\n"))
            .collect()
    }

    fn tool_name(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl MatrixGenerator for ScriptedGenerator {
    fn generate(&self) -> PipelineResult<String> {
        let tool = self.tool_name();
        info!("Running generator: {} (in {})", tool, self.working_dir.display());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PipelineError::collaborator(&tool, format!("failed to start: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(self.script().as_bytes()) {
                // A generator that stops reading early is judged by its exit status.
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(PipelineError::collaborator(
                        &tool,
                        format!("failed to write answers: {e}"),
                    ));
                }
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| PipelineError::collaborator(&tool, format!("failed to wait: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::collaborator(
                tool,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(bytes = stdout.len(), "Generator finished");
        Ok(stdout)
    }
}

/// Replays generator output previously saved to a file.
#[derive(Debug, Clone)]
pub struct SavedOutput {
    path: PathBuf,
}

impl SavedOutput {
    /// Creates a replay source for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MatrixGenerator for SavedOutput {
    fn generate(&self) -> PipelineResult<String> {
        info!("Reading generator output from {}", self.path.display());
        std::fs::read_to_string(&self.path).map_err(|e| PipelineError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_script_is_one_answer_per_line() {
        let generator = ScriptedGenerator::new(&GeneratorConfig::default(), ".");
        assert_eq!(generator.script(), "1\n4\nn\n");
        assert_eq!(generator.tool_name(), "python3 matrixgenerator.py");
    }

    #[test]
    fn test_saved_output_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.txt");
        std::fs::write(&path, "-----ONE-----\n{\n{0}\n}\n").unwrap();

        let text = SavedOutput::new(&path).generate().unwrap();
        assert!(text.starts_with("-----ONE-----"));
    }

    #[test]
    fn test_saved_output_missing_file() {
        let err = SavedOutput::new("/nonexistent/generator-output.txt")
            .generate()
            .unwrap_err();
        assert_eq!(err.stage(), "io");
    }

    #[cfg(unix)]
    #[test]
    fn test_scripted_generator_echoes_stdin() {
        let config = GeneratorConfig {
            program: "cat".to_string(),
            args: vec![],
            answers: vec!["1".to_string(), "4".to_string(), "n".to_string()],
        };
        let output = ScriptedGenerator::new(&config, ".").generate().unwrap();
        assert_eq!(output, "1\n4\nn\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_collaborator_failure() {
        let config = GeneratorConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()],
            answers: vec![],
        };
        let err = ScriptedGenerator::new(&config, ".").generate().unwrap_err();
        match err {
            PipelineError::CollaboratorFailure { message, .. } => {
                assert!(message.contains("boom"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
