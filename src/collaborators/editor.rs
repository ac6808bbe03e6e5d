//! Opening the key list in an external editor.
//!
//! The review is bounded: once the configured window has passed the editor
//! is killed and the pipeline carries on with whatever was saved.

use crate::config::EditorConfig;
use crate::error::{PipelineError, PipelineResult};
use std::path::Path;
use std::process::{Child, Command, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lets the operator review a file before the pipeline continues.
pub trait Editor {
    /// Opens `path` and returns once the operator is done with it.
    fn review(&self, path: &Path) -> PipelineResult<()>;
}

/// An editor launched as a child process; review ends when it exits or the
/// review window closes.
#[derive(Debug, Clone)]
pub struct ExternalEditor {
    program: String,
    extra_args: Vec<String>,
    line: u32,
    column: u32,
    timeout: Option<Duration>,
}

impl ExternalEditor {
    /// Creates an editor from configuration.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            program: config.program.clone(),
            extra_args: config.args.clone(),
            line: config.line,
            column: config.column,
            timeout: (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs)),
        }
    }

    fn args(&self, path: &Path) -> Vec<String> {
        let mut args = self.extra_args.clone();
        args.extend([
            "--line".to_string(),
            self.line.to_string(),
            "--column".to_string(),
            self.column.to_string(),
            path.display().to_string(),
        ]);
        args
    }

    /// Waits for the child, killing it once `timeout` has elapsed.
    ///
    /// Returns `None` when the editor had to be closed.
    fn wait_bounded(&self, child: &mut Child) -> PipelineResult<Option<ExitStatus>> {
        let Some(timeout) = self.timeout else {
            return child.wait().map(Some).map_err(|e| self.wait_failed(&e));
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait().map_err(|e| self.wait_failed(&e))? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }

        warn!(
            "Review time of {}s is up, closing {}",
            timeout.as_secs(),
            self.program
        );
        // The child may exit between the last poll and the kill
        if let Err(e) = child.kill() {
            warn!("Could not kill {}: {}", self.program, e);
        }
        child.wait().map_err(|e| self.wait_failed(&e))?;
        Ok(None)
    }

    fn wait_failed(&self, e: &std::io::Error) -> PipelineError {
        PipelineError::collaborator(&self.program, format!("failed to wait: {e}"))
    }
}

impl Editor for ExternalEditor {
    fn review(&self, path: &Path) -> PipelineResult<()> {
        info!(
            "Opening {} in {} at Ln {}, Col {}",
            path.display(),
            self.program,
            self.line,
            self.column
        );

        let mut child = Command::new(&self.program)
            .args(self.args(path))
            .spawn()
            .map_err(|e| {
                PipelineError::collaborator(
                    &self.program,
                    format!("not installed or not in PATH: {e}"),
                )
            })?;

        match self.wait_bounded(&mut child)? {
            None => {
                info!("{} closed, continuing", self.program);
                Ok(())
            }
            Some(status) if status.success() => Ok(()),
            Some(status) => Err(PipelineError::collaborator(
                &self.program,
                format!("exited with {status}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_arguments() {
        let editor = ExternalEditor::new(&EditorConfig::default());
        assert_eq!(
            editor.args(Path::new("keys.txt")),
            vec!["--block", "--line", "1", "--column", "33", "keys.txt"]
        );
        assert_eq!(editor.timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_timeout_means_unbounded() {
        let editor = ExternalEditor::new(&EditorConfig {
            timeout_secs: 0,
            ..EditorConfig::default()
        });
        assert_eq!(editor.timeout, None);
    }

    #[test]
    fn test_missing_editor() {
        let editor = ExternalEditor::new(&EditorConfig {
            program: "matrixsync-no-such-editor".to_string(),
            ..EditorConfig::default()
        });
        let err = editor.review(Path::new("keys.txt")).unwrap_err();
        assert!(err.to_string().contains("not installed"));
    }

    // `sh -c <script> <name>` ignores the cursor arguments appended after it.
    #[cfg(unix)]
    fn shell_editor(script: &str, timeout_secs: u64) -> ExternalEditor {
        ExternalEditor::new(&EditorConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "editor".to_string()],
            timeout_secs,
            ..EditorConfig::default()
        })
    }

    #[cfg(unix)]
    #[test]
    fn test_review_is_closed_after_timeout() {
        let editor = shell_editor("sleep 5", 1);

        let started = Instant::now();
        editor.review(Path::new("keys.txt")).unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_secs(1), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_review_waits_for_editor_exit() {
        let editor = shell_editor("exit 0", 5);

        let started = Instant::now();
        editor.review(Path::new("keys.txt")).unwrap();
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_editor_failure_is_reported() {
        let err = shell_editor("exit 2", 5)
            .review(Path::new("keys.txt"))
            .unwrap_err();
        assert_eq!(err.stage(), "collaborator");
    }
}
