use super::{SearchError, SearchRunner};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Runs `git <argv>` from a repository directory
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: String,
    root: PathBuf,
}

impl GitRunner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            program: "git".to_string(),
            root: root.into(),
        }
    }

    /// Use a different executable than `git` on PATH
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl SearchRunner for GitRunner {
    fn run(&self, argv: &[String]) -> Result<Vec<u8>, SearchError> {
        debug!("Running {} {:?} in {}", self.program, argv, self.root.display());

        let output = Command::new(&self.program)
            .args(argv)
            .current_dir(&self.root)
            .output()
            .map_err(|source| SearchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(output.stdout);
        }

        // git grep exits 1 with no stderr when nothing matched
        if output.status.code() == Some(1) && output.stderr.is_empty() {
            return Ok(Vec::new());
        }

        Err(SearchError::Failed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        })
    }
}
