//! Codebase search backends.
//!
//! The finder never spawns processes itself; it hands an argument vector to
//! a [`SearchRunner`] and reads back the raw matched lines. [`GitRunner`] is
//! the production backend, tests pass closures.

mod git;

pub use git::GitRunner;

use std::process::ExitStatus;
use thiserror::Error;

/// File globs searched when no configuration overrides them
pub const DEFAULT_GLOBS: &[&str] = &["*.css", "*.html", "*.js"];

/// Search errors
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Search command exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Runs a search command and returns its raw standard output
pub trait SearchRunner {
    fn run(&self, argv: &[String]) -> Result<Vec<u8>, SearchError>;
}

impl<F> SearchRunner for F
where
    F: Fn(&[String]) -> Result<Vec<u8>, SearchError>,
{
    fn run(&self, argv: &[String]) -> Result<Vec<u8>, SearchError> {
        self(argv)
    }
}

/// Build the `grep` argv that lists every token starting with `css_prefix`
///
/// The leading backslash keeps a pattern beginning with `--` from being
/// read as an option.
pub fn grep_argv<S: AsRef<str>>(css_prefix: &str, globs: &[S]) -> Vec<String> {
    let mut argv = vec![
        "grep".to_string(),
        "-ho".to_string(),
        format!("\\{}[a-z0-9-]*", css_prefix),
        "--".to_string(),
    ];
    argv.extend(globs.iter().map(|glob| glob.as_ref().to_string()));
    argv
}
