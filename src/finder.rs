//! Cross-checks declared CSS variables against the tokens used in a codebase.
//!
//! Every input file must declare a CSS prefix. Each distinct prefix gets its
//! own search and its own [`PrefixResult`], so usage found under one prefix
//! never hides or replaces usage found under another.

use crate::model::{search_prefix, Contexts, ModelError, StyleModel};
use crate::search::{grep_argv, SearchError, SearchRunner, DEFAULT_GLOBS};
use miette::Diagnostic;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Suffix of the generated `r, g, b` companion of every color variable
pub const RGB_SUFFIX: &str = "-rgb";

/// Finder errors
#[derive(Error, Debug, Diagnostic)]
pub enum FinderError {
    #[error("{file} has no CSS prefix; this tool only works on files with a CSS prefix")]
    #[diagnostic(
        code(cssvarcheck::missing_prefix),
        help("declare `options.CSS.prefix` in {file}")
    )]
    MissingCssPrefix { file: String },

    #[error(transparent)]
    #[diagnostic(code(cssvarcheck::model))]
    Model(#[from] ModelError),

    #[error(transparent)]
    #[diagnostic(code(cssvarcheck::search))]
    Search(#[from] SearchError),

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    #[diagnostic(code(cssvarcheck::config))]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Findings for one CSS prefix
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefixResult {
    /// Used in the codebase but declared by no input file
    pub unspecified: BTreeSet<String>,
    /// Declared with this prefix but never used
    pub unused: BTreeSet<String>,
    /// The `--<prefix>-` string that scoped the search
    pub css_prefix: String,
}

impl PrefixResult {
    pub fn is_clean(&self) -> bool {
        self.unspecified.is_empty() && self.unused.is_empty()
    }
}

/// A [`PrefixResult`] with the input files that declared its prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixReport {
    pub result: PrefixResult,
    /// Declaring files, in input order
    pub files: Vec<String>,
}

/// Findings for every distinct prefix, ordered by prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    prefixes: Vec<PrefixReport>,
}

impl Report {
    pub fn iter(&self) -> impl Iterator<Item = &PrefixReport> {
        self.prefixes.iter()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Result for `css_prefix` (in `--<prefix>-` form)
    pub fn get(&self, css_prefix: &str) -> Option<&PrefixResult> {
        self.prefixes
            .iter()
            .find(|p| p.result.css_prefix == css_prefix)
            .map(|p| &p.result)
    }

    /// Result of the last prefix, for callers expecting a single result
    pub fn last(&self) -> Option<&PrefixResult> {
        self.prefixes.last().map(|p| &p.result)
    }

    /// True when no prefix has any finding
    pub fn is_clean(&self) -> bool {
        self.prefixes.iter().all(|p| p.result.is_clean())
    }

    pub fn total_findings(&self) -> usize {
        self.prefixes
            .iter()
            .map(|p| p.result.unspecified.len() + p.result.unused.len())
            .sum()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a PrefixReport;
    type IntoIter = std::slice::Iter<'a, PrefixReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.prefixes.iter()
    }
}

/// Invalid-variable finder
pub struct Finder {
    globs: Vec<String>,
    ignore: Vec<Regex>,
}

impl Finder {
    pub fn new() -> Self {
        Self {
            globs: DEFAULT_GLOBS.iter().map(|g| g.to_string()).collect(),
            ignore: Vec::new(),
        }
    }

    /// Search these file globs instead of the defaults
    pub fn with_globs(mut self, globs: Vec<String>) -> Self {
        if !globs.is_empty() {
            self.globs = globs;
        }
        self
    }

    /// Never report names matching any of these regexes
    pub fn with_ignore_patterns<S: AsRef<str>>(
        mut self,
        patterns: &[S],
    ) -> Result<Self, FinderError> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex =
                Regex::new(pattern).map_err(|source| FinderError::InvalidIgnorePattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
            self.ignore.push(regex);
        }
        Ok(self)
    }

    /// Load every definition file, then search once per distinct prefix
    ///
    /// A path given more than once is loaded once, with its last text, at
    /// the position it first appeared. Fails before any search runs if a
    /// file does not parse, redeclares a variable, or lacks a CSS prefix.
    pub fn find<I, P, T, S>(&self, file_contents: I, search: &S) -> Result<Report, FinderError>
    where
        I: IntoIterator<Item = (P, T)>,
        P: AsRef<str>,
        T: AsRef<str>,
        S: SearchRunner + ?Sized,
    {
        let mut inputs: Vec<(String, String)> = Vec::new();
        for (path, text) in file_contents {
            let (path, text) = (path.as_ref(), text.as_ref());
            match inputs.iter_mut().find(|entry| entry.0 == path) {
                Some(entry) => {
                    debug!("{} given more than once, loading it once", path);
                    entry.1 = text.to_string();
                }
                None => inputs.push((path.to_string(), text.to_string())),
            }
        }

        let mut model = StyleModel::new();
        let mut prefix_files: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (path, text) in &inputs {
            model.add_json5(text, path)?;

            let prefix = model
                .contexts_for(path)
                .and_then(Contexts::css_prefix)
                .ok_or_else(|| FinderError::MissingCssPrefix {
                    file: path.to_string(),
                })?;

            prefix_files
                .entry(search_prefix(prefix))
                .or_default()
                .push(path.clone());
        }

        for unresolved in model.unresolved_references() {
            warn!(
                "{}: {} '{}' refers to undeclared variable '{}'",
                unresolved.origin, unresolved.from_kind, unresolved.from, unresolved.target
            );
        }

        let valid_names = model.all_variable_names();
        let mut declared_by_prefix = model.variable_names_by_prefix();
        debug!("Model declares {} CSS variables", valid_names.len());

        let all_prefixes: Vec<String> = prefix_files.keys().cloned().collect();
        let mut prefixes = Vec::with_capacity(prefix_files.len());
        for (css_prefix, files) in prefix_files {
            info!("Searching for {}* in {}", css_prefix, self.globs.join(" "));
            let raw = search.run(&grep_argv(&css_prefix, &self.globs))?;
            let found = collect_usages(&css_prefix, &raw);
            debug!("Found {} distinct {}* tokens", found.len(), css_prefix);

            // Undeclared tokens under a longer prefix are reported there only
            let nested: Vec<&String> = all_prefixes
                .iter()
                .filter(|other| other.len() > css_prefix.len() && other.starts_with(&css_prefix))
                .collect();
            let unspecified = found
                .difference(&valid_names)
                .filter(|name| !nested.iter().any(|other| name.starts_with(other.as_str())));

            let declared = declared_by_prefix.remove(&css_prefix).unwrap_or_default();
            let result = PrefixResult {
                unspecified: self.reportable(unspecified),
                unused: self.reportable(declared.difference(&found)),
                css_prefix,
            };
            prefixes.push(PrefixReport { result, files });
        }

        Ok(Report { prefixes })
    }

    fn reportable<'a>(&self, names: impl Iterator<Item = &'a String>) -> BTreeSet<String> {
        names
            .filter(|name| !self.ignore.iter().any(|re| re.is_match(name)))
            .cloned()
            .collect()
    }
}

impl Default for Finder {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the finder with default globs and no ignore patterns
pub fn find_invalid_variables<I, P, T, S>(
    file_contents: I,
    search: &S,
) -> Result<Report, FinderError>
where
    I: IntoIterator<Item = (P, T)>,
    P: AsRef<str>,
    T: AsRef<str>,
    S: SearchRunner + ?Sized,
{
    Finder::new().find(file_contents, search)
}

/// Fold a `-rgb` companion token into the variable it was generated from
pub fn normalize_token(token: &str) -> &str {
    token.strip_suffix(RGB_SUFFIX).unwrap_or(token)
}

/// Distinct normalized tokens in raw search output
fn collect_usages(css_prefix: &str, raw: &[u8]) -> BTreeSet<String> {
    String::from_utf8_lossy(raw)
        .lines()
        .map(str::trim)
        .filter(|line| is_token(css_prefix, line))
        .map(|token| normalize_token(token).to_string())
        .collect()
}

fn is_token(css_prefix: &str, line: &str) -> bool {
    line.strip_prefix(css_prefix).is_some_and(|rest| {
        rest.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    })
}
