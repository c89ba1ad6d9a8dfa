//! Style model built from one or more model definition files.
//!
//! The model is an explicit builder: construct one per run, feed it every
//! definition file with [`StyleModel::add_json5`], then query it. Each
//! variable remembers the file that declared it so its CSS name can be
//! derived from that file's prefix.

mod definition;

pub use definition::{ColorValue, DefinitionFile};

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading definition files into the model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: json5::Error,
    },
    #[error("Variable '{name}' is declared in both {first} and {second}")]
    DuplicateVariable {
        name: String,
        first: String,
        second: String,
    },
}

/// Kind of style variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Color,
    Opacity,
}

impl VariableKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            VariableKind::Color => "color",
            VariableKind::Opacity => "opacity",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A declared style variable
#[derive(Debug, Clone)]
pub struct Variable {
    /// Name as written in the definition file (e.g. "google_grey_900")
    pub name: String,
    pub kind: VariableKind,
    /// Definition file that declared the variable
    pub origin: String,
    /// Names of other variables this one refers to via `$name`
    pub references: Vec<String>,
}

/// Output-target contexts declared in a file's `options` block
#[derive(Debug, Clone, Default)]
pub struct Contexts {
    targets: BTreeMap<String, Value>,
}

impl Contexts {
    /// The `CSS` context, if the file declares one as an object
    pub fn css(&self) -> Option<&Map<String, Value>> {
        self.targets.get("CSS")?.as_object()
    }

    /// The CSS prefix, if declared and non-empty
    pub fn css_prefix(&self) -> Option<&str> {
        self.css()?
            .get("prefix")?
            .as_str()
            .filter(|prefix| !prefix.is_empty())
    }
}

/// A `$name` reference that does not resolve to any declared variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// Variable whose value holds the reference
    pub from: String,
    pub from_kind: VariableKind,
    /// The missing target
    pub target: String,
    pub origin: String,
}

/// Accumulates variables and contexts across definition files
#[derive(Debug, Default)]
pub struct StyleModel {
    variables: BTreeMap<String, Variable>,
    contexts: HashMap<String, Contexts>,
}

impl StyleModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and add its contexts and variables, tagged with `origin`
    pub fn add_json5(&mut self, text: &str, origin: &str) -> Result<(), ModelError> {
        let file: DefinitionFile = json5::from_str(text).map_err(|source| ModelError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        self.add_definition(file, origin)
    }

    /// Add an already-parsed definition file
    pub fn add_definition(&mut self, file: DefinitionFile, origin: &str) -> Result<(), ModelError> {
        debug!(
            "Adding {} colors and {} opacities from {}",
            file.colors.len(),
            file.opacities.len(),
            origin
        );

        self.contexts
            .entry(origin.to_string())
            .or_default()
            .targets
            .extend(file.options);

        for (name, value) in file.colors {
            let references = value
                .expressions()
                .into_iter()
                .flat_map(extract_references)
                .collect();
            self.insert(name, VariableKind::Color, origin, references)?;
        }

        for (name, value) in file.opacities {
            let references = value.as_str().map(extract_references).unwrap_or_default();
            self.insert(name, VariableKind::Opacity, origin, references)?;
        }

        Ok(())
    }

    fn insert(
        &mut self,
        name: String,
        kind: VariableKind,
        origin: &str,
        references: Vec<String>,
    ) -> Result<(), ModelError> {
        if let Some(existing) = self.variables.get(&name) {
            return Err(ModelError::DuplicateVariable {
                name,
                first: existing.origin.clone(),
                second: origin.to_string(),
            });
        }

        let variable = Variable {
            name: name.clone(),
            kind,
            origin: origin.to_string(),
            references,
        };
        self.variables.insert(name, variable);
        Ok(())
    }

    /// Contexts declared by `origin`, if that file was added
    pub fn contexts_for(&self, origin: &str) -> Option<&Contexts> {
        self.contexts.get(origin)
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// CSS name of `variable`, or `None` when its file has no CSS prefix
    pub fn css_var_name(&self, variable: &Variable) -> Option<String> {
        let prefix = self.contexts_for(&variable.origin)?.css_prefix()?;
        Some(css_var_name(prefix, &variable.name))
    }

    /// Every generated CSS variable name, excluding `-rgb` variants
    pub fn all_variable_names(&self) -> BTreeSet<String> {
        self.variables()
            .filter_map(|variable| self.css_var_name(variable))
            .collect()
    }

    /// CSS names grouped by the `--<prefix>-` string they were generated with
    pub fn variable_names_by_prefix(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for variable in self.variables() {
            let Some(prefix) = self
                .contexts_for(&variable.origin)
                .and_then(Contexts::css_prefix)
            else {
                continue;
            };
            grouped
                .entry(search_prefix(prefix))
                .or_default()
                .insert(css_var_name(prefix, &variable.name));
        }
        grouped
    }

    /// References to variables no loaded file declares
    pub fn unresolved_references(&self) -> Vec<UnresolvedReference> {
        self.variables()
            .flat_map(|variable| {
                variable
                    .references
                    .iter()
                    .filter(|target| !self.variables.contains_key(*target))
                    .map(|target| UnresolvedReference {
                        from: variable.name.clone(),
                        from_kind: variable.kind,
                        target: target.clone(),
                        origin: variable.origin.clone(),
                    })
            })
            .collect()
    }
}

/// `--<prefix>-<name>` with underscores in `name` turned into dashes
pub fn css_var_name(prefix: &str, name: &str) -> String {
    format!("--{}-{}", prefix, name.replace('_', "-"))
}

/// The `--<prefix>-` string every name generated with `prefix` starts with
pub fn search_prefix(prefix: &str) -> String {
    format!("--{}-", prefix)
}

fn extract_references(expr: &str) -> Vec<String> {
    static REFERENCE: OnceLock<regex::Regex> = OnceLock::new();
    let pattern = REFERENCE
        .get_or_init(|| regex::Regex::new(r"\$([A-Za-z0-9_]+)").expect("valid reference pattern"));

    pattern
        .captures_iter(expr)
        .map(|cap| cap[1].to_string())
        .collect()
}
