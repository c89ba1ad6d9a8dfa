//! cssvarcheck - find invalid CSS variables against JSON5 style definitions
//!
//! Cross-checks the variables declared by style-variable definition files
//! against the `--<prefix>-*` tokens actually used in a codebase's CSS, HTML
//! and JS files.
//!
//! # Pipeline
//!
//! 1. **Model** - Load every definition file into one [`StyleModel`]
//! 2. **Prefixes** - Require a CSS prefix from each file
//! 3. **Search** - Run `git grep` once per distinct prefix
//! 4. **Diff** - Report used-but-undeclared and declared-but-unused names
//! 5. **Reporting** - Print text or JSON

pub mod config;
pub mod finder;
pub mod model;
pub mod report;
pub mod search;

pub use config::Config;
pub use finder::{find_invalid_variables, Finder, FinderError, PrefixReport, PrefixResult, Report};
pub use model::{Contexts, ModelError, StyleModel};
pub use report::{ReportFormat, Reporter};
pub use search::{GitRunner, SearchError, SearchRunner};
