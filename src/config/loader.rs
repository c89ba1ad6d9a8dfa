use crate::search::DEFAULT_GLOBS;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Configuration for a cssvarcheck run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Regexes of variable names never reported
    pub ignore: Vec<String>,

    /// Search configuration
    pub search: SearchConfig,

    /// Report configuration
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Executable that understands `grep -ho <pattern> -- <globs>`
    pub program: String,

    /// File globs to search
    pub globs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: text, json
    pub format: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            globs: DEFAULT_GLOBS.iter().map(|g| g.to_string()).collect(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try TOML first, then YAML
                if let Ok(config) = toml::from_str(&contents) {
                    Ok(config)
                } else {
                    serde_yaml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations under `root`
    pub fn from_default_locations(root: &Path) -> Result<Self> {
        let default_names = [
            ".cssvarcheck.toml",
            ".cssvarcheck.yml",
            ".cssvarcheck.yaml",
            "cssvarcheck.toml",
        ];

        for name in &default_names {
            let path = root.join(name);
            if path.exists() {
                debug!("Using config file {}", path.display());
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }
}
