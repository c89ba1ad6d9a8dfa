mod json;
mod text;

pub use json::JsonReporter;
pub use text::TextReporter;

use crate::finder::Report;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{}' (expected text or json)", other)),
        }
    }
}

/// Reporter for outputting finder results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    color: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            color: false,
        }
    }

    /// Bold section headers in text output
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Write the report to the output file, or stdout when none is set
    pub fn report(&self, report: &Report) -> Result<()> {
        match &self.output_path {
            Some(path) => {
                let mut file = std::fs::File::create(path)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to create {}", path.display()))?;
                self.write(report, &mut file)?;
                info!("Report written to: {}", path.display());
            }
            None => {
                let stdout = std::io::stdout();
                self.write(report, &mut stdout.lock())?;
            }
        }
        Ok(())
    }

    /// Render into any writer
    pub fn write(&self, report: &Report, out: &mut dyn Write) -> Result<()> {
        let written = match self.format {
            ReportFormat::Text => TextReporter::new(self.color).write(report, out),
            ReportFormat::Json => JsonReporter::new().write(report, out),
        };
        written.into_diagnostic()
    }
}
