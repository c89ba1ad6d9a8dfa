use crate::finder::{PrefixReport, Report};
use colored::Colorize;
use std::io::{self, Write};

/// Plain-text reporter: two sorted sections per prefix
pub struct TextReporter {
    color: bool,
}

impl TextReporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn write(&self, report: &Report, out: &mut dyn Write) -> io::Result<()> {
        for (i, prefix) in report.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            self.write_prefix(prefix, out)?;
        }
        Ok(())
    }

    fn write_prefix(&self, prefix: &PrefixReport, out: &mut dyn Write) -> io::Result<()> {
        let files = prefix.files.join(", ");

        self.header(
            &format!("Has prefix {} but not in {}:", prefix.result.css_prefix, files),
            out,
        )?;
        // BTreeSet iteration is already sorted
        for name in &prefix.result.unspecified {
            writeln!(out, "{}", name)?;
        }

        writeln!(out)?;
        self.header(
            &format!("Generated by {} but not used in codebase:", files),
            out,
        )?;
        for name in &prefix.result.unused {
            writeln!(out, "{}", name)?;
        }
        Ok(())
    }

    fn header(&self, text: &str, out: &mut dyn Write) -> io::Result<()> {
        if self.color {
            writeln!(out, "{}", text.bold())
        } else {
            writeln!(out, "{}", text)
        }
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new(false)
    }
}
