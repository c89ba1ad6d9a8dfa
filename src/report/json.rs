use crate::finder::{PrefixResult, Report};
use serde::Serialize;
use std::io::{self, Write};

/// JSON reporter for programmatic output
#[derive(Default)]
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, report: &Report, out: &mut dyn Write) -> io::Result<()> {
        let entries: Vec<JsonPrefix> = report
            .iter()
            .map(|prefix| JsonPrefix {
                result: &prefix.result,
                files: &prefix.files,
            })
            .collect();

        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)
    }
}

#[derive(Serialize)]
struct JsonPrefix<'a> {
    #[serde(flatten)]
    result: &'a PrefixResult,
    files: &'a [String],
}
