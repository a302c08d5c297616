// JSON reporter - writes the check-run payload

use super::Reporter;
use super::check::CheckRun;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;

/// JSON reporter, to a file or stdout
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    /// Create new JSON reporter
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }
}

impl Reporter for JsonReporter {
    fn publish(&self, check: &CheckRun) -> Result<()> {
        let Some(path) = &self.output_path else {
            println!("{}", serde_json::to_string_pretty(check)?);
            return Ok(());
        };

        let file = File::create(path)
            .with_context(|| format!("Failed to create JSON report file: {}", path.display()))?;

        serde_json::to_writer_pretty(file, check)
            .context("Failed to serialize check run to JSON")?;

        Ok(())
    }
}
