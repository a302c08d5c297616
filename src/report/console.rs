// Console reporter - human readable summary

use super::Reporter;
use super::check::CheckRun;
use crate::state::{AnnotationLevel, annotation::SUMMARY_PATH};
use anyhow::Result;
use console::style;

/// Console reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn publish(&self, check: &CheckRun) -> Result<()> {
        println!();
        println!(
            "════════════════════════════════════════════════════════════════════════════════"
        );
        if check.is_failure() {
            println!("{} {}", style("❌ FAILED").red().bold(), check.name);
        } else {
            println!("{} {}", style("✅ PASSED").green().bold(), check.name);
        }
        println!("   {}", check.output.summary);

        let failures: Vec<_> = check
            .output
            .annotations
            .iter()
            .filter(|a| a.path != SUMMARY_PATH)
            .collect();
        if failures.is_empty() {
            return Ok(());
        }

        println!(
            "────────────────────────────────────────────────────────────────────────────────"
        );
        for annotation in failures {
            let location = if annotation.start_line > 0 {
                format!("{}:{}", annotation.path, annotation.start_line)
            } else {
                annotation.path.clone()
            };
            let marker = match annotation.annotation_level {
                AnnotationLevel::Failure => style("✗").red(),
                AnnotationLevel::Warning => style("!").yellow(),
                AnnotationLevel::Notice => style("i").cyan(),
            };
            println!("  {} {}", marker, style(location).bold());
            println!("      {}", annotation.message);
        }

        Ok(())
    }
}
