// List command - show discovered reports and their counts

use anyhow::Result;
use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::config::Config;
use crate::state::TestSummary;

use super::run::{discover_reports, read_report};

#[derive(Debug, Serialize)]
pub struct ReportListing {
    pub file: String,
    pub suites: usize,
    pub tests: u64,
    pub failures: u64,
    pub errors: u64,
    pub skipped: u64,
    pub time: f64,
}

pub async fn handle_list(args: &ListArgs, config: &Config) -> Result<()> {
    let patterns = if args.report_paths.is_empty() {
        &config.reports.paths
    } else {
        &args.report_paths
    };

    let mut listings = Vec::new();
    for file in discover_reports(patterns).await? {
        let suites = read_report(&file).await?;
        let mut totals = TestSummary::new();
        for suite in &suites {
            totals.add_counts(suite);
        }
        listings.push(ReportListing {
            file: file.display().to_string(),
            suites: suites.len(),
            tests: totals.num_tests,
            failures: totals.num_failed,
            errors: totals.num_errored,
            skipped: totals.num_skipped,
            time: totals.test_duration,
        });
    }

    if args.is_json() {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    if listings.is_empty() {
        println!("No report files found");
    }
    for listing in &listings {
        println!(
            "{}: {} suite(s), {} tests, {} failed, {} errored, {} skipped",
            listing.file,
            listing.suites,
            listing.tests,
            listing.failures,
            listing.errors,
            listing.skipped
        );
    }
    Ok(())
}
