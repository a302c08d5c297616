// Run command - aggregate reports and publish the check run

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::cli::OutputFormat;
use crate::cli::args::RunArgs;
use crate::config::{self, Config};
use crate::junit;
use crate::locate::{Locate, SourceLocator};
use crate::report::{CheckRun, ConsoleReporter, GithubReporter, JsonReporter, Reporter};
use crate::state::{IngestOptions, TestSummary};
use crate::utils::FileUtils;

/// Effective settings after merging arguments, configuration and environment
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub report_paths: Vec<String>,
    pub root: PathBuf,
    pub ingest: IngestOptions,
    pub name: String,
    pub head_sha: Option<String>,
    pub fail_on_failure: bool,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

impl RunSettings {
    /// Command-line arguments win over the configuration file, which wins over the environment
    pub fn resolve(args: &RunArgs, config: &Config) -> Result<Self> {
        let patterns = args.patterns();
        let report_paths = if patterns.is_empty() {
            config.reports.paths.clone()
        } else {
            patterns
        };

        let format = match args.format {
            Some(format) => format,
            None => config
                .output
                .format
                .parse()
                .context("Invalid output.format in configuration")?,
        };

        Ok(Self {
            report_paths,
            root: args
                .root
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.source.root)),
            ingest: IngestOptions {
                max_annotations: args
                    .max_annotations
                    .unwrap_or(config.reports.max_annotations),
                annotate_errors: args.annotate_errors || config.reports.annotate_errors,
            },
            name: args
                .name
                .clone()
                .unwrap_or_else(|| config.check.name.clone()),
            head_sha: args
                .commit
                .clone()
                .or_else(|| std::env::var(config::ENV_GITHUB_SHA).ok()),
            fail_on_failure: args.fail_on_failure || config.check.fail_on_failure,
            format,
            output: args
                .output
                .clone()
                .or_else(|| config.output.file.as_ref().map(PathBuf::from)),
        })
    }
}

/// Aggregate, publish, and report whether the process should exit successfully.
///
/// Returns `Ok(false)` only when `fail_on_failure` is set and the run failed.
pub async fn run_reports(args: &RunArgs, config: &Config) -> Result<bool> {
    let settings = RunSettings::resolve(args, config)?;
    let summary = collect_summary(&settings).await?;

    info!("{}", summary.to_formatted_message());
    let check = CheckRun::from_summary(summary, &settings.name, settings.head_sha.clone());

    let reporter = reporter_for(settings.format, settings.output.clone());
    reporter.publish(&check)?;

    Ok(!(settings.fail_on_failure && check.is_failure()))
}

pub fn reporter_for(format: OutputFormat, output: Option<PathBuf>) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleReporter::new()),
        OutputFormat::Github => Box::new(GithubReporter::new()),
        OutputFormat::Json => Box::new(JsonReporter::new(output)),
    }
}

/// Discover report files in pattern order
pub async fn discover_reports(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let patterns = patterns.to_vec();
    tokio::task::spawn_blocking(move || FileUtils::collect_report_files(&patterns))
        .await
        .context("Report discovery task failed")?
}

/// Aggregate every report matched by the settings, in discovery order
pub async fn collect_summary(settings: &RunSettings) -> Result<TestSummary> {
    let files = discover_reports(&settings.report_paths).await?;
    if files.is_empty() {
        warn!("No report files found");
    } else {
        info!("Found {} report file(s)", files.len());
    }

    let locator = SourceLocator::new(&settings.root);
    let mut summary = TestSummary::new();
    for file in &files {
        ingest_report(&mut summary, file, &settings.ingest, &locator).await?;
    }
    Ok(summary)
}

/// Read one report and fold all of its suites into the summary
pub async fn ingest_report<L: Locate>(
    summary: &mut TestSummary,
    file: &Path,
    options: &IngestOptions,
    locator: &L,
) -> Result<()> {
    let suites = read_report(file).await?;
    debug!("{}: {} suite(s)", file.display(), suites.len());

    for suite in &suites {
        summary.ingest(suite, file, options, locator).await?;
    }
    Ok(())
}

pub async fn read_report(file: &Path) -> Result<Vec<junit::TestSuite>> {
    let xml = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read JUnit report: {}", file.display()))?;
    junit::read_suites(&xml)
        .with_context(|| format!("Failed to parse JUnit report: {}", file.display()))
}
