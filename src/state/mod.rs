// State module - running totals and annotations for one invocation

pub mod annotation;

pub use annotation::{Annotation, AnnotationLevel};

use anyhow::Result;
use futures::future::try_join_all;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::junit::{TestCase, TestSuite};
use crate::locate::Locate;

/// How failing test cases turn into annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Upper bound on annotations over the whole run
    pub max_annotations: usize,
    /// Also annotate test cases that only carry an `<error>`
    pub annotate_errors: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_annotations: crate::config::default_max_annotations(),
            annotate_errors: false,
        }
    }
}

/// Aggregate over every suite ingested so far
#[derive(Debug, Clone, Default, Serialize)]
pub struct TestSummary {
    pub num_tests: u64,
    pub num_skipped: u64,
    pub num_failed: u64,
    pub num_errored: u64,
    /// Seconds, summed from the suites' own `time`
    pub test_duration: f64,
    annotations: Vec<Annotation>,
}

impl TestSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a suite's declared counts without touching annotations
    pub fn add_counts(&mut self, suite: &TestSuite) {
        self.num_tests += suite.tests;
        self.num_skipped += suite.skipped;
        self.num_failed += suite.failures;
        self.num_errored += suite.errors;
        self.test_duration += suite.time;
    }

    /// Account for one suite and annotate its failing cases while room is left.
    ///
    /// Cases are taken in declaration order up to the remaining capacity, so
    /// the cut-off point is the same whatever order the lookups finish in.
    pub async fn ingest<L: Locate>(
        &mut self,
        suite: &TestSuite,
        report: &Path,
        options: &IngestOptions,
        locator: &L,
    ) -> Result<()> {
        self.add_counts(suite);

        let remaining = options
            .max_annotations
            .saturating_sub(self.annotations.len());
        let pending: Vec<(&TestCase, String)> = suite
            .cases
            .iter()
            .filter_map(|case| annotation_message(case, options.annotate_errors).map(|m| (case, m)))
            .take(remaining)
            .collect();

        if pending.is_empty() {
            return Ok(());
        }
        debug!(
            "Locating {} failing test(s) from suite '{}'",
            pending.len(),
            suite.name
        );

        let locations =
            try_join_all(pending.iter().map(|(case, _)| locator.locate(report, case))).await?;
        for ((_, message), location) in pending.into_iter().zip(locations) {
            self.annotations.push(Annotation::failure(location, message));
        }
        Ok(())
    }

    pub fn is_failed_or_errored(&self) -> bool {
        self.num_failed > 0 || self.num_errored > 0
    }

    /// One-line summary of the whole run
    pub fn to_formatted_message(&self) -> String {
        format!(
            "Junit Results ran {} in {} seconds {} Errored, {} Failed, {} Skipped",
            self.num_tests, self.test_duration, self.num_errored, self.num_failed, self.num_skipped
        )
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn into_annotations(self) -> Vec<Annotation> {
        self.annotations
    }
}

fn annotation_message(case: &TestCase, annotate_errors: bool) -> Option<String> {
    if let Some(failure) = &case.failure {
        return Some(format!("Junit test {} failed {}", case.name, failure.summary()));
    }
    match &case.error {
        Some(error) if annotate_errors => Some(format!(
            "Junit test {} errored {}",
            case.name,
            error.summary()
        )),
        _ => None,
    }
}
