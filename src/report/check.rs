// Check-run payload built from the final summary

use serde::Serialize;

use crate::state::{Annotation, AnnotationLevel, TestSummary};

/// Overall outcome shown by the review UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Conclusion {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutput {
    pub title: String,
    pub summary: String,
    pub annotations: Vec<Annotation>,
}

/// Everything a reporting sink needs to publish one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckRun {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_sha: Option<String>,
    pub status: &'static str,
    pub conclusion: Conclusion,
    pub output: CheckOutput,
}

impl CheckRun {
    /// Build the run, prepending one annotation that carries the summary line
    pub fn from_summary(summary: TestSummary, name: &str, head_sha: Option<String>) -> Self {
        let failed = summary.is_failed_or_errored();
        let message = summary.to_formatted_message();

        let level = if failed {
            AnnotationLevel::Failure
        } else {
            AnnotationLevel::Notice
        };
        let mut annotations = vec![Annotation::summary(level, message.clone())];
        annotations.extend(summary.into_annotations());

        Self {
            name: name.to_string(),
            head_sha,
            status: "completed",
            conclusion: if failed {
                Conclusion::Failure
            } else {
                Conclusion::Success
            },
            output: CheckOutput {
                title: name.to_string(),
                summary: message,
                annotations,
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        self.conclusion == Conclusion::Failure
    }
}
