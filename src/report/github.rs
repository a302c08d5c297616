// GitHub reporter - workflow commands understood by the Actions runner

use super::Reporter;
use super::check::CheckRun;
use crate::state::{Annotation, AnnotationLevel, annotation::SUMMARY_PATH};
use anyhow::Result;

/// Emits `::error file=...,line=...::message` lines on stdout
pub struct GithubReporter;

impl GithubReporter {
    pub fn new() -> Self {
        Self
    }

    /// Render every annotation of the run as one workflow command per line
    pub fn render(check: &CheckRun) -> String {
        let mut out = String::new();
        for annotation in &check.output.annotations {
            out.push_str(&Self::command(annotation, &check.name));
            out.push('\n');
        }
        out
    }

    fn command(annotation: &Annotation, title: &str) -> String {
        let name = match annotation.annotation_level {
            AnnotationLevel::Failure => "error",
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Notice => "notice",
        };

        let mut properties = Vec::new();
        if annotation.path != SUMMARY_PATH {
            properties.push(format!("file={}", escape_property(&annotation.path)));
            if annotation.start_line > 0 {
                properties.push(format!("line={}", annotation.start_line));
                properties.push(format!("endLine={}", annotation.end_line));
            }
        }
        properties.push(format!("title={}", escape_property(title)));

        format!(
            "::{} {}::{}",
            name,
            properties.join(","),
            escape_data(&annotation.message)
        )
    }
}

impl Default for GithubReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for GithubReporter {
    fn publish(&self, check: &CheckRun) -> Result<()> {
        print!("{}", Self::render(check));
        Ok(())
    }
}

/// Escape a command message
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a command property value
pub fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
