// Check-run annotations

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::locate::Location;

/// Path used for the annotation that carries the whole-run summary
pub const SUMMARY_PATH: &str = "test";

/// Severity of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationLevel {
    Notice,
    Warning,
    Failure,
}

impl AnnotationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationLevel::Notice => "notice",
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Failure => "failure",
        }
    }
}

impl fmt::Display for AnnotationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message attached to a file (and optionally a line) in a review UI.
///
/// Field names follow the check-run annotation object so the value can be
/// serialized as-is. Line 0 means the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub annotation_level: AnnotationLevel,
    pub message: String,
}

impl Annotation {
    /// Failure annotation on a single resolved line
    pub fn failure(location: Location, message: impl Into<String>) -> Self {
        Self {
            path: location.file_path,
            start_line: location.line,
            end_line: location.line,
            start_column: 0,
            end_column: 0,
            annotation_level: AnnotationLevel::Failure,
            message: message.into(),
        }
    }

    /// Annotation covering the whole run
    pub fn summary(level: AnnotationLevel, message: impl Into<String>) -> Self {
        Self {
            path: SUMMARY_PATH.to_string(),
            start_line: 0,
            end_line: 0,
            start_column: 0,
            end_column: 0,
            annotation_level: level,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_serializes_as_check_run_object() {
        let annotation = Annotation::failure(
            Location {
                file_path: "src/A.java".to_string(),
                line: 7,
            },
            "Junit test t failed boom",
        );

        let json = serde_json::to_value(&annotation).unwrap();
        assert_eq!(json["path"], "src/A.java");
        assert_eq!(json["start_line"], 7);
        assert_eq!(json["end_line"], 7);
        assert_eq!(json["start_column"], 0);
        assert_eq!(json["annotation_level"], "failure");
    }
}
