// Tests for the check-run payload and its reporters - public API only

use junit_annotate::junit::{Failure, TestCase, TestSuite};
use junit_annotate::locate::{Locate, Location};
use junit_annotate::report::{CheckRun, Conclusion, GithubReporter, JsonReporter, Reporter};
use junit_annotate::state::{Annotation, AnnotationLevel, IngestOptions, TestSummary};
use std::path::Path;

struct FixedLocator;

impl Locate for FixedLocator {
    async fn locate(&self, _report: &Path, _case: &TestCase) -> anyhow::Result<Location> {
        Ok(Location {
            file_path: "src/test/java/org/dummy/ClassTest.java".to_string(),
            line: 12,
        })
    }
}

async fn failed_summary() -> TestSummary {
    let suite = TestSuite {
        tests: 2,
        failures: 1,
        time: 1.5,
        cases: vec![
            TestCase::new("passes", "org.dummy.ClassTest"),
            TestCase::new("methodTest", "org.dummy.ClassTest").with_failure(Failure {
                message: Some("expected: <1>, but: <2>".to_string()),
                ..Failure::default()
            }),
        ],
        ..TestSuite::new("org.dummy.ClassTest")
    };

    let mut summary = TestSummary::new();
    summary
        .ingest(
            &suite,
            Path::new("target/TEST-org.dummy.ClassTest.xml"),
            &IngestOptions::default(),
            &FixedLocator,
        )
        .await
        .expect("Failed to ingest suite");
    summary
}

#[tokio::test]
async fn test_check_run_prepends_summary_annotation() {
    // Arrange
    let summary = failed_summary().await;

    // Act
    let check = CheckRun::from_summary(summary, "Unit tests", Some("abc123".to_string()));

    // Assert
    assert_eq!(check.conclusion, Conclusion::Failure);
    assert_eq!(check.status, "completed");
    assert_eq!(check.output.title, "Unit tests");
    assert_eq!(
        check.output.summary,
        "Junit Results ran 2 in 1.5 seconds 0 Errored, 1 Failed, 0 Skipped"
    );
    assert_eq!(check.output.annotations.len(), 2);

    let head = &check.output.annotations[0];
    assert_eq!(head.path, "test");
    assert_eq!(head.start_line, 0);
    assert_eq!(head.annotation_level, AnnotationLevel::Failure);
    assert_eq!(head.message, check.output.summary);

    let failure = &check.output.annotations[1];
    assert_eq!(failure.path, "src/test/java/org/dummy/ClassTest.java");
    assert_eq!(failure.start_line, 12);
}

#[test]
fn test_passing_run_is_a_notice() {
    // Arrange
    let mut summary = TestSummary::new();
    summary.add_counts(&TestSuite {
        tests: 3,
        skipped: 1,
        ..TestSuite::new("s")
    });

    // Act
    let check = CheckRun::from_summary(summary, "Unit tests", None);

    // Assert
    assert_eq!(check.conclusion, Conclusion::Success);
    assert_eq!(check.output.annotations.len(), 1);
    assert_eq!(
        check.output.annotations[0].annotation_level,
        AnnotationLevel::Notice
    );
}

#[test]
fn test_errors_alone_fail_the_run() {
    let mut summary = TestSummary::new();
    summary.add_counts(&TestSuite {
        tests: 1,
        errors: 1,
        ..TestSuite::new("s")
    });

    let check = CheckRun::from_summary(summary, "Unit tests", None);
    assert!(check.is_failure());
}

#[tokio::test]
async fn test_json_reporter_writes_check_run() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("check-run.json");
    let reporter = JsonReporter::new(Some(path.clone()));
    let check = CheckRun::from_summary(failed_summary().await, "Unit tests", None);

    // Act
    let result = reporter.publish(&check);

    // Assert
    assert!(result.is_ok());
    let content = std::fs::read_to_string(&path).expect("Failed to read JSON file");
    let json: serde_json::Value = serde_json::from_str(&content).expect("Invalid JSON");
    assert_eq!(json["name"], "Unit tests");
    assert_eq!(json["conclusion"], "failure");
    assert!(json.get("head_sha").is_none());
    assert_eq!(json["output"]["annotations"][1]["annotation_level"], "failure");
    assert_eq!(json["output"]["annotations"][1]["start_line"], 12);
}

#[tokio::test]
async fn test_github_commands() {
    // Arrange
    let check = CheckRun::from_summary(failed_summary().await, "Unit tests", None);

    // Act
    let rendered = GithubReporter::render(&check);
    let lines: Vec<&str> = rendered.lines().collect();

    // Assert
    assert_eq!(
        lines,
        vec![
            "::error title=Unit tests::Junit Results ran 2 in 1.5 seconds 0 Errored, 1 Failed, 0 Skipped",
            "::error file=src/test/java/org/dummy/ClassTest.java,line=12,endLine=12,title=Unit tests::Junit test methodTest failed expected: <1>, but: <2>",
        ]
    );
}

#[test]
fn test_github_command_without_line() {
    let mut check = CheckRun::from_summary(TestSummary::new(), "a:b, c", None);
    check.output.annotations.push(Annotation::failure(
        Location::unknown("org/dummy/ClassTest"),
        "line one\nline two",
    ));

    let rendered = GithubReporter::render(&check);
    let last = rendered.lines().last().unwrap();
    assert_eq!(
        last,
        "::error file=org/dummy/ClassTest,title=a%3Ab%2C c::line one%0Aline two"
    );
}
