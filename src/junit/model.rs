// JUnit report records

use serde::Serialize;

/// Details of a `<failure>` or `<error>` element
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Failure {
    pub message: Option<String>,
    /// The `type` attribute, usually the exception class
    pub kind: Option<String>,
    pub text: String,
}

impl Failure {
    /// Message used in annotations: the `message` attribute, else the first line of the body
    pub fn summary(&self) -> &str {
        match self.message.as_deref() {
            Some(message) => message,
            None => self.text.lines().next().unwrap_or("").trim(),
        }
    }
}

/// One executed test method
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TestCase {
    pub name: String,
    pub classname: String,
    pub time: Option<f64>,
    pub failure: Option<Failure>,
    pub error: Option<Failure>,
    pub skipped: bool,
}

impl TestCase {
    pub fn new(name: impl Into<String>, classname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classname: classname.into(),
            ..Self::default()
        }
    }

    pub fn with_failure(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }
}

/// A named collection of test cases with its declared counts
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TestSuite {
    pub name: String,
    pub tests: u64,
    pub skipped: u64,
    pub failures: u64,
    pub errors: u64,
    /// Duration in seconds
    pub time: f64,
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A root element of a report document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReportRoot {
    /// `<testsuites>` wrapper
    Suites(Vec<TestSuite>),
    /// Bare `<testsuite>` root
    Suite(TestSuite),
}

/// Parsed report file, root elements in document order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReportDocument {
    pub roots: Vec<ReportRoot>,
}

/// Flatten a document into its suites.
///
/// Both root shapes are accepted and concatenated in document order. A
/// document with neither yields no suites.
pub fn normalize(document: ReportDocument) -> Vec<TestSuite> {
    let mut suites = Vec::new();
    for root in document.roots {
        match root {
            ReportRoot::Suites(collection) => suites.extend(collection),
            ReportRoot::Suite(suite) => suites.push(suite),
        }
    }
    suites
}
