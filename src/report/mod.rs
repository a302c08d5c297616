// Report module - check-run payload and the sinks that publish it

pub mod check;
pub mod console;
pub mod github;
pub mod json;

use anyhow::Result;
pub use check::{CheckOutput, CheckRun, Conclusion};
pub use console::ConsoleReporter;
pub use github::GithubReporter;
pub use json::JsonReporter;

/// Reporting sink
pub trait Reporter: Send + Sync {
    /// Publish the finished run
    fn publish(&self, check: &CheckRun) -> Result<()>;
}
