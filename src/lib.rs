pub mod cli;
pub mod commands;
pub mod config;
pub mod junit;
pub mod locate;
pub mod logging;
pub mod report;
pub mod state;
pub mod utils;

pub use junit::{normalize, parse_report, read_suites};
pub use locate::{Locate, Location, SourceLocator};
pub use state::TestSummary;
