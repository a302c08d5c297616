// JUnit module - report records, XML parsing and normalization

pub mod model;
pub mod parser;

pub use model::{Failure, ReportDocument, ReportRoot, TestCase, TestSuite, normalize};
pub use parser::{ParseError, parse_report, read_suites};
