// JUnit XML parser built on quick-xml events

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use super::model::{Failure, ReportDocument, ReportRoot, TestCase, TestSuite};

const TAG_REPORT: &[u8] = b"testsuites";
const TAG_TEST_SUITE: &[u8] = b"testsuite";
const TAG_TEST_CASE: &[u8] = b"testcase";
const TAG_FAILURE: &[u8] = b"failure";
const TAG_ERROR: &[u8] = b"error";
const TAG_SKIPPED: &[u8] = b"skipped";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unexpected end of document with {0} element(s) still open")]
    UnexpectedEof(usize),

    #[error("document has no root element")]
    NoRootElement,

    #[error("text outside of any element: {0:?}")]
    StrayText(String),

    #[error("invalid `{attribute}` on <{element}>: {value:?} is not a valid number")]
    InvalidNumber {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        ParseError::Xml(e.into())
    }
}

/// What an open element means to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Report,
    Suite,
    Case,
    Failure,
    Error,
    Skipped,
    Ignored,
}

#[derive(Debug, Default)]
struct ReportParser {
    stack: Vec<Frame>,
    roots: Vec<ReportRoot>,
    saw_root: bool,
    collection: Option<Vec<TestSuite>>,
    suite: Option<TestSuite>,
    case: Option<TestCase>,
    detail: Option<Failure>,
}

/// Parse a JUnit XML document into its root records.
///
/// Only `<testsuite>` elements at the root or directly under a root
/// `<testsuites>` are read; deeper or unknown elements are skipped.
pub fn parse_report(xml: &str) -> Result<ReportDocument, ParseError> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);

    let mut parser = ReportParser::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => parser.open(&e)?,
            Event::End(_) => parser.close(),
            Event::Empty(e) => {
                parser.open(&e)?;
                parser.close();
            }
            Event::Text(e) => parser.text(&e.unescape()?)?,
            Event::CData(e) => parser.text(&String::from_utf8_lossy(&e))?,
            Event::Eof => break,
            _ => (),
        }
    }

    parser.finish()
}

/// Parse and flatten a report into its suites in document order
pub fn read_suites(xml: &str) -> Result<Vec<TestSuite>, ParseError> {
    parse_report(xml).map(super::normalize)
}

impl ReportParser {
    fn open(&mut self, e: &BytesStart) -> Result<(), ParseError> {
        let parent = self.stack.last().copied();
        let frame = match (parent, e.name().as_ref()) {
            (None, TAG_REPORT) => {
                self.collection = Some(Vec::new());
                Frame::Report
            }
            (None | Some(Frame::Report), TAG_TEST_SUITE) => {
                self.suite = Some(open_suite(e)?);
                Frame::Suite
            }
            (Some(Frame::Suite), TAG_TEST_CASE) => {
                self.case = Some(open_case(e)?);
                Frame::Case
            }
            (Some(Frame::Case), TAG_FAILURE) => {
                self.detail = Some(open_detail(e)?);
                Frame::Failure
            }
            (Some(Frame::Case), TAG_ERROR) => {
                self.detail = Some(open_detail(e)?);
                Frame::Error
            }
            (Some(Frame::Case), TAG_SKIPPED) => {
                if let Some(case) = self.case.as_mut() {
                    case.skipped = true;
                }
                Frame::Skipped
            }
            _ => Frame::Ignored,
        };

        if parent.is_none() {
            self.saw_root = true;
        }
        self.stack.push(frame);
        Ok(())
    }

    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };

        match frame {
            Frame::Report => {
                let suites = self.collection.take().unwrap_or_default();
                self.roots.push(ReportRoot::Suites(suites));
            }
            Frame::Suite => {
                let Some(suite) = self.suite.take() else {
                    return;
                };
                match self.collection.as_mut() {
                    Some(collection) if self.stack.last() == Some(&Frame::Report) => {
                        collection.push(suite)
                    }
                    _ => self.roots.push(ReportRoot::Suite(suite)),
                }
            }
            Frame::Case => {
                if let (Some(suite), Some(case)) = (self.suite.as_mut(), self.case.take()) {
                    suite.cases.push(case);
                }
            }
            Frame::Failure | Frame::Error => {
                let (Some(case), Some(mut detail)) = (self.case.as_mut(), self.detail.take())
                else {
                    return;
                };
                detail.text = detail.text.trim().to_string();
                // Reruns may repeat the element; the first one describes the test
                let slot = if frame == Frame::Failure {
                    &mut case.failure
                } else {
                    &mut case.error
                };
                if slot.is_none() {
                    *slot = Some(detail);
                }
            }
            Frame::Skipped | Frame::Ignored => {}
        }
    }

    fn text(&mut self, text: &str) -> Result<(), ParseError> {
        match self.stack.last() {
            None if !text.trim().is_empty() => Err(ParseError::StrayText(text.trim().to_string())),
            Some(Frame::Failure | Frame::Error) => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.text.push_str(text);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn finish(self) -> Result<ReportDocument, ParseError> {
        if !self.stack.is_empty() {
            return Err(ParseError::UnexpectedEof(self.stack.len()));
        }
        if !self.saw_root {
            return Err(ParseError::NoRootElement);
        }
        Ok(ReportDocument { roots: self.roots })
    }
}

fn open_suite(e: &BytesStart) -> Result<TestSuite, ParseError> {
    const ELEMENT: &str = "testsuite";

    Ok(TestSuite {
        name: attr(e, b"name")?.unwrap_or_default(),
        tests: count(e, ELEMENT, "tests")?,
        skipped: count(e, ELEMENT, "skipped")?,
        failures: count(e, ELEMENT, "failures")?,
        errors: count(e, ELEMENT, "errors")?,
        time: seconds(e, ELEMENT)?.unwrap_or(0.0),
        cases: Vec::new(),
    })
}

fn open_case(e: &BytesStart) -> Result<TestCase, ParseError> {
    let mut case = TestCase::new(
        attr(e, b"name")?.unwrap_or_default(),
        attr(e, b"classname")?.unwrap_or_default(),
    );
    case.time = seconds(e, "testcase")?;
    Ok(case)
}

fn open_detail(e: &BytesStart) -> Result<Failure, ParseError> {
    Ok(Failure {
        message: attr(e, b"message")?,
        kind: attr(e, b"type")?,
        text: String::new(),
    })
}

fn attr(e: &BytesStart, key: &[u8]) -> Result<Option<String>, ParseError> {
    for attribute in e.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == key {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Absent or blank counts are zero; anything else must be a non-negative
/// integer, written either plainly or as an integral decimal (`3.0`)
fn count(e: &BytesStart, element: &'static str, attribute: &'static str) -> Result<u64, ParseError> {
    let Some(raw) = attr(e, attribute.as_bytes())? else {
        return Ok(0);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(0);
    }
    if let Ok(n) = value.parse::<u64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64 => {
            Ok(n as u64)
        }
        _ => Err(ParseError::InvalidNumber {
            element,
            attribute,
            value: raw.clone(),
        }),
    }
}

fn seconds(e: &BytesStart, element: &'static str) -> Result<Option<f64>, ParseError> {
    let Some(raw) = attr(e, b"time")? else {
        return Ok(None);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(time) if time.is_finite() => Ok(Some(time)),
        _ => Err(ParseError::InvalidNumber {
            element,
            attribute: "time",
            value: raw.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignores_nested_suites_and_properties() {
        let xml = r#"<testsuite name="outer" tests="1">
            <properties><property name="java.version" value="17"/></properties>
            <testsuite name="inner" tests="9"><testcase name="hidden"/></testsuite>
            <testcase name="visible" classname="a.B"/>
            <system-out>noise</system-out>
        </testsuite>"#;

        let suites = read_suites(xml).unwrap();
        assert_eq!(suites.len(), 1);
        assert_eq!(suites[0].name, "outer");
        assert_eq!(suites[0].cases.len(), 1);
        assert_eq!(suites[0].cases[0].name, "visible");
    }

    #[test]
    fn test_blank_count_is_zero() {
        let suites = read_suites(r#"<testsuite name="s" tests=" " errors=""/>"#).unwrap();
        assert_eq!(suites[0].tests, 0);
        assert_eq!(suites[0].errors, 0);
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let err = read_suites(r#"<testsuite name="s" failures="-1"/>"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber {
                attribute: "failures",
                ..
            }
        ));
    }

    #[test]
    fn test_first_failure_wins() {
        let xml = r#"<testsuite name="s">
            <testcase name="t" classname="a.B">
                <failure message="first">one</failure>
                <failure message="second">two</failure>
            </testcase>
        </testsuite>"#;

        let suites = read_suites(xml).unwrap();
        let failure = suites[0].cases[0].failure.as_ref().unwrap();
        assert_eq!(failure.message.as_deref(), Some("first"));
        assert_eq!(failure.text, "one");
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let suites = read_suites("\u{feff}<testsuite name=\"bom\"/>").unwrap();
        assert_eq!(suites[0].name, "bom");
    }
}
