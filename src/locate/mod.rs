// Locate module - map a failing test case back to its source file and line

pub mod index;

pub use index::SourceIndex;

use anyhow::{Context, Result};
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::junit::TestCase;
use crate::utils::FileUtils;

/// Where an annotation should be attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// `/`-separated, relative to the source root
    pub file_path: String,
    /// 1-based; 0 attaches to the whole file
    pub line: usize,
}

impl Location {
    pub fn unknown(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line: 0,
        }
    }
}

/// Resolves the source location of a test case found in a report
pub trait Locate {
    fn locate(&self, report: &Path, case: &TestCase) -> impl Future<Output = Result<Location>>;
}

/// Searches a source tree for the file defining a test class.
///
/// The tree is walked once, on first use. Among the files named after the
/// class under some `src` directory, the one whose path relative to the
/// report is the shortest string wins; the first one wins a tie. The line
/// is the first one containing the method name anywhere in its text, so a
/// mention in a comment or a longer identifier can match first.
#[derive(Debug)]
pub struct SourceLocator {
    root: PathBuf,
    index: OnceCell<SourceIndex>,
}

impl SourceLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            index: OnceCell::new(),
        }
    }

    /// Use a prebuilt index instead of walking the root
    pub fn with_index(index: SourceIndex) -> Self {
        Self {
            root: index.root().to_path_buf(),
            index: OnceCell::new_with(Some(index)),
        }
    }

    pub async fn index(&self) -> Result<&SourceIndex> {
        self.index
            .get_or_try_init(|| async {
                let root = self.root.clone();
                tokio::task::spawn_blocking(move || SourceIndex::build(&root))
                    .await
                    .context("Source index task failed")?
            })
            .await
    }

    pub async fn locate(&self, report: &Path, case: &TestCase) -> Result<Location> {
        let stem = class_stem(&case.classname);
        let index = self.index().await?;
        let report = FileUtils::absolutize(report)?;

        let mut best: Option<(&str, usize)> = None;
        for candidate in index.candidates(&stem)? {
            let distance = FileUtils::relative_path(&report, &index.root().join(candidate))
                .to_string_lossy()
                .chars()
                .count();
            if best.is_none_or(|(_, shortest)| distance < shortest) {
                best = Some((candidate, distance));
            }
        }

        let Some((file, _)) = best else {
            debug!("No source found for {}, falling back to {}", case.classname, stem);
            return Ok(Location::unknown(stem));
        };

        let path = index.root().join(file);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read test source: {}", path.display()))?;
        let line = find_line(&String::from_utf8_lossy(&bytes), &case.name);
        debug!("{}#{} -> {}:{}", case.classname, case.name, file, line);

        Ok(Location {
            file_path: file.to_string(),
            line,
        })
    }
}

impl Locate for SourceLocator {
    async fn locate(&self, report: &Path, case: &TestCase) -> Result<Location> {
        SourceLocator::locate(self, report, case).await
    }
}

/// `org.dummy.Outer$Inner` -> `org/dummy/Outer`
pub fn class_stem(classname: &str) -> String {
    let outer = classname
        .split_once('$')
        .map_or(classname, |(outer, _)| outer);
    outer.replace('.', "/")
}

/// 1-based number of the first line containing `needle`, 0 when absent
pub fn find_line(source: &str, needle: &str) -> usize {
    source
        .split('\n')
        .position(|line| line.contains(needle))
        .map_or(0, |i| i + 1)
}
