// Source index - files living under a `src` directory

use anyhow::{Context, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::utils::FileUtils;
use crate::utils::file::MATCH_OPTIONS;

/// Snapshot of the candidate source files below a root.
///
/// Paths are kept relative to the root, `/`-separated, in walk order
/// (sorted by file name at each level).
#[derive(Debug, Clone)]
pub struct SourceIndex {
    root: PathBuf,
    files: Vec<String>,
}

impl SourceIndex {
    /// Walk `root` once and keep every file that has a `src` directory above it
    pub fn build(root: &Path) -> Result<Self> {
        let root = FileUtils::absolutize(root)?;
        if !root.is_dir() {
            anyhow::bail!("Source root is not a directory: {}", root.display());
        }

        let files: Vec<String> = FileUtils::walk_tree(&root)
            .into_iter()
            .filter_map(|path| {
                let relative = path.strip_prefix(&root).ok()?;
                under_src(relative).then(|| FileUtils::to_slash(relative))
            })
            .collect();

        debug!(
            "Indexed {} source file(s) under {}",
            files.len(),
            root.display()
        );
        Ok(Self { root, files })
    }

    /// Build from already relative paths, mostly for tests
    pub fn from_files(root: impl Into<PathBuf>, files: Vec<String>) -> Self {
        Self {
            root: root.into(),
            files: files
                .into_iter()
                .filter(|f| under_src(Path::new(f)))
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files matching `**/src/**/<stem>.*`, in index order
    pub fn candidates(&self, stem: &str) -> Result<Vec<&str>> {
        let pattern = format!("**/src/**/{}.*", Pattern::escape(stem));
        let glob = Pattern::new(&pattern)
            .with_context(|| format!("Invalid source pattern: {}", pattern))?;

        Ok(self
            .files
            .iter()
            .map(String::as_str)
            .filter(|f| glob.matches_with(f, MATCH_OPTIONS))
            .collect())
    }
}

fn under_src(relative: &Path) -> bool {
    relative
        .parent()
        .is_some_and(|dir| dir.components().any(|c| c.as_os_str() == "src"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(files: &[&str]) -> SourceIndex {
        SourceIndex::from_files("/work", files.iter().map(|f| f.to_string()).collect())
    }

    #[test]
    fn test_only_files_below_src_are_indexed() {
        let index = index(&[
            "src/main/java/org/dummy/ClassTest.java",
            "build/classes/org/dummy/ClassTest.class",
            "src",
        ]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_candidates_match_stem_with_any_extension() {
        let index = index(&[
            "module/src/test/kotlin/org/dummy/ClassTest.kt",
            "src/main/java/org/dummy/ClassTest.java",
            "src/main/java/org/dummy/ClassTestHelper.java",
            "src/main/java/org/dummy2/ClassTest.java",
            "src/main/java/org/dummy/sub/ClassTest.java",
        ]);

        assert_eq!(
            index.candidates("org/dummy/ClassTest").unwrap(),
            vec![
                "module/src/test/kotlin/org/dummy/ClassTest.kt",
                "src/main/java/org/dummy/ClassTest.java",
            ]
        );
    }

    #[test]
    fn test_stem_directly_under_src() {
        let index = index(&["src/org/dummy/ClassTest.java"]);
        assert_eq!(index.candidates("org/dummy/ClassTest").unwrap().len(), 1);
    }

    #[test]
    fn test_stem_metacharacters_are_literal() {
        let index = index(&["src/a/B.java", "src/a/[B].java"]);
        assert_eq!(index.candidates("a/[B]").unwrap(), vec!["src/a/[B].java"]);
    }
}
