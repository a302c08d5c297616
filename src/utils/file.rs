// Cross-platform file and path utilities

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// `*` and `?` never cross a path separator
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// File utilities for cross-platform operations
pub struct FileUtils;

impl FileUtils {
    /// Expand report patterns into report files.
    ///
    /// A pattern is either a glob (`**/TEST-*.xml`), a file, or a directory
    /// (every `.xml` below it). Symbolic links are not followed and hidden
    /// directories are not entered. Files keep pattern order, then walk
    /// order, and appear once.
    pub fn collect_report_files(patterns: &[String]) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for pattern in patterns {
            let matched = Self::expand_pattern(pattern)?;
            if matched.is_empty() {
                warn!("No report files match '{}'", pattern);
            }
            for file in matched {
                if seen.insert(file.clone()) {
                    files.push(file);
                }
            }
        }

        Ok(files)
    }

    fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
        if !Self::has_glob_meta(pattern) {
            let path = Path::new(pattern);
            if path.is_file() {
                return Ok(vec![path.to_path_buf()]);
            }
            if path.is_dir() {
                return Ok(Self::walk_files(path)
                    .into_iter()
                    .filter(|p| p.extension().is_some_and(|e| e == "xml"))
                    .collect());
            }
            return Ok(Vec::new());
        }

        let glob = Pattern::new(pattern)
            .with_context(|| format!("Invalid report path pattern: {}", pattern))?;
        let base = Self::literal_prefix(pattern);
        debug!("Walking {} for '{}'", base.display(), pattern);

        let walk_root = if base.as_os_str().is_empty() {
            Path::new(".")
        } else {
            base.as_path()
        };

        let mut files = Vec::new();
        for path in Self::walk_files(walk_root) {
            // Patterns without a directory prefix are matched against cwd-relative paths
            let candidate = if base.as_os_str().is_empty() {
                path.strip_prefix(".").map(Path::to_path_buf).unwrap_or(path)
            } else {
                path
            };
            if glob.matches_path_with(&candidate, MATCH_OPTIONS) {
                files.push(candidate);
            }
        }
        Ok(files)
    }

    /// Every regular file under `root`, sorted by name, skipping hidden directories
    pub fn walk_files(root: &Path) -> Vec<PathBuf> {
        Self::walk(root, false)
    }

    /// Every regular file under `root`, sorted by name, hidden directories included
    pub fn walk_tree(root: &Path) -> Vec<PathBuf> {
        Self::walk(root, true)
    }

    fn walk(root: &Path, include_hidden: bool) -> Vec<PathBuf> {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| {
                // Always include the root directory itself, even if it starts with '.'
                if include_hidden || e.depth() == 0 {
                    return true;
                }
                !(e.file_type().is_dir() && e.file_name().to_string_lossy().starts_with('.'))
            });

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => debug!("Skipping unreadable entry: {}", e),
            }
        }
        files
    }

    /// Leading path components that contain no glob metacharacters
    pub fn literal_prefix(pattern: &str) -> PathBuf {
        let mut prefix = PathBuf::new();
        for component in Path::new(pattern).components() {
            if Self::has_glob_meta(&component.as_os_str().to_string_lossy()) {
                break;
            }
            prefix.push(component.as_os_str());
        }
        prefix
    }

    pub fn has_glob_meta(s: &str) -> bool {
        s.contains(['*', '?', '['])
    }

    /// Make a path absolute against the current directory and drop `.`/`..` lexically
    pub fn absolutize(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            return Ok(Self::normalize_lexically(path));
        }
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Ok(Self::normalize_lexically(&cwd.join(path)))
    }

    /// Resolve `.` and `..` without touching the file system
    pub fn normalize_lexically(path: &Path) -> PathBuf {
        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                        normalized.pop();
                    } else if !normalized.has_root() {
                        normalized.push("..");
                    }
                }
                other => normalized.push(other.as_os_str()),
            }
        }
        normalized
    }

    /// Path of `to` as seen from `from`, both absolute and normalized.
    ///
    /// `from` is treated as a directory even when it names a file, so a
    /// sibling of a file is reached through one `..`.
    pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
        let from: Vec<Component> = from.components().collect();
        let to: Vec<Component> = to.components().collect();
        let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

        let mut relative = PathBuf::new();
        for _ in common..from.len() {
            relative.push("..");
        }
        for component in &to[common..] {
            relative.push(component.as_os_str());
        }
        relative
    }

    /// Join path components with `/` regardless of platform
    pub fn to_slash(path: &Path) -> String {
        path.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_from_report_file() {
        let report = Path::new("/work/target/surefire-reports/TEST-dummy.xml");
        let source = Path::new("/work/src/main/java/org/dummy/ClassTest.java");

        let relative = FileUtils::relative_path(report, source);
        assert_eq!(
            FileUtils::to_slash(&relative),
            "../../../src/main/java/org/dummy/ClassTest.java"
        );
    }

    #[test]
    fn test_relative_path_to_self_is_empty() {
        let path = Path::new("/work/a.xml");
        assert_eq!(FileUtils::relative_path(path, path), PathBuf::new());
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            FileUtils::normalize_lexically(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(
            FileUtils::normalize_lexically(Path::new("../x/./y")),
            PathBuf::from("../x/y")
        );
        assert_eq!(
            FileUtils::normalize_lexically(Path::new("/../a")),
            PathBuf::from("/a")
        );
    }

    #[test]
    fn test_literal_prefix() {
        assert_eq!(
            FileUtils::literal_prefix("build/test-results/**/TEST-*.xml"),
            PathBuf::from("build/test-results")
        );
        assert_eq!(FileUtils::literal_prefix("**/TEST-*.xml"), PathBuf::new());
    }

    #[test]
    fn test_collect_report_files_glob() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("module/target/surefire-reports");
        std::fs::create_dir_all(&reports).unwrap();
        std::fs::write(reports.join("TEST-b.xml"), "<testsuite/>").unwrap();
        std::fs::write(reports.join("TEST-a.xml"), "<testsuite/>").unwrap();
        std::fs::write(reports.join("other.txt"), "").unwrap();

        let pattern = format!("{}/**/TEST-*.xml", dir.path().display());
        let files = FileUtils::collect_report_files(&[pattern.clone(), pattern]).unwrap();

        assert_eq!(
            files,
            vec![reports.join("TEST-a.xml"), reports.join("TEST-b.xml")]
        );
    }

    #[test]
    fn test_collect_report_files_skips_hidden_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".cache")).unwrap();
        std::fs::write(dir.path().join(".cache/TEST-x.xml"), "").unwrap();
        std::fs::write(dir.path().join("TEST-y.xml"), "").unwrap();

        let files = FileUtils::collect_report_files(&[dir.path().display().to_string()]).unwrap();
        assert_eq!(files, vec![dir.path().join("TEST-y.xml")]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(FileUtils::collect_report_files(&["reports/[.xml".to_string()]).is_err());
    }
}
