// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

pub const CONFIG_FILE_NAME: &str = ".junit-annotate.toml";

/// Commit the check run is attached to when `--commit` is not given
pub const ENV_GITHUB_SHA: &str = "GITHUB_SHA";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub reports: ReportsConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub check: CheckConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Globs or paths of JUnit XML reports
    #[serde(default = "default_report_paths")]
    pub paths: Vec<String>,

    /// Maximum number of failure annotations
    #[serde(default = "default_max_annotations")]
    pub max_annotations: usize,

    /// Annotate test cases that errored without failing
    #[serde(default)]
    pub annotate_errors: bool,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            paths: default_report_paths(),
            max_annotations: default_max_annotations(),
            annotate_errors: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory searched for test sources
    #[serde(default = "default_root")]
    pub root: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Check-run name and title
    #[serde(default = "default_check_name")]
    pub name: String,

    /// Exit with status 1 when tests failed or errored
    #[serde(default)]
    pub fail_on_failure: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            name: default_check_name(),
            fail_on_failure: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Reporting sink: console, github or json
    #[serde(default = "default_format")]
    pub format: String,

    /// Output file for the json sink
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            file: None,
        }
    }
}

// Default values
pub fn default_report_paths() -> Vec<String> {
    vec![String::from("**/TEST-*.xml")]
}

pub fn default_max_annotations() -> usize {
    10
}

pub fn default_root() -> String {
    String::from(".")
}

pub fn default_check_name() -> String {
    String::from("JUnit Test Report")
}

fn default_format() -> String {
    String::from("console")
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .junit-annotate.toml (current directory)
        // 2. ~/.junit-annotate.toml (home directory)
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONFIG_FILE_NAME));
        }

        paths
            .iter()
            .find(|path| path.exists())
            .and_then(|path| Self::load_from_file(path))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let config = Self::parse(&content);
        if config.is_none() {
            warn!("Ignoring unparseable configuration file {}", path.display());
        }
        config
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[reports]
paths = ["build/test-results/**/*.xml", "target/surefire-reports"]
max_annotations = 50
annotate_errors = true

[source]
root = "backend"

[check]
name = "Unit tests"
fail_on_failure = true

[output]
format = "json"
file = "check-run.json"
"#;

        let config = Config::parse(toml).expect("Failed to parse config");
        assert_eq!(config.reports.paths.len(), 2);
        assert_eq!(config.reports.max_annotations, 50);
        assert!(config.reports.annotate_errors);
        assert_eq!(config.source.root, "backend");
        assert_eq!(config.check.name, "Unit tests");
        assert!(config.check.fail_on_failure);
        assert_eq!(config.output.format, "json");
        assert_eq!(config.output.file, Some("check-run.json".to_string()));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::parse("[reports]\nmax_annotations = 3\n").expect("Failed to parse");
        assert_eq!(config.reports.max_annotations, 3);
        assert_eq!(config.reports.paths, default_report_paths());
        assert_eq!(config.check.name, default_check_name());
    }

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let rendered = Config::default().to_toml();
        let parsed = Config::parse(&rendered).expect("Failed to parse rendered defaults");
        assert_eq!(parsed.reports.max_annotations, default_max_annotations());
        assert_eq!(parsed.output.format, "console");
    }
}
