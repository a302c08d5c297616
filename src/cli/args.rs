// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Reporting sink selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Console,
    Github,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "github" => Ok(Self::Github),
            "json" => Ok(Self::Json),
            other => anyhow::bail!(
                "Unknown output format '{}'. Supported: console, github, json",
                other
            ),
        }
    }
}

/// Annotate failing JUnit tests with their source location
#[derive(Parser, Debug)]
#[command(name = "junit-annotate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Summarize JUnit XML reports and point failing tests at their source",
    long_about = None
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // Flatten RunArgs so `junit-annotate 'build/**/TEST-*.xml'` runs directly
    #[command(flatten)]
    pub run_args: RunArgs,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Print shell completion (bash, zsh, fish, elvish, powershell)
    #[arg(long, value_name = "SHELL_TYPE", value_parser = ["bash", "zsh", "fish", "elvish", "powershell"])]
    pub completion: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate reports and publish annotations (default)
    Run(RunArgs),

    /// Resolve the source location of a single test case
    Locate(LocateArgs),

    /// List discovered report files with their counts
    List(ListArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Report files, directories or glob patterns
    #[arg(value_name = "REPORT_PATHS")]
    pub report_paths: Vec<String>,

    /// Report files, directories or glob patterns (same as the positional form)
    #[arg(long = "report-paths", value_name = "GLOB", num_args = 1..)]
    pub report_path_flags: Vec<String>,

    /// Maximum number of failure annotations
    #[arg(long, value_name = "N")]
    pub max_annotations: Option<usize>,

    /// Check-run name
    #[arg(long)]
    pub name: Option<String>,

    /// Directory searched for test sources
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Commit the check run belongs to (defaults to $GITHUB_SHA)
    #[arg(long, value_name = "SHA")]
    pub commit: Option<String>,

    /// Also annotate test cases that errored
    #[arg(long, default_value_t = false)]
    pub annotate_errors: bool,

    /// Exit with status 1 when any test failed or errored
    #[arg(long, default_value_t = false)]
    pub fail_on_failure: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file for the json format (stdout when omitted)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl RunArgs {
    /// Positional patterns first, then those given with `--report-paths`
    pub fn patterns(&self) -> Vec<String> {
        self.report_paths
            .iter()
            .chain(&self.report_path_flags)
            .cloned()
            .collect()
    }
}

#[derive(Args, Debug, Clone)]
pub struct LocateArgs {
    /// Report file the test case comes from
    #[arg(long, required = true)]
    pub report: PathBuf,

    /// Fully-qualified test class name
    #[arg(long, required = true)]
    pub classname: String,

    /// Test method name
    #[arg(long, required = true)]
    pub name: String,

    /// Directory searched for test sources
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

impl LocateArgs {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Report files, directories or glob patterns
    #[arg(value_name = "REPORT_PATHS")]
    pub report_paths: Vec<String>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

impl ListArgs {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}
