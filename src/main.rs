// Main entry point for junit-annotate

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use junit_annotate::cli::{Cli, Commands};
use junit_annotate::commands;
use junit_annotate::config::{self, Config};
use junit_annotate::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if cli.verbose {
        info!("Starting junit-annotate v{}", env!("CARGO_PKG_VERSION"));
    }

    // Load configuration from file (if exists)
    let loaded = Config::load();

    if cli.config {
        print_configuration(&cli, loaded.as_ref());
        return Ok(());
    }

    if let Some(config_file) = &cli.init_config {
        std::fs::write(config_file, Config::default().to_toml())?;
        println!("Configuration file created: {}", config_file.display());
        println!("\nYou can now edit the file to customize your settings.");
        print_precedence();
        return Ok(());
    }

    if let Some(shell_type) = &cli.completion {
        return commands::handle_completion(shell_type);
    }

    let config = loaded.unwrap_or_default();
    let passed = match &cli.command {
        Some(Commands::Run(args)) => commands::run_reports(args, &config).await?,
        Some(Commands::Locate(args)) => return commands::handle_locate(args, &config).await,
        Some(Commands::List(args)) => return commands::handle_list(args, &config).await,
        None => {
            // Implicit Run
            if cli.run_args.patterns().is_empty() && config.reports.paths.is_empty() {
                warn!("No report paths provided. Use 'junit-annotate --help' for usage.");
                return Ok(());
            }
            commands::run_reports(&cli.run_args, &config).await?
        }
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

fn print_configuration(cli: &Cli, loaded: Option<&Config>) {
    println!("Current configuration:");

    match loaded {
        Some(cfg) => {
            println!("\n  Configuration file loaded:");
            println!("    Report paths: {}", cfg.reports.paths.join(", "));
            println!("    Max annotations: {}", cfg.reports.max_annotations);
            println!("    Annotate errors: {}", cfg.reports.annotate_errors);
            println!("    Source root: {}", cfg.source.root);
            println!("    Check name: {}", cfg.check.name);
            println!("    Fail on failure: {}", cfg.check.fail_on_failure);
            println!("    Output format: {}", cfg.output.format);
            if let Some(ref file) = cfg.output.file {
                println!("    Output file: {}", file);
            }
        }
        None => {
            println!("\n  No configuration file loaded");
            println!(
                "  Create one with: junit-annotate --init-config {}",
                config::CONFIG_FILE_NAME
            );
        }
    }

    let args = &cli.run_args;
    let patterns = args.patterns();
    if !patterns.is_empty() {
        println!("\n  Command-line arguments:");
        println!("    Report paths: {}", patterns.join(", "));
    }

    println!("\n  Environment variables:");
    match std::env::var(config::ENV_GITHUB_SHA) {
        Ok(sha) => println!("    {}: {}", config::ENV_GITHUB_SHA, sha),
        Err(_) => println!("    {}: not set", config::ENV_GITHUB_SHA),
    }

    print_precedence();
}

fn print_precedence() {
    println!("\nConfiguration precedence:");
    println!("  1. Command-line arguments (highest)");
    println!("  2. Configuration file");
    println!("  3. Environment variables");
    println!("  4. Built-in defaults (lowest)");
}
