// Locate command - resolve one test case without a full run

use anyhow::Result;
use std::path::PathBuf;

use crate::cli::args::LocateArgs;
use crate::config::Config;
use crate::junit::TestCase;
use crate::locate::SourceLocator;

pub async fn handle_locate(args: &LocateArgs, config: &Config) -> Result<()> {
    let root = args
        .root
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.source.root));
    let locator = SourceLocator::new(root);

    let case = TestCase::new(&args.name, &args.classname);
    let location = locator.locate(&args.report, &case).await?;

    if args.is_json() {
        println!("{}", serde_json::to_string_pretty(&location)?);
    } else {
        println!("{}:{}", location.file_path, location.line);
    }
    Ok(())
}
