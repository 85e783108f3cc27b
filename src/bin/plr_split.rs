use anyhow::{Context, Result};
use clap::Parser;
use pupil_stats::logging::init_logging;
use pupil_stats::paths::{FixedPaths, PromptPaths, WithFallback};
use pupil_stats::{run_splitter, Outcome, SplitterConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "plr-split")]
#[command(about = "Split a PLR export into one CSV per measurement type and pupil", long_about = None)]
#[command(version)]
struct Cli {
    /// Combined CSV export; prompts when omitted
    input: Option<PathBuf>,

    /// Directory receiving the split files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = SplitterConfig::default();
    if let Some(dir) = cli.output_dir {
        config = config.with_output_dir(dir);
    }

    let mut paths = WithFallback::new(FixedPaths::new(cli.input, None), PromptPaths::stdio());

    match run_splitter(&mut paths, &config).context("splitting failed")? {
        Outcome::Completed(files) => println!("Wrote {} files to {}", files.len(), config.output_dir.display()),
        Outcome::NoSelection => println!("No file selected."),
    }
    Ok(())
}
