use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pupil_stats::logging::init_logging;
use pupil_stats::paths::{FixedPaths, PromptPaths, WithFallback};
use pupil_stats::{run_averager, AppendHeader, AveragerConfig, DisplayOptions, Outcome};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HeaderMode {
    /// Never write a header row
    Never,
    /// Write a header only when the master file does not exist yet
    IfMissing,
}

impl From<HeaderMode> for AppendHeader {
    fn from(mode: HeaderMode) -> Self {
        match mode {
            HeaderMode::Never => AppendHeader::Never,
            HeaderMode::IfMissing => AppendHeader::IfMissing,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "plr-average")]
#[command(about = "Average one subject's PLR readings by measurement type and pupil", long_about = None)]
#[command(version)]
struct Cli {
    /// Subject CSV export; prompts when omitted
    input: Option<PathBuf>,

    /// Cumulative CSV the averages are appended to
    #[arg(long)]
    master: Option<PathBuf>,

    /// Header row behaviour when appending
    #[arg(long, value_enum, default_value = "never")]
    header: HeaderMode,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = AveragerConfig::default().with_header(cli.header.into());
    if let Some(master) = cli.master {
        config = config.with_master_file(master);
    }

    let mut paths = WithFallback::new(FixedPaths::new(cli.input, None), PromptPaths::stdio());

    match run_averager(&mut paths, &config, &DisplayOptions::default())
        .context("averaging failed")?
    {
        Outcome::Completed(_) => {}
        Outcome::NoSelection => println!("No file selected."),
    }
    Ok(())
}
