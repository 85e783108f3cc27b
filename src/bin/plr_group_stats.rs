use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pupil_stats::logging::init_logging;
use pupil_stats::paths::{FixedPaths, PromptPaths, WithFallback};
use pupil_stats::{run_group_stats, AnalysisConfig, GroupStatsPipeline, Outcome, Protocol};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProtocolArg {
    /// Light flash dependent variables
    Light,
    /// Dark flash dependent variables
    Dark,
}

impl From<ProtocolArg> for Protocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Light => Protocol::LightFlash,
            ProtocolArg::Dark => Protocol::DarkFlash,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "plr-group-stats")]
#[command(about = "Correlations, group tests and ANCOVA for pregnant vs control subjects", long_about = None)]
#[command(version)]
struct Cli {
    /// Split file merged with physiology columns; prompts when omitted
    input: Option<PathBuf>,

    /// Text report; CSV and PNG artifacts are written next to it
    report: Option<PathBuf>,

    /// Flash protocol, selects the dependent variables
    #[arg(long, value_enum)]
    protocol: Option<ProtocolArg>,

    /// JSON analysis configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Decimals in report tables
    #[arg(long)]
    precision: Option<usize>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(protocol) = cli.protocol {
        config = config.with_protocol(protocol.into());
    }
    if let Some(precision) = cli.precision {
        config.display.float_precision = precision;
    }

    let pipeline = GroupStatsPipeline::with_heatmap(config)?;

    let mut paths = WithFallback::new(FixedPaths::new(cli.input, cli.report), PromptPaths::stdio());

    match run_group_stats(&mut paths, &pipeline).context("group statistics failed")? {
        Outcome::Completed(_) => {}
        Outcome::NoSelection => println!("No file selected. Exiting..."),
    }
    Ok(())
}
