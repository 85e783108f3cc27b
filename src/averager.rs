//! Per-subject averaging by measurement type and pupil

use crate::paths::PathProvider;
use crate::report::TextTable;
use crate::{Outcome, Result};
use plr_core::schema::{AVERAGE_DENYLIST, GROUP_KEYS};
use plr_core::{AppendHeader, AveragerConfig, DisplayOptions};
use plr_polars::{append_csv, read_csv, PlrFrameExt};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// What one averaging run appended
#[derive(Debug, Clone)]
pub struct AverageSummary {
    pub input: PathBuf,
    pub master_file: PathBuf,
    /// One row per (measurement type, pupil), key columns first
    pub averages: DataFrame,
    pub header_written: bool,
}

/// Mean of every numeric, non-identifier column per (measurement type, pupil)
///
/// Groups come out in ascending key order. Missing cells are skipped; a group
/// with no value in a column gets a null mean.
#[instrument]
pub fn average_subject(input: &Path) -> Result<DataFrame> {
    let df = read_csv(input)?;
    df.require_columns(&GROUP_KEYS)?;
    let averages = df.grouped_means(&GROUP_KEYS, &AVERAGE_DENYLIST)?;
    info!(rows = df.height(), groups = averages.height(), "averaged subject readings");
    Ok(averages)
}

/// Append averaged rows to the master file
///
/// The master file is an append log: rows are never merged or deduplicated,
/// and nothing guards against two processes appending at once.
pub fn append_to_master(averages: &mut DataFrame, config: &AveragerConfig) -> Result<bool> {
    let header = match config.header {
        AppendHeader::Never => false,
        AppendHeader::IfMissing => !config.master_file.exists(),
    };
    append_csv(averages, &config.master_file, header)?;
    info!(
        master = %config.master_file.display(),
        rows = averages.height(),
        header,
        "appended averages"
    );
    Ok(header)
}

/// Select a subject file, average it, print the result and append it
pub fn run_averager<P: PathProvider>(
    paths: &mut P,
    config: &AveragerConfig,
    display: &DisplayOptions,
) -> Result<Outcome<AverageSummary>> {
    let Some(input) = paths.select_input("Select CSV file")? else {
        info!("no input selected");
        return Ok(Outcome::NoSelection);
    };

    let mut averages = average_subject(&input)?;
    println!("{}", TextTable::from_frame(&averages, display)?.render(display.column_spacing));

    let header_written = append_to_master(&mut averages, config)?;
    println!("Averages appended to '{}'", config.master_file.display());

    Ok(Outcome::Completed(AverageSummary {
        input,
        master_file: config.master_file.clone(),
        averages,
        header_written,
    }))
}
