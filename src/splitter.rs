//! Splitting an export into one file per measurement type and pupil

use crate::paths::PathProvider;
use crate::{Outcome, Result};
use plr_core::schema::{GROUP_KEYS, SPLIT_COLUMNS};
use plr_core::SplitterConfig;
use plr_polars::{read_csv, write_csv, GroupKey, PlrFrameExt};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// One written group file
#[derive(Debug, Clone, PartialEq)]
pub struct SplitFile {
    pub key: GroupKey,
    pub path: PathBuf,
    pub rows: usize,
}

/// Write `<MeasurementType>_<Pupil>_tebs.csv` for every group of `input`
///
/// The schema is checked before anything is written: a missing column fails
/// the whole split and leaves the output directory untouched. Existing files
/// with the same names are overwritten.
#[instrument(skip(config), fields(output_dir = %config.output_dir.display()))]
pub fn split_export(input: &Path, config: &SplitterConfig) -> Result<Vec<SplitFile>> {
    let df = read_csv(input)?;
    let projected = df.project(&SPLIT_COLUMNS)?;
    let partitions = projected.partition_by_keys(&GROUP_KEYS)?;

    fs::create_dir_all(&config.output_dir)?;

    let mut written = Vec::with_capacity(partitions.len());
    for (key, mut group) in partitions {
        let name = config.file_name(
            key.get(0).unwrap_or_default(),
            key.get(1).unwrap_or_default(),
        );
        let path = config.output_dir.join(name);
        write_csv(&mut group, &path)?;
        info!(group = %key, rows = group.height(), path = %path.display(), "wrote split file");

        written.push(SplitFile {
            key,
            path,
            rows: group.height(),
        });
    }

    Ok(written)
}

/// Select an export and split it
pub fn run_splitter<P: PathProvider>(
    paths: &mut P,
    config: &SplitterConfig,
) -> Result<Outcome<Vec<SplitFile>>> {
    let Some(input) = paths.select_input("Select CSV file")? else {
        info!("no input selected");
        return Ok(Outcome::NoSelection);
    };

    let written = split_export(&input, config)?;
    for file in &written {
        println!("Saved: {} ({} rows)", file.path.display(), file.rows);
    }
    Ok(Outcome::Completed(written))
}
