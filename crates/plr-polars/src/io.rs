//! CSV reading and writing
//!
//! Missing cells follow the pupillometer export conventions: empty cells and
//! the usual `NA`/`NaN` markers load as nulls.

use crate::Result;
use polars::prelude::*;
use std::fs::{File, OpenOptions};
use std::path::Path;
use tracing::debug;

const NA_VALUES: [&str; 6] = ["NA", "N/A", "NaN", "nan", "null", "#N/A"];

/// Load a CSV with a header row, inferring column types from every row
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let null_values = NullValues::AllColumns(NA_VALUES.iter().map(|v| (*v).into()).collect());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| opts.with_null_values(Some(null_values.clone())))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "loaded csv");
    Ok(df)
}

/// Write a CSV with a header row, replacing any existing file
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    debug!(path = %path.display(), rows = df.height(), "wrote csv");
    Ok(())
}

/// Append rows to a CSV, creating it when absent
///
/// There is no locking: concurrent appends to the same file can interleave.
pub fn append_csv(df: &mut DataFrame, path: &Path, include_header: bool) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    CsvWriter::new(&mut file)
        .include_header(include_header)
        .finish(df)?;
    debug!(path = %path.display(), rows = df.height(), include_header, "appended csv");
    Ok(())
}
