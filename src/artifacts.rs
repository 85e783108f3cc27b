//! CSV artifacts of the group statistics pipeline

use crate::Result;
use plr_inference::{AnovaTable, LabeledMatrix};
use std::path::Path;

pub const CORRELATION_MATRIX: &str = "Correlation_Matrix.csv";
pub const P_VALUES_MATRIX: &str = "P_Values_Matrix.csv";
pub const COMBINED_MATRIX: &str = "Combined_Correlation_Pvalues.csv";
pub const HEATMAP: &str = "Correlation_Heatmap.png";

/// `<dependent>_ANCOVA_table.csv`
pub fn ancova_file_name(dependent: &str) -> String {
    format!("{dependent}_ANCOVA_table.csv")
}

/// Shortest round-trip text; `NaN` is an empty cell
fn number_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Header `,<name>,<name>...` then one row per name
pub(crate) fn write_cells(path: &Path, names: &[String], cells: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = Vec::with_capacity(names.len() + 1);
    header.push("");
    header.extend(names.iter().map(String::as_str));
    writer.write_record(&header)?;

    for (name, row) in names.iter().zip(cells) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(name.as_str());
        record.extend(row.iter().map(String::as_str));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

pub(crate) fn write_matrix(path: &Path, matrix: &LabeledMatrix) -> Result<()> {
    let n = matrix.len();
    let cells: Vec<Vec<String>> = (0..n)
        .map(|i| (0..n).map(|j| number_cell(matrix.get(i, j))).collect())
        .collect();
    write_cells(path, matrix.names(), &cells)
}

/// Header `,sum_sq,df,F,PR(>F)`, residual row last with empty F and p
pub(crate) fn write_anova(path: &Path, table: &AnovaTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![""];
    header.extend(AnovaTable::HEADERS);
    writer.write_record(&header)?;

    for row in &table.rows {
        writer.write_record([
            row.term.clone(),
            number_cell(row.sum_sq),
            number_cell(row.df),
            number_cell(row.f_value),
            number_cell(row.p_value),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
