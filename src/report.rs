//! Plain-text tables and the group statistics report

use crate::Result;
use comfy_table::presets::NOTHING;
use comfy_table::{CellAlignment, Table};
use plr_core::DisplayOptions;
use plr_inference::{AnovaTable, LabeledMatrix};
use plr_polars::PlrFrameExt;
use polars::prelude::*;
use std::path::Path;

/// Float cell with a fixed number of decimals
pub fn format_float(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{value:.precision$}")
    }
}

/// Table with a row-label column and right-aligned value columns
#[derive(Debug, Clone)]
pub struct TextTable {
    table: Table,
    rows: usize,
}

impl TextTable {
    pub fn new(headers: Vec<String>) -> Self {
        let mut table = Table::new();
        table
            .load_preset(NOTHING)
            .set_header(std::iter::once(String::new()).chain(headers));
        Self { table, rows: 0 }
    }

    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<String>) {
        self.table.add_row(std::iter::once(label.into()).chain(cells));
        self.rows += 1;
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Square matrix with variable names on both axes
    pub fn from_matrix(matrix: &LabeledMatrix, display: &DisplayOptions) -> Self {
        let n = matrix.len();
        let mut table = Self::new(matrix.names().to_vec());
        for (i, name) in matrix.names().iter().enumerate() {
            let cells = (0..n)
                .map(|j| format_float(matrix.get(i, j), display.float_precision))
                .collect();
            table.push_row(name.clone(), cells);
        }
        table
    }

    /// Pre-formatted square cells, e.g. the combined coefficient/p-value view
    pub fn from_cells(names: &[String], cells: Vec<Vec<String>>) -> Self {
        let mut table = Self::new(names.to_vec());
        for (name, row) in names.iter().zip(cells) {
            table.push_row(name.clone(), row);
        }
        table
    }

    pub fn from_anova(anova: &AnovaTable, display: &DisplayOptions) -> Self {
        let mut table = Self::new(AnovaTable::HEADERS.iter().map(|h| h.to_string()).collect());
        for row in &anova.rows {
            table.push_row(
                row.term.clone(),
                [row.sum_sq, row.df, row.f_value, row.p_value]
                    .iter()
                    .map(|v| format_float(*v, display.float_precision))
                    .collect(),
            );
        }
        table
    }

    /// Every column of a frame, rows labelled by position
    pub fn from_frame(df: &DataFrame, display: &DisplayOptions) -> Result<Self> {
        let headers: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();

        let mut columns: Vec<Vec<String>> = Vec::with_capacity(headers.len());
        for column in df.get_columns() {
            let cells = if column.dtype().is_float() {
                df.float_values(column.name())?
                    .into_iter()
                    .map(|v| format_float(v, display.float_precision))
                    .collect()
            } else {
                df.text_values(column.name())?
                    .into_iter()
                    .map(|v| v.unwrap_or_else(|| "null".to_string()))
                    .collect()
            };
            columns.push(cells);
        }

        let mut table = Self::new(headers);
        for row in 0..df.height() {
            table.push_row(row.to_string(), columns.iter().map(|c| c[row].clone()).collect());
        }
        Ok(table)
    }

    /// Render with `spacing` blanks between columns; no trailing newline
    pub fn render(&self, spacing: usize) -> String {
        let gap = u16::try_from(spacing).unwrap_or(u16::MAX);
        let mut table = self.table.clone();
        for (i, column) in table.column_iter_mut().enumerate() {
            if i == 0 {
                column.set_padding((0, 0));
                column.set_cell_alignment(CellAlignment::Left);
            } else {
                column.set_padding((gap, 0));
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
        table.trim_fmt()
    }
}

/// Text report assembled line by line
#[derive(Debug, Clone, Default)]
pub struct Report {
    text: String,
    spacing: usize,
}

impl Report {
    pub fn new(display: &DisplayOptions) -> Self {
        Self {
            text: String::new(),
            spacing: display.column_spacing,
        }
    }

    pub fn line(&mut self, line: impl AsRef<str>) {
        self.text.push_str(line.as_ref());
        self.text.push('\n');
    }

    pub fn blank(&mut self) {
        self.text.push('\n');
    }

    pub fn table(&mut self, table: &TextTable) {
        let rendered = table.render(self.spacing);
        self.line(rendered);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.text)?;
        Ok(())
    }
}
