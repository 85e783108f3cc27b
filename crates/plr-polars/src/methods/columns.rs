//! Column lookup, schema checks and value extraction

use crate::{Error, Result};
use polars::prelude::*;

pub(crate) fn column_of<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| Error::InvalidColumn(name.to_string()))
}

pub(crate) fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric()
}

/// Numeric, or with no value at all
///
/// The CSV reader types a column with no values as text; such a column still
/// stands for a numeric field that was never filled in.
pub(crate) fn holds_numbers(column: &Column) -> bool {
    match column.dtype() {
        DataType::Null => true,
        dt if is_numeric(dt) => true,
        _ => column.len() > 0 && column.null_count() == column.len(),
    }
}

pub(crate) fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    let missing: Vec<String> = columns
        .iter()
        .filter(|name| df.column(name).is_err())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingColumns(missing))
    }
}

pub(crate) fn project(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    require_columns(df, columns)?;
    Ok(df.select(columns.iter().copied())?)
}

pub(crate) fn numeric_columns(df: &DataFrame, exclude: &[&str]) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|column| holds_numbers(column))
        .map(|column| column.name().to_string())
        .filter(|name| !exclude.contains(&name.as_str()))
        .collect()
}

pub(crate) fn float_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = column_of(df, name)?;
    let floats = match column.dtype() {
        DataType::Float64 => column.clone(),
        DataType::String | DataType::Boolean | DataType::Null => column.cast(&DataType::Float64)?,
        dt if is_numeric(dt) => column.cast(&DataType::Float64)?,
        dt => {
            return Err(Error::TypeMismatch {
                column: name.to_string(),
                expected: "numeric".to_string(),
                got: format!("{dt:?}"),
            })
        }
    };
    let ca = floats.f64()?;
    Ok(ca.into_iter().map(|value| value.unwrap_or(f64::NAN)).collect())
}

pub(crate) fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = column_of(df, name)?;
    let text = column.cast(&DataType::String)?;
    let ca = text.str()?;
    Ok(ca
        .into_iter()
        .map(|value| value.map(|s| s.to_string()))
        .collect())
}

/// `true` for every row whose cell is null, or `NaN` in a numeric column
pub(crate) fn missing_mask(df: &DataFrame, name: &str) -> Result<Vec<bool>> {
    let column = column_of(df, name)?;
    if is_numeric(column.dtype()) {
        Ok(float_values(df, name)?.iter().map(|v| v.is_nan()).collect())
    } else {
        Ok(text_values(df, name)?.iter().map(Option::is_none).collect())
    }
}

pub(crate) fn take_rows(df: &DataFrame, rows: &[IdxSize]) -> Result<DataFrame> {
    let indices = IdxCa::from_vec("rows".into(), rows.to_vec());
    Ok(df.take(&indices)?)
}
