//! Categorical label rewriting and row filters

use super::columns::{missing_mask, require_columns, take_rows, text_values};
use crate::Result;
use polars::prelude::*;
use std::collections::BTreeMap;

pub(crate) fn coalesce_labels(
    df: &DataFrame,
    column: &str,
    merged: &[&str],
    into: &str,
) -> Result<DataFrame> {
    let labels: Vec<Option<String>> = text_values(df, column)?
        .into_iter()
        .map(|label| match label {
            Some(label) if merged.contains(&label.as_str()) => Some(into.to_string()),
            other => other,
        })
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new(column.into(), labels))?;
    Ok(out)
}

pub(crate) fn label_counts(df: &DataFrame, column: &str) -> Result<BTreeMap<String, usize>> {
    let mut counts = BTreeMap::new();
    for label in text_values(df, column)?.into_iter().flatten() {
        *counts.entry(label).or_insert(0) += 1;
    }
    Ok(counts)
}

pub(crate) fn filter_label(df: &DataFrame, column: &str, label: &str) -> Result<DataFrame> {
    let rows: Vec<IdxSize> = text_values(df, column)?
        .iter()
        .enumerate()
        .filter(|(_, value)| value.as_deref() == Some(label))
        .map(|(row, _)| row as IdxSize)
        .collect();
    take_rows(df, &rows)
}

pub(crate) fn drop_missing(df: &DataFrame, subset: &[&str]) -> Result<DataFrame> {
    require_columns(df, subset)?;

    let mut keep = vec![true; df.height()];
    for name in subset {
        for (flag, missing) in keep.iter_mut().zip(missing_mask(df, name)?) {
            if missing {
                *flag = false;
            }
        }
    }

    let rows: Vec<IdxSize> = keep
        .iter()
        .enumerate()
        .filter(|(_, keep)| **keep)
        .map(|(row, _)| row as IdxSize)
        .collect();
    take_rows(df, &rows)
}
