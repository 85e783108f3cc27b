//! Grouped aggregation and partitioning by composite keys

use super::columns::{numeric_columns, require_columns, text_values};
use crate::{GroupKey, Result};
use polars::prelude::*;
use tracing::{debug, warn};

/// Rows with a value in every key column, sorted by the keys
///
/// The sort is stable so rows keep their input order within a group.
fn keyed_rows(df: &DataFrame, keys: &[&str]) -> Result<LazyFrame> {
    require_columns(df, keys)?;

    let mut lf = df.clone().lazy();
    if let Some(complete) = keys.iter().map(|key| col(*key).is_not_null()).reduce(|a, b| a.and(b)) {
        lf = lf.filter(complete);
    }

    let skipped = keys
        .iter()
        .map(|key| df.column(key).map(|c| c.null_count()))
        .collect::<PolarsResult<Vec<_>>>()?;
    if skipped.iter().any(|&count| count > 0) {
        warn!(keys = ?keys, "rows with a missing group key were left out");
    }

    let by: Vec<Expr> = keys.iter().map(|key| col(*key)).collect();
    Ok(lf.sort_by_exprs(by, SortMultipleOptions::default().with_maintain_order(true)))
}

pub(crate) fn grouped_means(df: &DataFrame, keys: &[&str], exclude: &[&str]) -> Result<DataFrame> {
    let mut excluded: Vec<&str> = exclude.to_vec();
    excluded.extend_from_slice(keys);
    let value_columns = numeric_columns(df, &excluded);

    let by: Vec<Expr> = keys.iter().map(|key| col(*key)).collect();
    let means: Vec<Expr> = value_columns
        .iter()
        .map(|name| col(name.as_str()).cast(DataType::Float64).mean())
        .collect();

    let averaged = keyed_rows(df, keys)?
        .group_by_stable(by)
        .agg(means)
        .collect()?;

    debug!(groups = averaged.height(), columns = value_columns.len(), "grouped means");
    Ok(averaged)
}

pub(crate) fn partition_by_keys(df: &DataFrame, keys: &[&str]) -> Result<Vec<(GroupKey, DataFrame)>> {
    let sorted = keyed_rows(df, keys)?.collect()?;
    let partitions = sorted.partition_by_stable(keys.iter().copied(), true)?;
    debug!(groups = partitions.len(), rows = sorted.height(), "partitioned rows");

    partitions
        .into_iter()
        .map(|part| {
            let parts = keys
                .iter()
                .map(|key| {
                    Ok(text_values(&part, key)?
                        .into_iter()
                        .next()
                        .flatten()
                        .unwrap_or_default())
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((GroupKey::new(parts), part))
        })
        .collect()
}
