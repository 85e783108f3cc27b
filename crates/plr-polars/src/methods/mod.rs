//! `PlrFrameExt` implementation for `DataFrame`

mod columns;
mod grouping;
mod labels;

use crate::{GroupKey, PlrFrameExt, Result};
use polars::prelude::*;
use std::collections::BTreeMap;

#[cfg(test)]
pub(crate) use columns::holds_numbers;

impl PlrFrameExt for DataFrame {
    fn require_columns(&self, names: &[&str]) -> Result<()> {
        columns::require_columns(self, names)
    }

    fn project(&self, names: &[&str]) -> Result<DataFrame> {
        columns::project(self, names)
    }

    fn numeric_columns(&self, exclude: &[&str]) -> Vec<String> {
        columns::numeric_columns(self, exclude)
    }

    fn float_values(&self, column: &str) -> Result<Vec<f64>> {
        columns::float_values(self, column)
    }

    fn text_values(&self, column: &str) -> Result<Vec<Option<String>>> {
        columns::text_values(self, column)
    }

    fn grouped_means(&self, keys: &[&str], exclude: &[&str]) -> Result<DataFrame> {
        grouping::grouped_means(self, keys, exclude)
    }

    fn partition_by_keys(&self, keys: &[&str]) -> Result<Vec<(GroupKey, DataFrame)>> {
        grouping::partition_by_keys(self, keys)
    }

    fn coalesce_labels(&self, column: &str, merged: &[&str], into: &str) -> Result<DataFrame> {
        labels::coalesce_labels(self, column, merged, into)
    }

    fn label_counts(&self, column: &str) -> Result<BTreeMap<String, usize>> {
        labels::label_counts(self, column)
    }

    fn filter_label(&self, column: &str, label: &str) -> Result<DataFrame> {
        labels::filter_label(self, column, label)
    }

    fn drop_missing(&self, subset: &[&str]) -> Result<DataFrame> {
        labels::drop_missing(self, subset)
    }
}
