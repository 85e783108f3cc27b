//! Extension trait for PLR processing on Polars DataFrames

use crate::{GroupKey, Result};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Extension trait with the table operations the PLR pipelines need
pub trait PlrFrameExt {
    /// Check that every named column exists
    ///
    /// # Returns
    /// `Error::MissingColumns` naming every absent column, in the order given
    fn require_columns(&self, columns: &[&str]) -> Result<()>;

    /// Exactly the named columns, in the order given
    ///
    /// Fails like [`require_columns`](Self::require_columns) when any is absent.
    fn project(&self, columns: &[&str]) -> Result<DataFrame>;

    /// Names of integer and float columns, in frame order
    ///
    /// A column without a single value counts as numeric.
    ///
    /// # Arguments
    /// * `exclude` - Columns left out even when numeric
    fn numeric_columns(&self, exclude: &[&str]) -> Vec<String>;

    /// Column values as `f64`, with missing or unparsable cells as `NaN`
    fn float_values(&self, column: &str) -> Result<Vec<f64>>;

    /// Column values rendered as text, `None` for missing cells
    fn text_values(&self, column: &str) -> Result<Vec<Option<String>>>;

    /// Mean of every numeric column per group
    ///
    /// # Arguments
    /// * `keys` - Grouping columns, emitted first with their input types
    /// * `exclude` - Columns never averaged (the keys are always excluded)
    ///
    /// # Returns
    /// One row per group in ascending key order; rows with a missing key
    /// are left out. Means skip missing values, an all-missing group yields
    /// a null.
    fn grouped_means(&self, keys: &[&str], exclude: &[&str]) -> Result<DataFrame>;

    /// Split into one frame per group, in ascending key order
    ///
    /// Rows keep their input order; rows with a missing key are left out.
    fn partition_by_keys(&self, keys: &[&str]) -> Result<Vec<(GroupKey, DataFrame)>>;

    /// Rewrite the `merged` labels of a text column to `into`
    ///
    /// Other labels, and missing cells, pass through unchanged.
    fn coalesce_labels(&self, column: &str, merged: &[&str], into: &str) -> Result<DataFrame>;

    /// Row count per distinct label; missing cells are not counted
    fn label_counts(&self, column: &str) -> Result<BTreeMap<String, usize>>;

    /// Rows whose label equals `label`
    fn filter_label(&self, column: &str, label: &str) -> Result<DataFrame>;

    /// Rows with no missing value in any of `subset`
    fn drop_missing(&self, subset: &[&str]) -> Result<DataFrame>;
}
