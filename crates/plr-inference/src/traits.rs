//! Traits for hypothesis tests

use crate::{NormalityResult, TestKind, TestOutcome};
use plr_core::Result;

/// A test for differences between two or more independent groups
pub trait GroupTest {
    /// Which test this is
    fn kind(&self) -> TestKind;

    /// Run the test
    ///
    /// Any `NaN` in any group yields an outcome with `NaN` statistic and
    /// p-value rather than an error.
    fn test(&self, groups: &[&[f64]]) -> Result<TestOutcome>;
}

/// A test of the null hypothesis that a sample is normally distributed
pub trait NormalityTest {
    fn test(&self, sample: &[f64]) -> Result<NormalityResult>;
}
