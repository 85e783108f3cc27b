//! Normality-gated comparison of two groups
//!
//! Both samples are tested with Shapiro-Wilk. When both look normal the groups
//! are compared with a one-way ANOVA, otherwise with Kruskal-Wallis.

use crate::{
    GroupTest, KruskalWallis, NormalityResult, NormalityTest, OneWayAnova, ShapiroWilk, TestKind,
    TestOutcome,
};
use plr_core::{Error, Result};
use tracing::debug;

/// Result of comparing two groups
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupComparison {
    /// Normality of the first and second group
    pub normality: [NormalityResult; 2],
    pub outcome: TestOutcome,
    pub alpha: f64,
}

impl GroupComparison {
    pub fn test_kind(&self) -> TestKind {
        self.outcome.kind
    }

    pub fn p_value(&self) -> f64 {
        self.outcome.p_value
    }

    /// `p < alpha`; an undefined p-value is not significant
    pub fn is_significant(&self) -> bool {
        self.outcome.p_value < self.alpha
    }
}

/// Chooses between a parametric and a rank test per comparison
#[derive(Debug, Clone, Copy)]
pub struct NormalityGatedComparison {
    alpha: f64,
    normality: ShapiroWilk,
    parametric: OneWayAnova,
    rank: KruskalWallis,
}

impl Default for NormalityGatedComparison {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            normality: ShapiroWilk::new(),
            parametric: OneWayAnova::new(),
            rank: KruskalWallis::new(),
        }
    }
}

impl NormalityGatedComparison {
    /// Create a comparison using `alpha` for both the gate and significance
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(Error::InvalidParameter(format!("alpha {alpha} must be in (0, 1)")));
        }
        Ok(Self {
            alpha,
            ..Self::default()
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Test selected for the given normality results
    pub fn select(&self, first: &NormalityResult, second: &NormalityResult) -> TestKind {
        if first.is_normal(self.alpha) && second.is_normal(self.alpha) {
            TestKind::OneWayAnova
        } else {
            TestKind::KruskalWallis
        }
    }

    /// Compare two samples
    ///
    /// # Errors
    /// Propagates failures of the underlying tests on degenerate samples
    /// (fewer than three values, zero range, all values identical).
    pub fn compare(&self, first: &[f64], second: &[f64]) -> Result<GroupComparison> {
        let normality = [self.normality.test(first)?, self.normality.test(second)?];

        let groups: [&[f64]; 2] = [first, second];
        let outcome = match self.select(&normality[0], &normality[1]) {
            TestKind::OneWayAnova => self.parametric.test(&groups)?,
            TestKind::KruskalWallis => self.rank.test(&groups)?,
        };

        debug!(
            test = outcome.kind.name(),
            statistic = outcome.statistic,
            p_value = outcome.p_value,
            "compared groups"
        );

        Ok(GroupComparison {
            normality,
            outcome,
            alpha: self.alpha,
        })
    }
}
