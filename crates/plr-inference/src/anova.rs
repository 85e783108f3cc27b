//! One-way analysis of variance

use crate::{GroupTest, TestKind, TestOutcome};
use plr_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use tracing::warn;

/// Upper-tail probability of the F distribution
pub(crate) fn f_survival(f: f64, df_num: f64, df_den: f64) -> Result<f64> {
    if f.is_nan() {
        return Ok(f64::NAN);
    }
    if f.is_infinite() {
        return Ok(0.0);
    }
    let dist = FisherSnedecor::new(df_num, df_den).map_err(|e| Error::Computation(e.to_string()))?;
    Ok((1.0 - dist.cdf(f)).clamp(0.0, 1.0))
}

/// Classical one-way ANOVA F-test
///
/// F = (SS_between / (k - 1)) / (SS_within / (N - k))
#[derive(Debug, Clone, Copy, Default)]
pub struct OneWayAnova;

impl OneWayAnova {
    pub fn new() -> Self {
        Self
    }
}

impl GroupTest for OneWayAnova {
    fn kind(&self) -> TestKind {
        TestKind::OneWayAnova
    }

    fn test(&self, groups: &[&[f64]]) -> Result<TestOutcome> {
        let k = groups.len();
        if k < 2 {
            return Err(Error::InvalidInput(
                "ANOVA requires at least two groups".to_string(),
            ));
        }
        if groups.iter().any(|g| g.is_empty()) {
            return Err(Error::empty_input("one-way ANOVA"));
        }

        let n_total: usize = groups.iter().map(|g| g.len()).sum();
        if n_total <= k {
            return Err(Error::too_few(k + 1, n_total));
        }

        if groups.iter().any(|g| g.iter().any(|v| v.is_nan())) {
            return Ok(TestOutcome::undefined(self.kind()));
        }

        let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n_total as f64;

        let mut ss_between = 0.0;
        let mut ss_within = 0.0;
        for group in groups {
            let mean = group.iter().sum::<f64>() / group.len() as f64;
            ss_between += group.len() as f64 * (mean - grand_mean).powi(2);
            ss_within += group.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        }

        let df_between = (k - 1) as f64;
        let df_within = (n_total - k) as f64;

        let f = if ss_within == 0.0 {
            if ss_between == 0.0 {
                warn!("all groups are constant and equal, F is undefined");
                f64::NAN
            } else {
                f64::INFINITY
            }
        } else {
            (ss_between / df_between) / (ss_within / df_within)
        };

        Ok(TestOutcome {
            kind: self.kind(),
            statistic: f,
            p_value: f_survival(f, df_between, df_within)?,
        })
    }
}
