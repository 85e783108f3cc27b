//! Kruskal-Wallis H-test

use crate::{GroupTest, TestKind, TestOutcome};
use plr_core::{Error, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Average ranks (1-based) of `values`, and the tie term `sum(t^3 - t)`
pub fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut ties = 0.0;
    let mut start = 0;

    while start < n {
        let mut end = start;
        while end + 1 < n && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = rank;
        }
        let t = (end - start + 1) as f64;
        ties += t * t * t - t;
        start = end + 1;
    }

    (ranks, ties)
}

/// Rank-based test that the groups come from the same distribution
///
/// H is corrected for ties and referred to a chi-squared distribution with
/// `k - 1` degrees of freedom.
#[derive(Debug, Clone, Copy, Default)]
pub struct KruskalWallis;

impl KruskalWallis {
    pub fn new() -> Self {
        Self
    }
}

impl GroupTest for KruskalWallis {
    fn kind(&self) -> TestKind {
        TestKind::KruskalWallis
    }

    fn test(&self, groups: &[&[f64]]) -> Result<TestOutcome> {
        let k = groups.len();
        if k < 2 {
            return Err(Error::InvalidInput(
                "Kruskal-Wallis requires at least two groups".to_string(),
            ));
        }
        if groups.iter().any(|g| g.is_empty()) {
            return Err(Error::empty_input("Kruskal-Wallis"));
        }
        if groups.iter().any(|g| g.iter().any(|v| v.is_nan())) {
            return Ok(TestOutcome::undefined(self.kind()));
        }

        let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
        let n = pooled.len() as f64;
        let (ranks, ties) = average_ranks(&pooled);

        let mut offset = 0;
        let mut rank_term = 0.0;
        for group in groups {
            let rank_sum: f64 = ranks[offset..offset + group.len()].iter().sum();
            rank_term += rank_sum * rank_sum / group.len() as f64;
            offset += group.len();
        }

        let correction = 1.0 - ties / (n * n * n - n);
        if correction <= 0.0 {
            return Err(Error::Computation(
                "Kruskal-Wallis is undefined when all numbers are identical".to_string(),
            ));
        }

        let h = (12.0 / (n * (n + 1.0)) * rank_term - 3.0 * (n + 1.0)) / correction;
        let dist = ChiSquared::new((k - 1) as f64).map_err(|e| Error::Computation(e.to_string()))?;

        Ok(TestOutcome {
            kind: self.kind(),
            statistic: h,
            p_value: (1.0 - dist.cdf(h.max(0.0))).clamp(0.0, 1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_average_ranks_with_ties() {
        let (ranks, ties) = average_ranks(&[10.0, 20.0, 10.0, 30.0]);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
        assert_eq!(ties, 6.0);
    }

    #[test]
    fn test_kruskal_reference_value() {
        // Ranks 1..3 vs 4..6: H = 12/42 * (36/3 + 225/3) - 21 = 3.857143
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let outcome = KruskalWallis::new().test(&[&a, &b]).unwrap();

        assert_eq!(outcome.kind, TestKind::KruskalWallis);
        assert_abs_diff_eq!(outcome.statistic, 3.857143, epsilon = 1e-6);
        assert_abs_diff_eq!(outcome.p_value, 0.049535, epsilon = 1e-5);
    }

    #[test]
    fn test_kruskal_tie_correction() {
        let a = [1.0, 1.0, 2.0];
        let b = [2.0, 3.0, 3.0];
        let outcome = KruskalWallis::new().test(&[&a, &b]).unwrap();
        // ranks 1.5 1.5 3.5 | 3.5 5.5 5.5, sums 6.5 and 14.5, ties 18
        let h = (12.0 / 42.0 * (6.5 * 6.5 / 3.0 + 14.5 * 14.5 / 3.0) - 21.0) / (1.0 - 18.0 / 210.0);
        assert_abs_diff_eq!(outcome.statistic, h, epsilon = 1e-12);
    }

    #[test]
    fn test_all_identical_is_an_error() {
        assert!(KruskalWallis::new().test(&[&[2.0, 2.0], &[2.0]]).is_err());
    }

    #[test]
    fn test_nan_propagates() {
        let outcome = KruskalWallis::new().test(&[&[1.0, f64::NAN], &[2.0, 3.0]]).unwrap();
        assert!(outcome.p_value.is_nan());
        assert!(outcome.statistic.is_nan());
    }
}
