//! Shapiro-Wilk test for normality
//!
//! Royston's approximation (Applied Statistics algorithm AS R94, 1995) of the
//! Shapiro-Wilk coefficients and of the null distribution of W.

use crate::{NormalityResult, NormalityTest};
use plr_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use tracing::warn;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Largest sample the p-value approximation was fitted for
const MAX_ACCURATE_N: usize = 5000;

/// Evaluate `c[0] + c[1] x + c[2] x^2 + ...`
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// Shapiro-Wilk normality test
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapiroWilk;

impl ShapiroWilk {
    pub fn new() -> Self {
        Self
    }

    /// Coefficients `a` for a sample of size `n`, antisymmetric, ascending
    fn coefficients(n: usize, normal: &Normal) -> Vec<f64> {
        if n == 3 {
            return vec![-FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2];
        }

        let an = n as f64;
        let m: Vec<f64> = (1..=n)
            .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (an + 0.25)))
            .collect();

        let summ2: f64 = m.iter().map(|v| v * v).sum();
        let ssumm2 = summ2.sqrt();
        let rsn = 1.0 / an.sqrt();

        let last = m[n - 1];
        let a_n = poly(&C1, rsn) + last / ssumm2;

        let mut a = vec![0.0; n];
        a[n - 1] = a_n;
        a[0] = -a_n;

        if n > 5 {
            let second = m[n - 2];
            let a_n1 = poly(&C2, rsn) + second / ssumm2;
            let fac = ((summ2 - 2.0 * last * last - 2.0 * second * second)
                / (1.0 - 2.0 * a_n * a_n - 2.0 * a_n1 * a_n1))
                .sqrt();
            a[n - 2] = a_n1;
            a[1] = -a_n1;
            for i in 2..n - 2 {
                a[i] = m[i] / fac;
            }
        } else {
            let fac = ((summ2 - 2.0 * last * last) / (1.0 - 2.0 * a_n * a_n)).sqrt();
            for i in 1..n - 1 {
                a[i] = m[i] / fac;
            }
        }

        a
    }

    /// Upper-tail p-value of W under normality
    fn p_value(w: f64, n: usize, normal: &Normal) -> f64 {
        if n == 3 {
            let stqr = (0.75f64).sqrt().asin();
            return (6.0 / PI * (w.sqrt().asin() - stqr)).clamp(0.0, 1.0);
        }

        let an = n as f64;
        let y = (1.0 - w).ln();

        let (z, m, s) = if n <= 11 {
            let gamma = poly(&G, an);
            if y >= gamma {
                return 1e-99;
            }
            let y = -(gamma - y).ln();
            (y, poly(&C3, an), poly(&C4, an).exp())
        } else {
            let xx = an.ln();
            (y, poly(&C5, xx), poly(&C6, xx).exp())
        };

        1.0 - normal.cdf((z - m) / s)
    }
}

impl NormalityTest for ShapiroWilk {
    fn test(&self, sample: &[f64]) -> Result<NormalityResult> {
        let n = sample.len();
        if n < 3 {
            return Err(Error::too_few(3, n));
        }
        if sample.iter().any(|v| v.is_nan()) {
            return Ok(NormalityResult {
                statistic: f64::NAN,
                p_value: f64::NAN,
                n,
            });
        }
        if n > MAX_ACCURATE_N {
            warn!(n, "Shapiro-Wilk p-value may be inaccurate above {MAX_ACCURATE_N} samples");
        }

        let mut x = sample.to_vec();
        x.sort_by(|a, b| a.total_cmp(b));

        if x[n - 1] - x[0] <= f64::EPSILON * x[n - 1].abs().max(1.0) {
            return Err(Error::Computation(
                "Shapiro-Wilk is undefined for a sample with zero range".to_string(),
            ));
        }

        let normal = Normal::new(0.0, 1.0).map_err(|e| Error::Computation(e.to_string()))?;
        let a = Self::coefficients(n, &normal);

        let mean = x.iter().sum::<f64>() / n as f64;
        let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
        let numerator: f64 = a.iter().zip(x.iter()).map(|(ai, xi)| ai * xi).sum();
        let w = (numerator * numerator / ss).min(1.0);

        Ok(NormalityResult {
            statistic: w,
            p_value: Self::p_value(w, n, &normal),
            n,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_poly_matches_horner() {
        assert_eq!(poly(&[1.0, 2.0, 3.0], 2.0), 1.0 + 4.0 + 12.0);
        assert_eq!(poly(&G, 10.0), -2.273 + 4.59);
    }

    #[test]
    fn test_three_equally_spaced_points_are_perfectly_normal() {
        let result = ShapiroWilk::new().test(&[1.0, 2.0, 3.0]).unwrap();
        assert_abs_diff_eq!(result.statistic, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.p_value, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_coefficients_are_antisymmetric_and_unit_norm() {
        let normal = Normal::new(0.0, 1.0).unwrap();
        for n in [4usize, 5, 6, 11, 20, 50] {
            let a = ShapiroWilk::coefficients(n, &normal);
            for i in 0..n {
                assert_abs_diff_eq!(a[i], -a[n - 1 - i], epsilon = 1e-12);
            }
            let norm: f64 = a.iter().map(|v| v * v).sum();
            assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_statistic_in_unit_interval() {
        let sample = [2.1, 3.4, 1.9, 5.6, 4.4, 3.3, 2.8, 3.9, 4.1, 3.0, 2.5, 3.7];
        let result = ShapiroWilk::new().test(&sample).unwrap();
        assert!(result.statistic > 0.0 && result.statistic <= 1.0);
        assert!(result.p_value >= 0.0 && result.p_value <= 1.0);
    }

    #[test]
    fn test_outlier_rejects_normality() {
        let sample = [148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0];
        let result = ShapiroWilk::new().test(&sample).unwrap();
        assert_abs_diff_eq!(result.statistic, 0.78881, epsilon = 1e-4);
        assert_abs_diff_eq!(result.p_value, 0.006704, epsilon = 1e-4);
        assert!(!result.is_normal(0.05));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            ShapiroWilk::new().test(&[1.0, 2.0]),
            Err(Error::InsufficientData { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            ShapiroWilk::new().test(&[4.0, 4.0, 4.0, 4.0]),
            Err(Error::Computation(_))
        ));
    }

    #[test]
    fn test_nan_propagates() {
        let result = ShapiroWilk::new().test(&[1.0, 2.0, f64::NAN, 4.0]).unwrap();
        assert!(result.p_value.is_nan());
        assert!(!result.is_normal(0.05));
    }
}
