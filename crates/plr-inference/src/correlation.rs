//! Pearson correlation with significance, and correlation matrices

use crate::{Correlation, LabeledMatrix};
use plr_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::{debug, warn};

/// Pearson product-moment correlation and its two-sided p-value
///
/// The p-value comes from Student's t with `n - 2` degrees of freedom.
/// Missing values (`NaN`) anywhere in either input, or a constant input,
/// give an undefined (`NaN`) result rather than an error.
///
/// # Errors
/// Inputs of different length, or fewer than two observations.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation> {
    if x.len() != y.len() {
        return Err(Error::size_mismatch(x.len(), y.len(), "pearson correlation"));
    }

    let n = x.len();
    if n < 2 {
        return Err(Error::too_few(2, n));
    }

    if x.iter().chain(y.iter()).any(|v| v.is_nan()) {
        return Ok(Correlation::undefined(n));
    }

    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;

    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        warn!(n, "constant input, correlation is undefined");
        return Ok(Correlation::undefined(n));
    }

    let r = (numerator / denominator).clamp(-1.0, 1.0);
    let p_value = correlation_p_value(r, n)?;

    Ok(Correlation { r, p_value, n })
}

fn correlation_p_value(r: f64, n: usize) -> Result<f64> {
    if n == 2 {
        return Ok(1.0);
    }
    if r.abs() >= 1.0 {
        return Ok(0.0);
    }

    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| Error::Computation(e.to_string()))?;
    Ok((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

/// Coefficient and p-value matrices over a fixed list of variables
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub coefficients: LabeledMatrix,
    pub p_values: LabeledMatrix,
}

impl CorrelationMatrix {
    /// Compute every pairwise correlation of the given columns
    ///
    /// Only the upper triangle is computed; each cell is mirrored into the
    /// lower triangle. Diagonal cells are exactly 1.0 with p = 0 unless the
    /// column is undefined (missing values or constant).
    pub fn compute(columns: &[(String, Vec<f64>)]) -> Result<Self> {
        let names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();
        let mut coefficients = LabeledMatrix::new(names.clone());
        let mut p_values = LabeledMatrix::new(names);

        for i in 0..columns.len() {
            for j in i..columns.len() {
                let correlation = pearson(&columns[i].1, &columns[j].1)?;
                let (r, p) = if i == j && !correlation.r.is_nan() {
                    (1.0, 0.0)
                } else {
                    (correlation.r, correlation.p_value)
                };
                coefficients.set_symmetric(i, j, r);
                p_values.set_symmetric(i, j, p);
            }
        }

        debug!(variables = columns.len(), "computed correlation matrix");
        Ok(Self {
            coefficients,
            p_values,
        })
    }

    /// Display cells of the form `0.42 (p = 0.013)`
    pub fn combined_cells(&self) -> Vec<Vec<String>> {
        let n = self.coefficients.len();
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        format!(
                            "{:.2} (p = {:.3})",
                            self.coefficients.get(i, j),
                            self.p_values.get(i, j)
                        )
                    })
                    .collect()
            })
            .collect()
    }
}
