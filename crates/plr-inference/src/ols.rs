//! Ordinary least squares with categorical factors, and type-II ANOVA tables
//!
//! Models are main-effects only: `response ~ factor + covariate + ...`.
//! Factors are treatment coded against their alphabetically first level.
//! Rows with a missing value in any referenced column are dropped before
//! fitting.

use crate::anova::f_survival;
use nalgebra::{DMatrix, DVector};
use plr_core::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Range;
use tracing::debug;

/// One right-hand-side term of a model formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Categorical variable, expanded to one indicator per non-reference level
    Factor(String),
    /// Continuous variable
    Covariate(String),
}

impl Term {
    pub fn name(&self) -> &str {
        match self {
            Self::Factor(name) | Self::Covariate(name) => name,
        }
    }
}

/// `response ~ term + term + ...` with an implicit intercept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFormula {
    pub response: String,
    pub terms: Vec<Term>,
}

impl ModelFormula {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            terms: Vec::new(),
        }
    }

    pub fn factor(mut self, name: impl Into<String>) -> Self {
        self.terms.push(Term::Factor(name.into()));
        self
    }

    pub fn covariate(mut self, name: impl Into<String>) -> Self {
        self.terms.push(Term::Covariate(name.into()));
        self
    }

    pub fn covariates<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.terms
            .extend(names.into_iter().map(|name| Term::Covariate(name.into())));
        self
    }
}

impl fmt::Display for ModelFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<&str> = self.terms.iter().map(Term::name).collect();
        write!(f, "{} ~ {}", self.response, terms.join(" + "))
    }
}

/// Named columns a model can reference
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    numeric: BTreeMap<String, Vec<f64>>,
    factors: BTreeMap<String, Vec<Option<String>>>,
    rows: Option<usize>,
}

impl ModelData {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_len(&mut self, name: &str, len: usize) -> Result<()> {
        match self.rows {
            Some(rows) if rows != len => Err(Error::size_mismatch(rows, len, name)),
            _ => {
                self.rows = Some(len);
                Ok(())
            }
        }
    }

    /// Add a continuous column; `NaN` marks a missing value
    pub fn with_numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        self.check_len(&name, values.len())?;
        self.numeric.insert(name, values);
        Ok(self)
    }

    /// Add a categorical column; `None` marks a missing value
    pub fn with_factor(mut self, name: impl Into<String>, labels: Vec<Option<String>>) -> Result<Self> {
        let name = name.into();
        self.check_len(&name, labels.len())?;
        self.factors.insert(name, labels);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.rows.unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn numeric(&self, name: &str) -> Result<&[f64]> {
        self.numeric
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::InvalidInput(format!("model references unknown numeric column {name}")))
    }

    fn factor(&self, name: &str) -> Result<&[Option<String>]> {
        self.factors
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::InvalidInput(format!("model references unknown factor {name}")))
    }
}

#[derive(Debug, Clone)]
struct TermColumns {
    name: String,
    columns: Range<usize>,
}

/// A fitted least-squares model
#[derive(Debug, Clone)]
pub struct OlsModel {
    formula: ModelFormula,
    column_names: Vec<String>,
    terms: Vec<TermColumns>,
    x: DMatrix<f64>,
    y: DVector<f64>,
    coefficients: DVector<f64>,
    rss: f64,
    rank: usize,
    dropped: usize,
}

/// Solve `min |y - X b|` by SVD; returns coefficients, RSS and rank
fn least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<(DVector<f64>, f64, usize)> {
    let svd = x.clone().svd(true, true);
    let tolerance = svd.singular_values.max() * (x.nrows().max(x.ncols()) as f64) * f64::EPSILON;
    let rank = svd.rank(tolerance);
    let coefficients = svd
        .solve(y, tolerance)
        .map_err(|e| Error::Computation(format!("least squares solve failed: {e}")))?;
    let residuals = y - x * &coefficients;
    Ok((coefficients, residuals.norm_squared(), rank))
}

impl OlsModel {
    /// Fit `formula` on `data` with listwise deletion of incomplete rows
    pub fn fit(formula: &ModelFormula, data: &ModelData) -> Result<Self> {
        let response = data.numeric(&formula.response)?;
        let mut keep: Vec<bool> = response.iter().map(|v| !v.is_nan()).collect();

        for term in &formula.terms {
            match term {
                Term::Covariate(name) => {
                    for (flag, v) in keep.iter_mut().zip(data.numeric(name)?) {
                        *flag &= !v.is_nan();
                    }
                }
                Term::Factor(name) => {
                    for (flag, label) in keep.iter_mut().zip(data.factor(name)?) {
                        *flag &= label.is_some();
                    }
                }
            }
        }

        let rows: Vec<usize> = (0..keep.len()).filter(|&i| keep[i]).collect();
        let dropped = keep.len() - rows.len();

        let mut columns: Vec<Vec<f64>> = vec![vec![1.0; rows.len()]];
        let mut column_names = vec!["Intercept".to_string()];
        let mut terms = Vec::with_capacity(formula.terms.len());

        for term in &formula.terms {
            let start = columns.len();
            match term {
                Term::Covariate(name) => {
                    let values = data.numeric(name)?;
                    columns.push(rows.iter().map(|&i| values[i]).collect());
                    column_names.push(name.clone());
                }
                Term::Factor(name) => {
                    let labels = data.factor(name)?;
                    let levels: BTreeSet<&str> = rows
                        .iter()
                        .filter_map(|&i| labels[i].as_deref())
                        .collect();
                    if levels.len() < 2 {
                        return Err(Error::InvalidInput(format!(
                            "factor {name} needs at least two levels among complete rows, found {}",
                            levels.len()
                        )));
                    }
                    for level in levels.iter().skip(1) {
                        columns.push(
                            rows.iter()
                                .map(|&i| if labels[i].as_deref() == Some(*level) { 1.0 } else { 0.0 })
                                .collect(),
                        );
                        column_names.push(format!("{name}[T.{level}]"));
                    }
                }
            }
            terms.push(TermColumns {
                name: term.name().to_string(),
                columns: start..columns.len(),
            });
        }

        let n_obs = rows.len();
        let p = columns.len();
        if n_obs <= p {
            return Err(Error::too_few(p + 1, n_obs));
        }

        let x = DMatrix::from_fn(n_obs, p, |i, j| columns[j][i]);
        let y = DVector::from_iterator(n_obs, rows.iter().map(|&i| response[i]));
        let (coefficients, rss, rank) = least_squares(&x, &y)?;

        debug!(formula = %formula, n_obs, dropped, rank, rss, "fitted OLS model");

        Ok(Self {
            formula: formula.clone(),
            column_names,
            terms,
            x,
            y,
            coefficients,
            rss,
            rank,
            dropped,
        })
    }

    pub fn formula(&self) -> &ModelFormula {
        &self.formula
    }

    /// Observations used in the fit
    pub fn n_obs(&self) -> usize {
        self.y.len()
    }

    /// Rows left out because a referenced value was missing
    pub fn n_dropped(&self) -> usize {
        self.dropped
    }

    /// Residual sum of squares
    pub fn rss(&self) -> f64 {
        self.rss
    }

    pub fn df_resid(&self) -> usize {
        self.n_obs() - self.rank
    }

    /// Coefficient per design column, intercept first
    pub fn coefficients(&self) -> Vec<(String, f64)> {
        self.column_names
            .iter()
            .cloned()
            .zip(self.coefficients.iter().copied())
            .collect()
    }

    pub fn r_squared(&self) -> f64 {
        let mean = self.y.mean();
        let tss: f64 = self.y.iter().map(|v| (v - mean).powi(2)).sum();
        1.0 - self.rss / tss
    }

    /// Type-II ANOVA table
    ///
    /// Each term's sum of squares is the increase in RSS when that term alone
    /// is removed from the model.
    pub fn anova_type2(&self) -> Result<AnovaTable> {
        let df_resid = self.df_resid() as f64;
        let mut rows = Vec::with_capacity(self.terms.len() + 1);

        for term in &self.terms {
            let kept: Vec<usize> = (0..self.x.ncols())
                .filter(|j| !term.columns.contains(j))
                .collect();
            let reduced = self.x.select_columns(kept.iter());
            let (_, rss_reduced, _) = least_squares(&reduced, &self.y)?;

            let sum_sq = (rss_reduced - self.rss).max(0.0);
            let df = term.columns.len() as f64;
            let f_value = if self.rss == 0.0 {
                if sum_sq > 0.0 { f64::INFINITY } else { f64::NAN }
            } else {
                (sum_sq / df) / (self.rss / df_resid)
            };

            rows.push(AnovaRow {
                term: term.name.clone(),
                sum_sq,
                df,
                f_value,
                p_value: f_survival(f_value, df, df_resid)?,
            });
        }

        rows.push(AnovaRow {
            term: "Residual".to_string(),
            sum_sq: self.rss,
            df: df_resid,
            f_value: f64::NAN,
            p_value: f64::NAN,
        });

        Ok(AnovaTable {
            rows,
            n_obs: self.n_obs(),
        })
    }
}

/// One line of an ANOVA table
#[derive(Debug, Clone, PartialEq)]
pub struct AnovaRow {
    pub term: String,
    pub sum_sq: f64,
    pub df: f64,
    /// `NaN` on the residual row
    pub f_value: f64,
    /// `NaN` on the residual row
    pub p_value: f64,
}

/// ANOVA table of a fitted model, residual row last
#[derive(Debug, Clone, PartialEq)]
pub struct AnovaTable {
    pub rows: Vec<AnovaRow>,
    pub n_obs: usize,
}

impl AnovaTable {
    /// Column headers as written to CSV
    pub const HEADERS: [&'static str; 4] = ["sum_sq", "df", "F", "PR(>F)"];

    pub fn row(&self, term: &str) -> Option<&AnovaRow> {
        self.rows.iter().find(|row| row.term == term)
    }

    pub fn residual(&self) -> Option<&AnovaRow> {
        self.rows.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroupTest, OneWayAnova};
    use approx::assert_abs_diff_eq;

    fn labels(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_formula_display() {
        let formula = ModelFormula::new("Amplitude")
            .factor("Group")
            .covariates(["Age", "BMI"]);
        assert_eq!(formula.to_string(), "Amplitude ~ Group + Age + BMI");
    }

    #[test]
    fn test_exact_linear_fit_recovers_coefficients() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let group = labels(&["Control", "Pregnant", "Control", "Pregnant", "Control", "Pregnant"]);
        // y = 1 + 2 x + 3 [Pregnant]
        let y: Vec<f64> = x
            .iter()
            .zip(group.iter())
            .map(|(xi, g)| 1.0 + 2.0 * xi + if g.as_deref() == Some("Pregnant") { 3.0 } else { 0.0 })
            .collect();

        let data = ModelData::new()
            .with_numeric("y", y).unwrap()
            .with_numeric("x", x).unwrap()
            .with_factor("Group", group).unwrap();
        let model = OlsModel::fit(&ModelFormula::new("y").factor("Group").covariate("x"), &data).unwrap();

        let coefs = model.coefficients();
        assert_eq!(coefs[0].0, "Intercept");
        assert_eq!(coefs[1].0, "Group[T.Pregnant]");
        assert_abs_diff_eq!(coefs[0].1, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(coefs[1].1, 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(coefs[2].1, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(model.rss(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_factor_only_model_matches_one_way_anova() {
        let a = [4.1, 5.3, 4.8, 5.9, 5.0];
        let b = [6.2, 5.8, 7.1, 6.6, 6.9, 7.4];

        let mut y = a.to_vec();
        y.extend_from_slice(&b);
        let mut group = vec![Some("Control".to_string()); a.len()];
        group.extend(vec![Some("Pregnant".to_string()); b.len()]);

        let data = ModelData::new()
            .with_numeric("y", y).unwrap()
            .with_factor("Group", group).unwrap();
        let model = OlsModel::fit(&ModelFormula::new("y").factor("Group"), &data).unwrap();
        let table = model.anova_type2().unwrap();

        let anova = OneWayAnova::new().test(&[&a, &b]).unwrap();
        let row = table.row("Group").unwrap();
        assert_abs_diff_eq!(row.f_value, anova.statistic, epsilon = 1e-9);
        assert_abs_diff_eq!(row.p_value, anova.p_value, epsilon = 1e-9);
        assert_eq!(row.df, 1.0);
        assert_eq!(table.residual().unwrap().df, 9.0);
        assert!(table.residual().unwrap().f_value.is_nan());
    }

    #[test]
    fn test_type2_sum_of_squares_is_drop_one_increase() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let y = vec![2.3, 2.9, 4.2, 4.8, 6.1, 6.4, 8.2, 8.5];
        let group = labels(&["A", "B", "A", "B", "A", "B", "A", "B"]);

        let data = ModelData::new()
            .with_numeric("y", y.clone()).unwrap()
            .with_numeric("x", x.clone()).unwrap()
            .with_factor("Group", group).unwrap();
        let full = OlsModel::fit(&ModelFormula::new("y").factor("Group").covariate("x"), &data).unwrap();
        let only_x = OlsModel::fit(&ModelFormula::new("y").covariate("x"), &data).unwrap();
        let only_group = OlsModel::fit(&ModelFormula::new("y").factor("Group"), &data).unwrap();

        let table = full.anova_type2().unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_abs_diff_eq!(table.row("Group").unwrap().sum_sq, only_x.rss() - full.rss(), epsilon = 1e-9);
        assert_abs_diff_eq!(table.row("x").unwrap().sum_sq, only_group.rss() - full.rss(), epsilon = 1e-9);
        assert_eq!(table.residual().unwrap().df, 5.0);
    }

    #[test]
    fn test_listwise_deletion() {
        let data = ModelData::new()
            .with_numeric("y", vec![1.0, 2.0, f64::NAN, 4.0, 5.0, 6.5, 7.0]).unwrap()
            .with_numeric("x", vec![1.0, 2.1, 3.0, f64::NAN, 5.0, 6.0, 7.2]).unwrap()
            .with_factor("Group", vec![
                Some("A".to_string()), Some("B".to_string()), Some("A".to_string()),
                Some("B".to_string()), None, Some("B".to_string()), Some("A".to_string()),
            ]).unwrap();

        let model = OlsModel::fit(&ModelFormula::new("y").factor("Group").covariate("x"), &data).unwrap();
        assert_eq!(model.n_obs(), 4);
        assert_eq!(model.n_dropped(), 3);
    }

    #[test]
    fn test_errors() {
        let data = ModelData::new()
            .with_numeric("y", vec![1.0, 2.0, 3.0]).unwrap()
            .with_factor("Group", labels(&["A", "A", "A"])).unwrap();

        assert!(OlsModel::fit(&ModelFormula::new("y").factor("Group"), &data).is_err());
        assert!(OlsModel::fit(&ModelFormula::new("y").covariate("missing"), &data).is_err());
        assert!(ModelData::new()
            .with_numeric("y", vec![1.0]).unwrap()
            .with_numeric("x", vec![1.0, 2.0])
            .is_err());
    }
}
