//! Result types shared by the inference procedures

use nalgebra::DMatrix;
use std::fmt;

/// Pearson correlation coefficient with its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub r: f64,
    pub p_value: f64,
    /// Number of paired observations
    pub n: usize,
}

impl Correlation {
    pub(crate) fn undefined(n: usize) -> Self {
        Self {
            r: f64::NAN,
            p_value: f64::NAN,
            n,
        }
    }
}

/// Outcome of a normality test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalityResult {
    /// Shapiro-Wilk W statistic
    pub statistic: f64,
    pub p_value: f64,
    pub n: usize,
}

impl NormalityResult {
    /// Whether the sample is consistent with normality at `alpha`
    ///
    /// A `NaN` p-value is never considered normal.
    pub fn is_normal(&self, alpha: f64) -> bool {
        self.p_value > alpha
    }
}

/// Hypothesis tests comparing groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    /// Parametric one-way analysis of variance
    OneWayAnova,
    /// Rank-based Kruskal-Wallis H-test
    KruskalWallis,
}

impl TestKind {
    /// Get the name of the test
    pub fn name(&self) -> &'static str {
        match self {
            Self::OneWayAnova => "One-way ANOVA",
            Self::KruskalWallis => "Kruskal-Wallis H-test",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Statistic and p-value of a group test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestOutcome {
    pub kind: TestKind,
    /// F for ANOVA, H for Kruskal-Wallis
    pub statistic: f64,
    pub p_value: f64,
}

impl TestOutcome {
    pub(crate) fn undefined(kind: TestKind) -> Self {
        Self {
            kind,
            statistic: f64::NAN,
            p_value: f64::NAN,
        }
    }
}

/// Square matrix indexed by the same ordered variable names on both axes
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    names: Vec<String>,
    values: DMatrix<f64>,
}

impl LabeledMatrix {
    /// Create a matrix filled with `NaN`
    pub fn new(names: Vec<String>) -> Self {
        let n = names.len();
        Self {
            names,
            values: DMatrix::from_element(n, n, f64::NAN),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    /// Look a cell up by variable names
    pub fn get_by_name(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.index_of(row)?;
        let j = self.index_of(col)?;
        Some(self.values[(i, j)])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Set a cell and its mirror
    pub fn set_symmetric(&mut self, row: usize, col: usize, value: f64) {
        self.values[(row, col)] = value;
        self.values[(col, row)] = value;
    }

    /// Symmetry check; `NaN` cells must be mirrored by `NaN`
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.len();
        (0..n).all(|i| {
            (0..n).all(|j| {
                let (a, b) = (self.values[(i, j)], self.values[(j, i)]);
                (a.is_nan() && b.is_nan()) || (a - b).abs() <= tolerance
            })
        })
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.values
    }
}
