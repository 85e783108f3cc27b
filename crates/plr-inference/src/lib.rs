//! Statistical inference for PLR group comparisons
//!
//! - [`pearson`] and [`CorrelationMatrix`]: pairwise Pearson correlation with p-values
//! - [`ShapiroWilk`]: normality test used to gate the group comparison
//! - [`OneWayAnova`] and [`KruskalWallis`]: parametric and rank-based group tests
//! - [`NormalityGatedComparison`]: picks one of the two per variable
//! - [`OlsModel`]: least-squares fit with a type-II ANOVA table (ANCOVA)
//!
//! Missing values are `NaN`. A test that sees one returns a `NaN` statistic
//! and p-value; samples that are too small or have no spread are errors.

mod anova;
mod comparison;
mod correlation;
mod kruskal;
mod normality;
mod ols;
mod traits;
mod types;

pub use anova::OneWayAnova;
pub use comparison::{GroupComparison, NormalityGatedComparison};
pub use correlation::{pearson, CorrelationMatrix};
pub use kruskal::{average_ranks, KruskalWallis};
pub use normality::ShapiroWilk;
pub use ols::{AnovaRow, AnovaTable, ModelData, ModelFormula, OlsModel, Term};
pub use traits::{GroupTest, NormalityTest};
pub use types::{Correlation, LabeledMatrix, NormalityResult, TestKind, TestOutcome};
