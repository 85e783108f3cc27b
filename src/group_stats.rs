//! Pregnant vs control group statistics on a merged physiology dataset
//!
//! Stages, in order:
//!
//! 1. coalesce the pregnant sub-labels into one `Pregnant` group
//! 2. Pearson correlation matrix of dependent variables and covariates, with
//!    control rows restricted to complete cases
//! 3. Shapiro-Wilk gated ANOVA or Kruskal-Wallis per dependent variable
//! 4. type-II ANCOVA per dependent variable, adjusting for the covariates
//! 5. correlation heatmap
//!
//! Everything is computed before the first artifact is written, and a failed
//! write removes what was already written, so a failure leaves no partial
//! output behind.

use crate::artifacts::{self, COMBINED_MATRIX, CORRELATION_MATRIX, HEATMAP, P_VALUES_MATRIX};
use crate::paths::{with_report_extension, PathProvider};
use crate::report::{format_float, Report, TextTable};
use crate::{Outcome, Result};
use plr_core::AnalysisConfig;
use plr_inference::{
    AnovaTable, CorrelationMatrix, GroupComparison, ModelData, ModelFormula,
    NormalityGatedComparison, OlsModel,
};
use plr_polars::{read_csv, PlrFrameExt};
use plr_viz::{HeatmapRenderer, MatrixVisualizer};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Group sizes after coalescing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoalesceSummary {
    /// Rows per label, analysis groups and unmapped labels alike
    pub counts: BTreeMap<String, usize>,
    /// Labels outside the two analysis groups
    pub unmapped: BTreeMap<String, usize>,
    /// Rows without a group label
    pub unlabelled: usize,
}

/// Comparison and ANCOVA results for one dependent variable
#[derive(Debug, Clone)]
pub struct DependentAnalysis {
    pub variable: String,
    pub comparison: GroupComparison,
    pub formula: ModelFormula,
    /// Rows used by the regression after listwise deletion
    pub n_obs: usize,
    pub n_dropped: usize,
    pub ancova: AnovaTable,
}

impl DependentAnalysis {
    /// `<dv>: Significant differences found (p = 0.012)` or the negative form
    pub fn verdict(&self) -> String {
        let finding = if self.comparison.is_significant() {
            "Significant differences found"
        } else {
            "No significant differences found"
        };
        format!(
            "{}: {finding} (p = {})",
            self.variable,
            format_float(self.comparison.p_value(), 3)
        )
    }
}

/// Everything the pipeline computed, plus the files it wrote
#[derive(Debug, Clone)]
pub struct GroupStatistics {
    pub coalescing: CoalesceSummary,
    pub correlation: CorrelationMatrix,
    /// Rows entering the correlation matrix
    pub correlation_rows: usize,
    pub dependents: Vec<DependentAnalysis>,
    pub artifacts: Vec<PathBuf>,
}

/// The group statistics pipeline over a chosen matrix visualizer
#[derive(Debug, Clone)]
pub struct GroupStatsPipeline<V = HeatmapRenderer> {
    config: AnalysisConfig,
    gate: NormalityGatedComparison,
    visualizer: V,
}

impl GroupStatsPipeline<HeatmapRenderer> {
    /// Pipeline rendering PNG heatmaps at the configured size
    pub fn with_heatmap(config: AnalysisConfig) -> Result<Self> {
        let (width, height) = config.heatmap_size;
        Self::new(config, HeatmapRenderer::new().with_size(width, height))
    }
}

impl<V: MatrixVisualizer> GroupStatsPipeline<V> {
    pub fn new(config: AnalysisConfig, visualizer: V) -> Result<Self> {
        config.validate()?;
        let gate = NormalityGatedComparison::new(config.alpha)?;
        Ok(Self {
            config,
            gate,
            visualizer,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Group column, dependent variables and covariates
    pub fn required_columns(&self) -> Vec<String> {
        let mut columns = vec![self.config.groups.column.clone()];
        columns.extend(self.config.correlation_variables());
        columns
    }

    /// Load `input` and check it has every column the analysis reads
    pub fn load(&self, input: &Path) -> Result<DataFrame> {
        let df = read_csv(input)?;
        let required = self.required_columns();
        let required: Vec<&str> = required.iter().map(String::as_str).collect();
        df.require_columns(&required)?;
        info!(path = %input.display(), rows = df.height(), "data loaded");
        Ok(df)
    }

    fn coalesce(&self, df: &DataFrame) -> Result<(DataFrame, CoalesceSummary)> {
        let labels = &self.config.groups;
        let merged: Vec<&str> = labels.merged.iter().map(String::as_str).collect();
        let coalesced = df.coalesce_labels(&labels.column, &merged, &labels.pregnant)?;

        let counts = coalesced.label_counts(&labels.column)?;
        let analysis = labels.analysis_groups();
        let unmapped: BTreeMap<String, usize> = counts
            .iter()
            .filter(|(label, _)| !analysis.contains(&label.as_str()))
            .map(|(label, count)| (label.clone(), *count))
            .collect();
        let unlabelled = coalesced.height() - counts.values().sum::<usize>();

        for (label, count) in &unmapped {
            warn!(label = %label, rows = count, "group label is neither control nor pregnant");
        }
        if unlabelled > 0 {
            warn!(rows = unlabelled, "rows without a group label");
        }

        Ok((
            coalesced,
            CoalesceSummary {
                counts,
                unmapped,
                unlabelled,
            },
        ))
    }

    /// Control rows with complete values, then every pregnant row
    fn correlation(&self, df: &DataFrame) -> Result<(CorrelationMatrix, usize)> {
        let labels = &self.config.groups;
        let variables = self.config.correlation_variables();
        let subset: Vec<&str> = variables.iter().map(String::as_str).collect();

        let control = df
            .filter_label(&labels.column, &labels.control)?
            .drop_missing(&subset)?;
        let pregnant = df.filter_label(&labels.column, &labels.pregnant)?;

        let mut columns = Vec::with_capacity(variables.len());
        for name in &variables {
            let mut values = control.float_values(name)?;
            values.extend(pregnant.float_values(name)?);
            columns.push((name.clone(), values));
        }

        let rows = control.height() + pregnant.height();
        debug!(control = control.height(), pregnant = pregnant.height(), "correlation rows");
        Ok((CorrelationMatrix::compute(&columns)?, rows))
    }

    fn analyze_dependent(&self, df: &DataFrame, variable: &str) -> Result<DependentAnalysis> {
        let labels = &self.config.groups;

        let control = df.filter_label(&labels.column, &labels.control)?.float_values(variable)?;
        let pregnant = df.filter_label(&labels.column, &labels.pregnant)?.float_values(variable)?;
        let comparison = self.gate.compare(&control, &pregnant)?;

        let mut data = ModelData::new()
            .with_numeric(variable, df.float_values(variable)?)?
            .with_factor(labels.column.as_str(), df.text_values(&labels.column)?)?;
        for covariate in &self.config.covariates {
            data = data.with_numeric(covariate.as_str(), df.float_values(covariate)?)?;
        }

        let formula = ModelFormula::new(variable)
            .factor(labels.column.as_str())
            .covariates(self.config.covariates.iter().cloned());
        let model = OlsModel::fit(&formula, &data)?;
        let ancova = model.anova_type2()?;

        info!(
            variable,
            test = comparison.test_kind().name(),
            p_value = comparison.p_value(),
            n_obs = model.n_obs(),
            "analysed dependent variable"
        );

        Ok(DependentAnalysis {
            variable: variable.to_string(),
            comparison,
            formula,
            n_obs: model.n_obs(),
            n_dropped: model.n_dropped(),
            ancova,
        })
    }

    /// Run every statistical stage on a loaded dataset
    #[instrument(skip_all, fields(rows = df.height(), protocol = self.config.protocol.name()))]
    pub fn analyze(&self, df: &DataFrame) -> Result<GroupStatistics> {
        let (coalesced, coalescing) = self.coalesce(df)?;
        let (correlation, correlation_rows) = self.correlation(&coalesced)?;

        let dependents = self
            .config
            .dependent_variables()
            .iter()
            .map(|variable| self.analyze_dependent(&coalesced, variable))
            .collect::<Result<Vec<_>>>()?;

        Ok(GroupStatistics {
            coalescing,
            correlation,
            correlation_rows,
            dependents,
            artifacts: Vec::new(),
        })
    }

    /// Write the heatmap and CSV artifacts next to `report_path`, then the report
    ///
    /// The heatmap is drawn first since it is the step most likely to fail.
    /// When any write fails, the artifacts already written are removed again.
    pub fn write_outputs(
        &self,
        input: &Path,
        stats: &mut GroupStatistics,
        report_path: &Path,
    ) -> Result<Report> {
        let dir = match report_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let report = self.build_report(input, stats);
        let mut written = Vec::new();
        if let Err(e) = self.write_artifacts(&dir, stats, &mut written) {
            remove_partial(&written);
            return Err(e);
        }
        if let Err(e) = report.write_to(report_path) {
            remove_partial(&written);
            return Err(e);
        }

        stats.artifacts.extend(written);
        info!(report = %report_path.display(), artifacts = stats.artifacts.len(), "results saved");
        Ok(report)
    }

    fn write_artifacts(
        &self,
        dir: &Path,
        stats: &GroupStatistics,
        written: &mut Vec<PathBuf>,
    ) -> Result<()> {
        if self.visualizer.is_enabled() {
            let heatmap = dir.join(HEATMAP);
            written.push(heatmap.clone());
            self.visualizer
                .render(&stats.correlation.coefficients, "Correlation Matrix", &heatmap)?;
        }

        let names = stats.correlation.coefficients.names().to_vec();
        let combined = stats.correlation.combined_cells();

        let path = dir.join(CORRELATION_MATRIX);
        written.push(path.clone());
        artifacts::write_matrix(&path, &stats.correlation.coefficients)?;

        let path = dir.join(P_VALUES_MATRIX);
        written.push(path.clone());
        artifacts::write_matrix(&path, &stats.correlation.p_values)?;

        let path = dir.join(COMBINED_MATRIX);
        written.push(path.clone());
        artifacts::write_cells(&path, &names, &combined)?;

        for dependent in &stats.dependents {
            let path = dir.join(artifacts::ancova_file_name(&dependent.variable));
            written.push(path.clone());
            artifacts::write_anova(&path, &dependent.ancova)?;
        }
        Ok(())
    }

    fn build_report(&self, input: &Path, stats: &GroupStatistics) -> Report {
        let display = &self.config.display;
        let mut report = Report::new(display);

        report.line(format!("Results for data from {}", input.display()));
        report.blank();

        report.line("Group sizes after coalescing:");
        for (label, count) in &stats.coalescing.counts {
            report.line(format!("  {label}: {count}"));
        }
        if !stats.coalescing.unmapped.is_empty() {
            let unmapped: Vec<String> = stats
                .coalescing
                .unmapped
                .iter()
                .map(|(label, count)| format!("{label} ({count})"))
                .collect();
            report.line(format!("  Unmapped group labels: {}", unmapped.join(", ")));
        }
        if stats.coalescing.unlabelled > 0 {
            report.line(format!("  Rows without a group label: {}", stats.coalescing.unlabelled));
        }

        report.blank();
        report.line("Correlation Matrix (with p-values):");
        report.line("Correlation Coefficients:");
        report.table(&TextTable::from_matrix(&stats.correlation.coefficients, display));
        report.blank();
        report.line("P-values:");
        report.table(&TextTable::from_matrix(&stats.correlation.p_values, display));
        report.line(format!("Correlation matrix saved as '{CORRELATION_MATRIX}'."));
        report.line(format!("P-values matrix saved as '{P_VALUES_MATRIX}'."));
        report.blank();
        report.line("Correlation Matrix with P-values:");
        report.table(&TextTable::from_cells(
            stats.correlation.coefficients.names(),
            stats.correlation.combined_cells(),
        ));
        if self.visualizer.is_enabled() {
            report.line(format!("Correlation heatmap saved as '{HEATMAP}'."));
        }

        for dependent in &stats.dependents {
            report.blank();
            report.line(format!("Comparing {} across groups", dependent.variable));
            report.line(format!("{}:", dependent.comparison.test_kind().name()));
            report.line(dependent.verdict());
        }

        for dependent in &stats.dependents {
            report.blank();
            report.line(format!("Controlling for covariates for {}", dependent.variable));
            report.line(format!("Model: {}", dependent.formula));
            report.line(format!(
                "Observations used: {} ({} dropped for missing values)",
                dependent.n_obs, dependent.n_dropped
            ));
            report.blank();
            report.line(format!("{} ANCOVA Table:", dependent.variable));
            report.table(&TextTable::from_anova(&dependent.ancova, display));
        }

        report.blank();
        report.line("Analysis complete.");
        report
    }

    /// Load, analyse and write everything for one input/report pair
    pub fn run(&self, input: &Path, report_path: &Path) -> Result<GroupStatistics> {
        let df = self.load(input)?;
        let mut stats = self.analyze(&df)?;
        self.write_outputs(input, &mut stats, report_path)?;
        Ok(stats)
    }
}

/// Remove artifacts of a failed run; files never created are skipped
fn remove_partial(paths: &[PathBuf]) {
    for path in paths.iter().filter(|path| path.exists()) {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "could not remove partial output");
        }
    }
}

/// Select the dataset, load it, select the report path, then analyse
pub fn run_group_stats<P: PathProvider, V: MatrixVisualizer>(
    paths: &mut P,
    pipeline: &GroupStatsPipeline<V>,
) -> Result<Outcome<GroupStatistics>> {
    let Some(input) = paths.select_input("Select the data file")? else {
        info!("no file selected");
        return Ok(Outcome::NoSelection);
    };
    let df = pipeline.load(&input)?;
    println!("Data loaded successfully from {}", input.display());

    let Some(report_path) = paths.select_report_output("Save results as")? else {
        info!("no output file selected");
        return Ok(Outcome::NoSelection);
    };
    let report_path = with_report_extension(report_path);

    let mut stats = pipeline.analyze(&df)?;
    pipeline.write_outputs(&input, &mut stats, &report_path)?;

    println!("Results and visualizations saved to {}", report_path.display());
    if let Some(dir) = report_path.parent() {
        println!("CSV files saved to {}", dir.display());
    }
    Ok(Outcome::Completed(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use plr_viz::NullMatrixVisualizer;

    fn pipeline() -> GroupStatsPipeline<NullMatrixVisualizer> {
        GroupStatsPipeline::new(
            AnalysisConfig::default().with_dependent_variables(["Amplitude"]),
            NullMatrixVisualizer,
        )
        .unwrap()
    }

    #[test]
    fn test_required_columns() {
        let columns = pipeline().required_columns();
        assert_eq!(columns[0], "Group");
        assert_eq!(columns[1], "Amplitude");
        assert_eq!(columns.len(), 8);
    }

    #[test]
    fn test_coalesce_reports_unmapped_labels() {
        let df = df![
            "Group" => [Some("Control"), Some("Preg Norm"), Some("Preg Hyper"), Some("Postnatal"), None],
        ]
        .unwrap();
        let (coalesced, summary) = pipeline().coalesce(&df).unwrap();

        assert_eq!(coalesced.height(), 5);
        assert_eq!(summary.counts.get("Pregnant"), Some(&2));
        assert_eq!(summary.counts.get("Control"), Some(&1));
        assert_eq!(summary.unmapped.get("Postnatal"), Some(&1));
        assert_eq!(summary.unlabelled, 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AnalysisConfig::default().with_alpha(2.0);
        assert!(GroupStatsPipeline::new(config, NullMatrixVisualizer).is_err());
    }
}
