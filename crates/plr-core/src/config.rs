//! Configuration types for the three pipelines
//!
//! Every constant the pipelines rely on lives here so that callers thread an
//! explicit configuration value through instead of mutating process state.

use crate::schema;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Flash protocol of the dataset being analysed
///
/// Selects the dependent-variable list; it is never inferred from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    /// Light (positive) flash protocol
    LightFlash,
    /// Dark (negative) flash protocol
    DarkFlash,
}

impl Protocol {
    /// Dependent variables measured under this protocol
    pub fn dependent_variables(&self) -> &'static [&'static str] {
        match self {
            Self::LightFlash => &schema::LIGHT_FLASH_DEPENDENTS,
            Self::DarkFlash => &schema::DARK_FLASH_DEPENDENTS,
        }
    }

    /// Get the name of this protocol
    pub fn name(&self) -> &'static str {
        match self {
            Self::LightFlash => "light flash",
            Self::DarkFlash => "dark flash",
        }
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Self::DarkFlash
    }
}

/// Formatting of tables written to the console and the text report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Digits after the decimal point for floating point cells
    pub float_precision: usize,
    /// Blank characters between columns
    pub column_spacing: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            float_precision: 6,
            column_spacing: 2,
        }
    }
}

/// Whether an append to the master file writes a header row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppendHeader {
    /// Never write a header
    Never,
    /// Write a header only when the master file does not exist yet
    IfMissing,
}

impl Default for AppendHeader {
    fn default() -> Self {
        Self::Never
    }
}

/// Settings of the per-subject averager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AveragerConfig {
    /// Cumulative CSV the averages are appended to
    pub master_file: PathBuf,
    pub header: AppendHeader,
}

impl Default for AveragerConfig {
    fn default() -> Self {
        Self {
            master_file: PathBuf::from("Averages_by_Measurement_Type_and_Pupil_Measured_tebs.csv"),
            header: AppendHeader::default(),
        }
    }
}

impl AveragerConfig {
    pub fn with_master_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.master_file = path.into();
        self
    }

    pub fn with_header(mut self, header: AppendHeader) -> Self {
        self.header = header;
        self
    }
}

/// Settings of the protocol/eye splitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Directory receiving one CSV per group, created on demand
    pub output_dir: PathBuf,
    /// Appended to `<MeasurementType>_<PupilMeasured>`
    pub file_suffix: String,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("tebs_neuroptics_output_files"),
            file_suffix: "_tebs.csv".to_string(),
        }
    }
}

impl SplitterConfig {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// File name for one (measurement type, pupil) group
    pub fn file_name(&self, measurement_type: &str, pupil: &str) -> String {
        format!("{measurement_type}_{pupil}{}", self.file_suffix)
    }
}

/// Subject group labels and how they are coalesced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupLabels {
    pub column: String,
    pub control: String,
    pub pregnant: String,
    /// Labels rewritten to `pregnant`
    pub merged: Vec<String>,
}

impl Default for GroupLabels {
    fn default() -> Self {
        Self {
            column: schema::GROUP.to_string(),
            control: schema::CONTROL.to_string(),
            pregnant: schema::PREGNANT.to_string(),
            merged: vec![schema::PREG_NORM.to_string(), schema::PREG_HYPER.to_string()],
        }
    }
}

impl GroupLabels {
    /// The two analysis groups, control first
    pub fn analysis_groups(&self) -> [&str; 2] {
        [self.control.as_str(), self.pregnant.as_str()]
    }
}

/// Settings of the group statistics pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub protocol: Protocol,
    /// Replaces the protocol's dependent variables when set
    pub dependent_variables: Option<Vec<String>>,
    pub covariates: Vec<String>,
    pub groups: GroupLabels,
    /// Threshold for both the normality gate and significance
    pub alpha: f64,
    pub display: DisplayOptions,
    /// Heatmap image size in pixels
    pub heatmap_size: (u32, u32),
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::default(),
            dependent_variables: None,
            covariates: schema::COVARIATES.iter().map(|c| c.to_string()).collect(),
            groups: GroupLabels::default(),
            alpha: 0.05,
            display: DisplayOptions::default(),
            heatmap_size: (1200, 1000),
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), protocol = config.protocol.name(), "loaded analysis config");
        Ok(config)
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_display(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }

    pub fn with_dependent_variables<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.dependent_variables = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Dependent variables in analysis order
    pub fn dependent_variables(&self) -> Vec<String> {
        match &self.dependent_variables {
            Some(names) => names.clone(),
            None => self
                .protocol
                .dependent_variables()
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    /// Dependent variables followed by covariates, the correlation matrix index
    pub fn correlation_variables(&self) -> Vec<String> {
        let mut names = self.dependent_variables();
        names.extend(self.covariates.iter().cloned());
        names
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "alpha {} must be in (0, 1)",
                self.alpha
            )));
        }
        if self.dependent_variables().is_empty() {
            return Err(Error::InvalidParameter(
                "at least one dependent variable is required".to_string(),
            ));
        }
        if self.groups.control == self.groups.pregnant {
            return Err(Error::InvalidParameter(
                "control and pregnant labels must differ".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_protocol_is_dark_flash() {
        let config = AnalysisConfig::default();
        assert_eq!(config.protocol, Protocol::DarkFlash);
        assert_eq!(config.dependent_variables().len(), 5);
        assert_eq!(config.correlation_variables().len(), 11);
        assert_eq!(config.correlation_variables()[5], "Age");
    }

    #[test]
    fn test_light_flash_selection() {
        let config = AnalysisConfig::default().with_protocol(Protocol::LightFlash);
        let dvs = config.dependent_variables();
        assert_eq!(dvs.len(), 8);
        assert!(dvs.contains(&"PLR_T75".to_string()));
    }

    #[test]
    fn test_explicit_dependent_variables_override_protocol() {
        let config = AnalysisConfig::default().with_dependent_variables(["Amplitude"]);
        assert_eq!(config.dependent_variables(), vec!["Amplitude".to_string()]);
    }

    #[test]
    fn test_validate_rejects_bad_alpha() {
        assert!(AnalysisConfig::default().with_alpha(0.0).validate().is_err());
        assert!(AnalysisConfig::default().with_alpha(1.5).validate().is_err());
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_splitter_file_name() {
        let config = SplitterConfig::default();
        assert_eq!(config.file_name("1", "Left"), "1_Left_tebs.csv");
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "protocol": "light_flash", "display": {{ "float_precision": 3 }} }}"#).unwrap();

        let config = AnalysisConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.protocol, Protocol::LightFlash);
        assert_eq!(config.display.float_precision, 3);
        assert_eq!(config.display.column_spacing, 2);
        assert_eq!(config.alpha, 0.05);
    }

    #[test]
    fn test_from_json_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "alpha": 2.0 }}"#).unwrap();
        assert!(matches!(
            AnalysisConfig::from_json_file(file.path()),
            Err(Error::InvalidParameter(_))
        ));
    }
}
