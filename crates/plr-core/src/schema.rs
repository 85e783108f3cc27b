//! Column names of the pupillometer export and the merged physiology dataset

/// Protocol (flash stimulus) column
pub const MEASUREMENT_TYPE: &str = "MeasurementType";
/// Eye column
pub const PUPIL_MEASURED: &str = "Pupil Measured";
pub const PATIENT_ID: &str = "Patient ID";
pub const RECORD_ID: &str = "Record ID";
pub const DEVICE_ID: &str = "Device ID";
pub const TIME: &str = "Time";

/// Key shared by the averager and the splitter, in grouping order
pub const GROUP_KEYS: [&str; 2] = [MEASUREMENT_TYPE, PUPIL_MEASURED];

/// Columns that are never averaged even when they parse as numbers
pub const AVERAGE_DENYLIST: [&str; 5] = [
    RECORD_ID,
    DEVICE_ID,
    TIME,
    PUPIL_MEASURED,
    MEASUREMENT_TYPE,
];

/// Columns kept in every split file, in output order
pub const SPLIT_COLUMNS: [&str; 11] = [
    MEASUREMENT_TYPE,
    PUPIL_MEASURED,
    PATIENT_ID,
    "PLR Diameter Init",
    "PLR Diameter End",
    "PLR Latency",
    "PLR Constriction Velocity",
    "PLR Max Constriction Velocity",
    "PLR Dilation Velocity",
    "PLR T75",
    "Amplitude",
];

/// Subject group column of the physiology dataset
pub const GROUP: &str = "Group";
pub const CONTROL: &str = "Control";
pub const PREGNANT: &str = "Pregnant";
pub const PREG_NORM: &str = "Preg Norm";
pub const PREG_HYPER: &str = "Preg Hyper";

/// Physiology covariates adjusted for in every model
pub const COVARIATES: [&str; 6] = ["Age", "BMI", "PostpartumMonths", "BPsys", "BPdia", "HR"];

/// Dependent variables analysed for the light flash protocol
pub const LIGHT_FLASH_DEPENDENTS: [&str; 8] = [
    "PLR_Diameter_Init",
    "PLR_Diameter_End",
    "PLR_Latency",
    "PLR_Constriction_Velocity",
    "PLR_Max_Constriction_Velocity",
    "PLR_Dilation_Velocity",
    "PLR_T75",
    "Amplitude",
];

/// Dependent variables analysed for the dark flash protocol
pub const DARK_FLASH_DEPENDENTS: [&str; 5] = [
    "PLR_Diameter_Init",
    "PLR_Diameter_End",
    "PLR_Latency",
    "PLR_Dilation_Velocity",
    "Amplitude",
];
