//! Tests for schema checks, value extraction and label handling

mod common;

use common::{labelled_groups, subject_readings, text_cell};
use plr_polars::{Error, PlrFrameExt};
use polars::prelude::*;

#[test]
fn test_require_columns_names_every_missing_column() {
    let df = subject_readings();
    assert!(df.require_columns(&["MeasurementType", "Pupil Measured"]).is_ok());

    match df.require_columns(&["MeasurementType", "PLR T75", "BMI"]) {
        Err(Error::MissingColumns(missing)) => {
            assert_eq!(missing, vec!["PLR T75".to_string(), "BMI".to_string()]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

#[test]
fn test_numeric_columns_respect_exclusions() {
    let df = subject_readings();
    let numeric = df.numeric_columns(&["Record ID", "Device ID", "MeasurementType"]);
    assert_eq!(numeric, vec!["PLR Latency".to_string(), "Amplitude".to_string()]);
}

#[test]
fn test_float_values_map_missing_to_nan() {
    let df = df!["BMI" => [Some(22.5), None, Some(30.0)]].unwrap();
    let values = df.float_values("BMI").unwrap();
    assert_eq!(values[0], 22.5);
    assert!(values[1].is_nan());
    assert_eq!(values[2], 30.0);
}

#[test]
fn test_float_values_from_integers_and_text() {
    let df = df![
        "HR" => [70i64, 80],
        "Age" => ["31", "n/a"],
    ]
    .unwrap();
    assert_eq!(df.float_values("HR").unwrap(), vec![70.0, 80.0]);

    let ages = df.float_values("Age").unwrap();
    assert_eq!(ages[0], 31.0);
    assert!(ages[1].is_nan());
}

#[test]
fn test_unknown_column_is_reported() {
    let df = subject_readings();
    assert!(matches!(df.float_values("nonexistent"), Err(Error::InvalidColumn(_))));
    assert!(matches!(df.text_values("nonexistent"), Err(Error::InvalidColumn(_))));
}

#[test]
fn test_coalesce_labels_merges_pregnant_subgroups() {
    let df = labelled_groups();
    let coalesced = df
        .coalesce_labels("Group", &["Preg Norm", "Preg Hyper"], "Pregnant")
        .unwrap();

    assert_eq!(coalesced.height(), df.height());
    let counts = coalesced.label_counts("Group").unwrap();
    assert_eq!(counts.keys().cloned().collect::<Vec<_>>(), vec!["Control", "Pregnant"]);
    assert_eq!(counts["Pregnant"], 3);
    assert_eq!(counts["Control"], 2);
    assert_eq!(text_cell(&coalesced, "Group", 5), None);
}

#[test]
fn test_coalesce_passes_other_labels_through() {
    let df = df!["Group" => ["Control", "Postpartum", "Preg Norm"]].unwrap();
    let coalesced = df
        .coalesce_labels("Group", &["Preg Norm", "Preg Hyper"], "Pregnant")
        .unwrap();
    assert_eq!(text_cell(&coalesced, "Group", 1).as_deref(), Some("Postpartum"));
    assert_eq!(text_cell(&coalesced, "Group", 2).as_deref(), Some("Pregnant"));
}

#[test]
fn test_filter_label_and_drop_missing() {
    let df = labelled_groups();
    let control = df.filter_label("Group", "Control").unwrap();
    assert_eq!(control.height(), 2);

    let cleaned = control.drop_missing(&["Age"]).unwrap();
    assert_eq!(cleaned.height(), 1);
    assert_eq!(cleaned.float_values("Age").unwrap(), vec![30.0]);
}

#[test]
fn test_drop_missing_treats_nan_as_missing() {
    let df = df!["HR" => [70.0, f64::NAN, 65.0]].unwrap();
    assert_eq!(df.drop_missing(&["HR"]).unwrap().height(), 2);
}

#[test]
fn test_project_keeps_requested_order() {
    let df = subject_readings();
    let projected = df.project(&["Amplitude", "Patient ID", "MeasurementType"]).unwrap();
    let names: Vec<&str> = projected.get_column_names().into_iter().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["Amplitude", "Patient ID", "MeasurementType"]);
    assert_eq!(projected.height(), 4);

    assert!(matches!(
        df.project(&["Amplitude", "PLR T75"]),
        Err(Error::MissingColumns(missing)) if missing == vec!["PLR T75".to_string()]
    ));
}
