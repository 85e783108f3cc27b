//! Common test utilities for plr-polars tests

#![allow(dead_code)]

use polars::prelude::*;

/// Four readings, two (type, pupil) groups of two rows each
pub fn subject_readings() -> DataFrame {
    df![
        "Record ID" => [101i64, 102, 103, 104],
        "Device ID" => [7i64, 7, 7, 7],
        "Patient ID" => ["P01", "P01", "P01", "P01"],
        "MeasurementType" => [1i64, 1, 2, 2],
        "Pupil Measured" => ["Left", "Left", "Left", "Left"],
        "PLR Latency" => [0.20, 0.30, 0.25, 0.35],
        "Amplitude" => [1.0, 3.0, 2.0, 6.0],
    ]
    .unwrap()
}

/// Physiology dataset with the three raw group labels
pub fn labelled_groups() -> DataFrame {
    df![
        "Group" => [Some("Control"), Some("Preg Norm"), Some("Preg Hyper"), Some("Control"), Some("Preg Norm"), None],
        "Age" => [Some(30.0), Some(28.0), Some(35.0), None, Some(31.0), Some(40.0)],
    ]
    .unwrap()
}

/// Extract a single float cell
pub fn float_cell(df: &DataFrame, column: &str, row: usize) -> Option<f64> {
    df.column(column).unwrap().f64().unwrap().get(row)
}

/// Extract a single text cell
pub fn text_cell(df: &DataFrame, column: &str, row: usize) -> Option<String> {
    df.column(column)
        .unwrap()
        .str()
        .unwrap()
        .get(row)
        .map(|s| s.to_string())
}
