//! Common test utilities for pupil-stats tests

#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::fs;
use std::path::{Path, PathBuf};

/// Write `contents` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// One subject, two measurement types on the left eye, three readings each
pub const SUBJECT_CSV: &str = "\
Record ID,Device ID,Patient ID,Time,MeasurementType,Pupil Measured,PLR Latency,Amplitude
101,7,P01,09:00:01,1,Left,0.20,1.0
102,7,P01,09:00:31,1,Left,0.30,2.0
103,7,P01,09:01:01,1,Left,0.25,
104,7,P01,09:05:01,2,Left,0.40,4.0
105,7,P01,09:05:31,2,Left,0.50,6.0
106,7,P01,09:06:01,2,Left,0.45,8.0
";

/// Two readings per measurement type with a filled `PLR T75`
pub const SUBJECT_CSV_WITH_T75: &str = "\
Record ID,Patient ID,MeasurementType,Pupil Measured,PLR Latency,PLR T75,Amplitude
201,P02,1,Left,0.20,1.8,1.0
202,P02,1,Left,0.30,2.0,2.0
203,P02,2,Left,0.40,2.6,4.0
204,P02,2,Left,0.50,2.8,6.0
";

/// Same layout with every `PLR T75` cell empty
pub const SUBJECT_CSV_BLANK_T75: &str = "\
Record ID,Patient ID,MeasurementType,Pupil Measured,PLR Latency,PLR T75,Amplitude
301,P03,1,Left,0.20,,1.0
302,P03,1,Left,0.30,,2.0
303,P03,2,Left,0.40,,4.0
304,P03,2,Left,0.50,,6.0
";

/// Combined export: three (type, pupil) groups plus columns the splitter drops
pub const EXPORT_CSV: &str = "\
Record ID,Patient ID,MeasurementType,Pupil Measured,PLR Diameter Init,PLR Diameter End,PLR Latency,PLR Constriction Velocity,PLR Max Constriction Velocity,PLR Dilation Velocity,PLR T75,Amplitude,Device ID
1,P01,1,Left,5.1,3.9,0.22,2.9,4.1,1.1,1.9,1.2,7
2,P01,1,Right,5.0,3.8,0.23,3.0,4.0,1.2,2.0,1.2,7
3,P02,1,Left,4.8,3.5,0.21,3.1,4.3,1.0,1.8,1.3,7
4,P01,2,Left,6.2,5.9,0.30,0.8,1.1,0.9,2.5,0.3,7
5,P02,2,Left,6.0,5.6,0.31,0.9,1.2,1.0,2.6,0.4,7
";

/// Column names of the merged physiology dataset in file order
pub const PHYSIO_HEADER: [&str; 13] = [
    "Patient ID",
    "Group",
    "PLR_Diameter_Init",
    "PLR_Diameter_End",
    "PLR_Latency",
    "PLR_Dilation_Velocity",
    "Amplitude",
    "Age",
    "BMI",
    "PostpartumMonths",
    "BPsys",
    "BPdia",
    "HR",
];

fn cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{value:.4}")
    }
}

/// Merged dark-flash split file: 12 controls, 8 `Preg Norm` and 6 `Preg Hyper`
///
/// Two controls lack `PostpartumMonths` and one pregnant subject lacks `BMI`.
pub fn physiology_csv(seed: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let mut draw = |mean: f64, sd: f64| mean + sd * noise.sample(&mut rng);

    let mut lines = vec![PHYSIO_HEADER.join(",")];
    let labels = std::iter::repeat("Control")
        .take(12)
        .chain(std::iter::repeat("Preg Norm").take(8))
        .chain(std::iter::repeat("Preg Hyper").take(6));

    for (i, label) in labels.enumerate() {
        let pregnant = label != "Control";
        let shift = if pregnant { 0.4 } else { 0.0 };

        let age = draw(31.0, 4.0);
        let bmi = if i == 15 { f64::NAN } else { draw(24.0, 3.0) };
        let postpartum = if i == 3 || i == 7 { f64::NAN } else { draw(6.0, 2.0) };
        let bp_sys = draw(118.0, 9.0);
        let bp_dia = draw(76.0, 6.0);
        let hr = draw(72.0, 7.0);

        let diameter_init = draw(5.5 + shift, 0.5);
        let diameter_end = diameter_init - draw(1.4, 0.2);
        let latency = draw(0.24, 0.02);
        let dilation = draw(1.1 - shift / 2.0, 0.15);
        let amplitude = diameter_init - diameter_end;

        let row = [
            format!("S{i:02}"),
            label.to_string(),
            cell(diameter_init),
            cell(diameter_end),
            cell(latency),
            cell(dilation),
            cell(amplitude),
            cell(age),
            cell(bmi),
            cell(postpartum),
            cell(bp_sys),
            cell(bp_dia),
            cell(hr),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n") + "\n"
}

/// Number of lines in a text file
pub fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}
