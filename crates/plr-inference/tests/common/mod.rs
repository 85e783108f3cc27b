//! Common test utilities for plr-inference tests

#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use statrs::distribution::{ContinuousCDF, Normal as StdNormal};

/// Expected normal order statistics scaled to `mean` and `sd`
///
/// A sample that is as normal as a finite sample can be, so normality tests
/// accept it deterministically.
pub fn normal_scores(n: usize, mean: f64, sd: f64) -> Vec<f64> {
    let normal = StdNormal::new(0.0, 1.0).unwrap();
    (1..=n)
        .map(|i| mean + sd * normal.inverse_cdf((i as f64 - 0.375) / (n as f64 + 0.25)))
        .collect()
}

/// Exponential quantiles, strongly right-skewed
pub fn exponential_scores(n: usize, scale: f64) -> Vec<f64> {
    (1..=n)
        .map(|i| -scale * (1.0 - (i as f64 - 0.5) / n as f64).ln())
        .collect()
}

/// Seeded normal draws
pub fn seeded_normal(n: usize, mean: f64, sd: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let normal = Normal::new(mean, sd).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

/// Named columns of seeded normal draws, each partly driven by the first
pub fn correlated_columns(names: &[&str], rows: usize, seed: u64) -> Vec<(String, Vec<f64>)> {
    let base = seeded_normal(rows, 0.0, 1.0, seed);
    names
        .iter()
        .enumerate()
        .map(|(k, name)| {
            let noise = seeded_normal(rows, 0.0, 1.0, seed + 1 + k as u64);
            let weight = k as f64 / names.len() as f64;
            let values = base
                .iter()
                .zip(noise.iter())
                .map(|(b, e)| weight * b + (1.0 - weight) * e)
                .collect();
            (name.to_string(), values)
        })
        .collect()
}
