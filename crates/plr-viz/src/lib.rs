//! Rendering of correlation matrices
//!
//! The group statistics pipeline talks to a [`MatrixVisualizer`]; the
//! [`HeatmapRenderer`] writes PNG heatmaps with plotters and the
//! [`NullMatrixVisualizer`] skips rendering entirely.

mod color;
mod heatmap;
mod visualizer;

pub use color::{coolwarm, MISSING_COLOR};
pub use heatmap::HeatmapRenderer;
pub use visualizer::{MatrixVisualizer, NullMatrixVisualizer};
