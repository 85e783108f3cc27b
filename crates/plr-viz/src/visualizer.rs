//! Visualization interface for correlation matrices

use plr_core::Result;
use plr_inference::LabeledMatrix;
use std::path::Path;

/// Renders a labelled matrix to an image file
pub trait MatrixVisualizer {
    /// Render `matrix` under `title` and write it to `path`
    fn render(&self, matrix: &LabeledMatrix, title: &str, path: &Path) -> Result<()>;

    /// Check if this visualizer actually produces output
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Null visualizer that does nothing (for when rendering is disabled)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMatrixVisualizer;

impl MatrixVisualizer for NullMatrixVisualizer {
    fn render(&self, _matrix: &LabeledMatrix, _title: &str, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

impl<V: MatrixVisualizer + ?Sized> MatrixVisualizer for &V {
    fn render(&self, matrix: &LabeledMatrix, title: &str, path: &Path) -> Result<()> {
        (**self).render(matrix, title, path)
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}
