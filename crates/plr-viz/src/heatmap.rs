//! PNG heatmap of a correlation matrix

use crate::color::coolwarm;
use crate::MatrixVisualizer;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plr_core::{Error, Result};
use plr_inference::LabeledMatrix;
use std::fmt::Display;
use std::path::Path;
use tracing::{debug, instrument};

const COLOR_BAR_WIDTH: u32 = 110;
const COLOR_BAR_STEPS: usize = 100;

fn draw_error<E: Display>(e: E) -> Error {
    Error::Visualization(e.to_string())
}

/// Annotated heatmap on a diverging blue-red scale fixed to [-1, 1]
#[derive(Debug, Clone)]
pub struct HeatmapRenderer {
    size: (u32, u32),
    decimals: usize,
    font: String,
}

impl Default for HeatmapRenderer {
    fn default() -> Self {
        Self {
            size: (1200, 1000),
            decimals: 2,
            font: "sans-serif".to_string(),
        }
    }
}

impl HeatmapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image size in pixels
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Decimals of the per-cell annotation
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    fn annotation(&self, value: f64) -> String {
        if value.is_nan() {
            String::new()
        } else {
            format!("{:.*}", self.decimals, value)
        }
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, plotters::coord::Shift>,
        matrix: &LabeledMatrix,
        title: &str,
    ) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE).map_err(draw_error)?;
        let (width, _) = root.dim_in_pixel();
        let (grid_area, bar_area) =
            root.split_horizontally(width.saturating_sub(COLOR_BAR_WIDTH));

        let n = matrix.len() as i32;
        let names = matrix.names();
        let label = |i: &i32| names.get(*i as usize).cloned().unwrap_or_default();

        let mut chart = ChartBuilder::on(&grid_area)
            .caption(title, (self.font.as_str(), 28))
            .margin(10)
            .x_label_area_size(160)
            .y_label_area_size(160)
            .build_cartesian_2d(0i32..n, n..0i32)
            .map_err(draw_error)?;

        let (plot_w, plot_h) = chart.plotting_area().dim_in_pixel();
        let cell_w = plot_w as i32 / n.max(1);
        let cell_h = plot_h as i32 / n.max(1);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(n as usize)
            .y_labels(n as usize)
            .x_label_offset(cell_w / 2)
            .y_label_offset(-cell_h / 2)
            .x_label_formatter(&label)
            .y_label_formatter(&label)
            .x_label_style(
                TextStyle::from((self.font.as_str(), 14).into_font())
                    .transform(FontTransform::Rotate90),
            )
            .label_style((self.font.as_str(), 14))
            .draw()
            .map_err(draw_error)?;

        let cells: Vec<(i32, i32, f64)> = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| (i, j, matrix.get(i as usize, j as usize)))
            .collect();

        chart
            .draw_series(cells.iter().map(|&(i, j, v)| {
                Rectangle::new([(j, i), (j + 1, i + 1)], coolwarm(v).filled())
            }))
            .map_err(draw_error)?;

        let text_style = TextStyle::from((self.font.as_str(), 13).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart
            .draw_series(cells.iter().map(|&(i, j, v)| {
                let color = if v.abs() > 0.6 { &WHITE } else { &BLACK };
                EmptyElement::at((j, i))
                    + Text::new(
                        self.annotation(v),
                        (cell_w / 2, cell_h / 2),
                        text_style.color(color),
                    )
            }))
            .map_err(draw_error)?;

        self.draw_color_bar(&bar_area)?;
        Ok(())
    }

    fn draw_color_bar<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, plotters::coord::Shift>,
    ) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        let mut bar = ChartBuilder::on(area)
            .margin_top(60)
            .margin_bottom(170)
            .margin_right(20)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0f64..1.0, -1.0f64..1.0)
            .map_err(draw_error)?;

        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .y_label_formatter(&|v: &f64| format!("{v:.1}"))
            .label_style((self.font.as_str(), 12))
            .draw()
            .map_err(draw_error)?;

        let step = 2.0 / COLOR_BAR_STEPS as f64;
        bar.draw_series((0..COLOR_BAR_STEPS).map(|k| {
            let low = -1.0 + k as f64 * step;
            Rectangle::new([(0.0, low), (1.0, low + step)], coolwarm(low + step / 2.0).filled())
        }))
        .map_err(draw_error)?;

        Ok(())
    }
}

impl MatrixVisualizer for HeatmapRenderer {
    #[instrument(skip(self, matrix), fields(variables = matrix.len()))]
    fn render(&self, matrix: &LabeledMatrix, title: &str, path: &Path) -> Result<()> {
        if matrix.is_empty() {
            return Err(Error::InvalidInput("cannot render an empty matrix".to_string()));
        }

        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        self.draw(&root, matrix, title)?;
        root.present().map_err(draw_error)?;

        debug!(path = %path.display(), "wrote heatmap");
        Ok(())
    }
}
