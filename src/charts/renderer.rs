//! Static Chart Renderer
//! Renders the current chart to a PNG image with plotters.
//!
//! Layout follows the interactive chart: title on top, metric on the y-axis,
//! dashed series lines with filled points, legend along the bottom.

use super::config::{ChartConfig, XAxis, FILL_ALPHA};
use super::tooltip;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

pub const EXPORT_WIDTH: u32 = 1200;
pub const EXPORT_HEIGHT: u32 = 800;

/// Fraction of the data range added above and below the series.
const Y_PADDING: f64 = 0.05;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart into in-memory PNG bytes.
    pub fn render_png_bytes(
        config: &ChartConfig,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![255u8; (width * height * 3) as usize];
        Self::draw(config, &mut buffer, width, height)?;

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| RenderError::Draw("pixel buffer size mismatch".to_string()))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn render_to_file(
        config: &ChartConfig,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let bytes = Self::render_png_bytes(config, width, height)?;
        std::fs::write(path, bytes)?;
        tracing::info!(path = %path.display(), width, height, "Chart exported");
        Ok(())
    }

    fn draw(
        config: &ChartConfig,
        buffer: &mut [u8],
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let categorical = config.is_categorical();
        let (x_min, x_max) = Self::x_range(config);
        let (y_min, y_max) = Self::y_range(config);

        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err)?;

        let labels = match &config.x_axis {
            XAxis::Category { labels, .. } => labels.clone(),
            XAxis::Linear { .. } => Vec::new(),
        };
        let category_formatter = |x: &f64| tooltip::category_label(&labels, *x);

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(config.x_axis.label())
            .y_desc(config.y_label.as_str())
            .light_line_style(WHITE);
        if categorical {
            mesh.x_labels(labels.len().max(1))
                .x_label_formatter(&category_formatter);
        }
        mesh.draw().map_err(draw_err)?;

        for dataset in &config.datasets {
            let c = dataset.style.color;
            let color = RGBColor(c.r, c.g, c.b);
            let points: Vec<(f64, f64)> = dataset
                .positioned_points(categorical)
                .into_iter()
                .map(|[x, y]| (x, y))
                .collect();

            if dataset.style.show_line {
                chart
                    .draw_series(DashedLineSeries::new(
                        points.clone(),
                        dataset.style.border_dash as i32,
                        dataset.style.border_dash as i32,
                        color.stroke_width(1),
                    ))
                    .map_err(draw_err)?;
            }

            let radius = dataset.style.point_radius as i32;
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), radius, color.mix(FILL_ALPHA.into()).filled())),
                )
                .map_err(draw_err)?
                .label(dataset.label.as_str())
                .legend(move |(x, y)| Circle::new((x + 10, y), radius, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerMiddle)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Horizontal range covering the data and the suggested bounds.
    fn x_range(config: &ChartConfig) -> (f64, f64) {
        match &config.x_axis {
            XAxis::Category { labels, .. } => {
                let count = labels
                    .len()
                    .max(config.training().points.len())
                    .max(1);
                (-0.5, count as f64 - 0.5)
            }
            XAxis::Linear {
                suggested_min,
                suggested_max,
                ..
            } => {
                let xs = config
                    .datasets
                    .iter()
                    .flat_map(|d| d.points.iter().map(|p| p.x))
                    .chain(suggested_min.iter().copied())
                    .chain(suggested_max.iter().copied());
                Self::padded(xs, 0.0)
            }
        }
    }

    fn y_range(config: &ChartConfig) -> (f64, f64) {
        let ys = config
            .datasets
            .iter()
            .flat_map(|d| d.points.iter().map(|p| p.y));
        Self::padded(ys, Y_PADDING)
    }

    fn padded(values: impl Iterator<Item = f64>, padding: f64) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_infinite() {
            return (0.0, 1.0);
        }
        if (max - min).abs() < f64::EPSILON {
            return (min - 1.0, max + 1.0);
        }
        let pad = (max - min) * padding;
        (min - pad, max + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Point, Settings};

    fn config(x_label: &str, train: Vec<Point>) -> ChartConfig {
        let settings = Settings {
            metric: vec!["AUC".to_string()],
            x_label: vec![x_label.to_string()],
            min: vec![0.0],
            max: vec![10.0],
            labels: vec!["a".into(), "b".into(), "c".into()],
            show_line: true,
            ..Settings::default()
        };
        let mut config = ChartConfig::from_settings(&settings);
        config.datasets[0].points = train;
        config
    }

    const PNG_MAGIC: [u8; 4] = [137, 80, 78, 71];

    fn with_validation(mut cfg: ChartConfig) -> ChartConfig {
        let val = cfg.datasets[0]
            .points
            .iter()
            .map(|p| Point::new(p.x, p.y + 0.1))
            .collect();
        cfg.datasets[1].points = val;
        cfg
    }

    #[test]
    fn linear_chart_renders_png() {
        let cfg = with_validation(config(
            "Iteration",
            vec![Point::new(1.0, 0.6), Point::new(2.0, 0.7), Point::new(3.0, 0.75)],
        ));
        let bytes = StaticChartRenderer::render_png_bytes(&cfg, 400, 300).unwrap();
        assert_eq!(bytes[..4], PNG_MAGIC);
    }

    #[test]
    fn categorical_chart_renders_png() {
        let cfg = with_validation(config(
            "feature combination",
            vec![Point::new(1.0, 0.6), Point::new(2.0, 0.7)],
        ));
        let bytes = StaticChartRenderer::render_png_bytes(&cfg, 400, 300).unwrap();
        assert_eq!(bytes[..4], PNG_MAGIC);
    }

    #[test]
    fn render_to_file_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let cfg = config("Iteration", vec![Point::new(0.0, 1.0), Point::new(1.0, 0.5)]);
        StaticChartRenderer::render_to_file(&cfg, &path, 320, 240).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes[..4], PNG_MAGIC);
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (320, 240));
    }

    #[test]
    fn linear_range_includes_suggested_bounds() {
        let cfg = config("Iteration", vec![Point::new(2.0, 0.5), Point::new(4.0, 0.7)]);
        assert_eq!(StaticChartRenderer::x_range(&cfg), (0.0, 10.0));

        let cfg = config("Iteration", vec![Point::new(12.0, 0.5)]);
        assert_eq!(StaticChartRenderer::x_range(&cfg), (0.0, 12.0));
    }

    #[test]
    fn category_range_spans_all_labels() {
        let cfg = config("feature combination", vec![Point::new(1.0, 0.5)]);
        assert_eq!(StaticChartRenderer::x_range(&cfg), (-0.5, 2.5));
    }

    #[test]
    fn y_range_is_padded_and_never_empty() {
        let cfg = config("Iteration", vec![Point::new(0.0, 1.0), Point::new(1.0, 2.0)]);
        let (lo, hi) = StaticChartRenderer::y_range(&cfg);
        assert!((lo - 0.95).abs() < 1e-9);
        assert!((hi - 2.05).abs() < 1e-9);

        let cfg = config("Iteration", vec![]);
        assert_eq!(StaticChartRenderer::y_range(&cfg), (0.0, 1.0));

        let cfg = config("Iteration", vec![Point::new(0.0, 3.0)]);
        assert_eq!(StaticChartRenderer::y_range(&cfg), (2.0, 4.0));
    }
}
