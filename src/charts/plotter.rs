//! Chart Plotter Module
//! Draws the live line chart using egui_plot.

use super::config::{ChartConfig, SeriesColor, XAxis, FILL_ALPHA};
use super::tooltip::{self, Tooltip};
use crate::data::Data;
use egui::Color32;
use egui_plot::{
    Corner, GridMark, Legend, Line, LineStyle, MarkerShape, Plot, PlotPoints, Points,
};

/// egui draws hairlines poorly; scale the configured border width up.
const LINE_WIDTH_SCALE: f32 = 2.0;

pub fn border_color(color: SeriesColor) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

pub fn fill_color(color: SeriesColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, (FILL_ALPHA * 255.0) as u8)
}

/// Creates the interactive training/validation chart.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw the chart for the current datasets.
    /// X-axis: iteration (linear) or feature combination (categorical), Y-axis: metric
    pub fn draw_line_chart(ui: &mut egui::Ui, config: &ChartConfig, data: &Data, height: f32) {
        let categorical = config.is_categorical();

        let mut plot = Plot::new("tunechart_line")
            .height(height)
            .legend(Legend::default().position(Corner::LeftBottom))
            .x_axis_label(config.x_axis.label())
            .y_axis_label(config.y_label.as_str())
            .allow_scroll(false);

        match &config.x_axis {
            XAxis::Linear {
                suggested_min,
                suggested_max,
                ..
            } => {
                // Suggested bounds only widen the view, the data can still extend it
                if let Some(min) = suggested_min {
                    plot = plot.include_x(*min);
                }
                if let Some(max) = suggested_max {
                    plot = plot.include_x(*max);
                }
            }
            XAxis::Category { labels, .. } => {
                let count = labels.len().max(config.training().points.len());
                let x_labels = labels.clone();
                plot = plot
                    .include_x(-0.5)
                    .include_x(count as f64 - 0.5)
                    // Every category gets a tick, nothing is skipped
                    .x_grid_spacer(move |_input| {
                        (0..count)
                            .map(|i| GridMark {
                                value: i as f64,
                                step_size: 1.0,
                            })
                            .collect()
                    })
                    .x_axis_formatter(move |mark, _range| {
                        tooltip::category_label(&x_labels, mark.value)
                    });
            }
        }

        plot = plot.label_formatter(move |name, value| {
            if name.is_empty() {
                return String::new();
            }
            tooltip::hovered_index(config, value.x)
                .map(|idx| Tooltip::at(config, data, idx).to_text())
                .unwrap_or_default()
        });

        plot.show(ui, |plot_ui| {
            for dataset in &config.datasets {
                let style = &dataset.style;
                let points = dataset.positioned_points(categorical);

                if style.show_line {
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(points.iter().copied()))
                            .color(border_color(style.color))
                            .width(style.border_width * LINE_WIDTH_SCALE)
                            .style(LineStyle::Dashed {
                                length: style.border_dash,
                            })
                            .name(&dataset.label),
                    );
                }

                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(style.point_radius)
                        .color(fill_color(style.color))
                        .name(&dataset.label),
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::config::{TRAINING_COLOR, VALIDATION_COLOR};

    #[test]
    fn colors_match_series_palette() {
        assert_eq!(border_color(TRAINING_COLOR), Color32::from_rgb(75, 192, 192));
        assert_eq!(border_color(VALIDATION_COLOR), Color32::from_rgb(245, 132, 16));
        assert_eq!(fill_color(TRAINING_COLOR).a(), 178);
    }
}
