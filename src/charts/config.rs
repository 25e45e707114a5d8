//! Chart Configuration
//! Builds the line-chart description (datasets, style, axes) from settings.

use crate::data::{Point, Settings};
use serde_json::{json, Value};

pub const TRAINING_LABEL: &str = "Training";
pub const VALIDATION_LABEL: &str = "Validation";

/// Series color. Borders use it opaque, point fills at `FILL_ALPHA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const FILL_ALPHA: f32 = 0.7;
pub const TRAINING_COLOR: SeriesColor = SeriesColor { r: 75, g: 192, b: 192 }; // Teal
pub const VALIDATION_COLOR: SeriesColor = SeriesColor { r: 245, g: 132, b: 16 }; // Orange

impl SeriesColor {
    fn border_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    fn fill_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, FILL_ALPHA)
    }
}

/// Visual style shared by both series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub color: SeriesColor,
    pub point_radius: f32,
    pub point_hover_radius: f32,
    pub border_width: f32,
    pub border_dash: f32,
    pub line_tension: f32,
    pub show_line: bool,
}

impl SeriesStyle {
    pub fn new(color: SeriesColor, show_line: bool) -> Self {
        Self {
            color,
            point_radius: 3.0,
            point_hover_radius: 5.0,
            border_width: 0.7,
            border_dash: 5.0,
            line_tension: 0.0,
            show_line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub style: SeriesStyle,
    pub points: Vec<Point>,
}

impl Dataset {
    fn new(label: &str, color: SeriesColor, show_line: bool) -> Self {
        Self {
            label: label.to_string(),
            style: SeriesStyle::new(color, show_line),
            points: Vec::new(),
        }
    }

    /// Plot coordinates. On a categorical axis the i-th point sits on category i.
    pub fn positioned_points(&self, categorical: bool) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| if categorical { [i as f64, p.y] } else { [p.x, p.y] })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    Linear {
        label: String,
        suggested_min: Option<f64>,
        suggested_max: Option<f64>,
    },
    Category {
        label: String,
        labels: Vec<String>,
    },
}

impl XAxis {
    pub fn label(&self) -> &str {
        match self {
            XAxis::Linear { label, .. } | XAxis::Category { label, .. } => label,
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, XAxis::Category { .. })
    }
}

/// Complete line-chart description.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub title: String,
    pub y_label: String,
    pub x_axis: XAxis,
    /// Training first, then Validation when the metric has one.
    pub datasets: Vec<Dataset>,
}

impl ChartConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut datasets = vec![Dataset::new(
            TRAINING_LABEL,
            TRAINING_COLOR,
            settings.show_line,
        )];
        if settings.has_validation() {
            datasets.push(Dataset::new(
                VALIDATION_LABEL,
                VALIDATION_COLOR,
                settings.show_line,
            ));
        }

        let x_axis = if settings.is_categorical() {
            XAxis::Category {
                label: settings.x_label().to_string(),
                labels: settings.labels.clone(),
            }
        } else {
            XAxis::Linear {
                label: settings.x_label().to_string(),
                suggested_min: settings.suggested_min(),
                suggested_max: settings.suggested_max(),
            }
        };

        Self {
            title: settings.title().to_string(),
            y_label: settings.metric().to_string(),
            x_axis,
            datasets,
        }
    }

    pub fn is_categorical(&self) -> bool {
        self.x_axis.is_categorical()
    }

    pub fn training(&self) -> &Dataset {
        &self.datasets[0]
    }

    pub fn validation(&self) -> Option<&Dataset> {
        self.datasets.get(1)
    }

    /// Chart.js-shaped document describing this chart.
    pub fn to_chartjs(&self) -> Value {
        let datasets: Vec<Value> = self
            .datasets
            .iter()
            .map(|d| {
                json!({
                    "label": d.label,
                    "pointRadius": d.style.point_radius,
                    "pointHoverRadius": d.style.point_hover_radius,
                    "borderWidth": d.style.border_width,
                    "borderColor": d.style.color.border_css(),
                    "backgroundColor": d.style.color.fill_css(),
                    "fill": false,
                    "lineTension": d.style.line_tension,
                    "borderDash": [d.style.border_dash],
                    "showLine": d.style.show_line,
                    "data": d.points,
                })
            })
            .collect();

        let x_axis = match &self.x_axis {
            XAxis::Linear {
                label,
                suggested_min,
                suggested_max,
            } => json!({
                "type": "linear",
                "scaleLabel": { "display": true, "labelString": label },
                "ticks": {
                    "suggestedMin": suggested_min,
                    "suggestedMax": suggested_max,
                    "autoSkip": false
                }
            }),
            XAxis::Category { label, labels } => json!({
                "type": "category",
                "labels": labels,
                "scaleLabel": { "display": true, "labelString": label },
                "ticks": { "autoSkip": false }
            }),
        };

        json!({
            "type": "line",
            "data": { "datasets": datasets },
            "options": {
                "responsive": true,
                "title": {
                    "display": true,
                    "fontFamily": "sans-serif",
                    "padding": 15,
                    "text": self.title
                },
                "legend": {
                    "position": "bottom",
                    "labels": { "fontFamily": "sans-serif", "usePointStyle": true }
                },
                "scales": {
                    "yAxes": [{
                        "scaleLabel": { "display": true, "labelString": self.y_label }
                    }],
                    "xAxes": [x_axis]
                },
                "tooltips": { "mode": "x", "footerFontStyle": "normal" }
            }
        })
    }
}
