//! Tooltip Text
//! Hover labels and footers for the line chart ("x" mode: every series at
//! the hovered position).

use super::config::{ChartConfig, XAxis};
use crate::data::Data;

/// Tooltip for one hovered position. The title is always empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub labels: Vec<String>,
    pub footer: String,
}

impl Tooltip {
    pub fn at(config: &ChartConfig, data: &Data, index: usize) -> Self {
        let labels = config
            .datasets
            .iter()
            .filter_map(|d| d.points.get(index).map(|p| label(&d.label, p.y)))
            .collect();
        Self {
            labels,
            footer: footer(config, data, index),
        }
    }

    pub fn to_text(&self) -> String {
        let mut text = self.labels.join("\n");
        if !self.footer.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&self.footer);
        }
        text
    }
}

/// "<series>: <y>"
pub fn label(series: &str, y: f64) -> String {
    if series.is_empty() {
        number(y)
    } else {
        format!("{}: {}", series, number(y))
    }
}

/// Shortest round-trip form of `y`, switching to exponent notation below
/// 1e-6 and from 1e21 up, the way browsers print numbers.
fn number(y: f64) -> String {
    if y.is_nan() {
        return "NaN".to_string();
    }
    if y.is_infinite() {
        return if y > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = y.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{:e}", y);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    y.to_string()
}

/// Footer for `index`: the `lineFooter` entry, prefixed with the
/// training/validation difference when both series have a point there.
pub fn footer(config: &ChartConfig, data: &Data, index: usize) -> String {
    let text = data.footer_at(index);
    let train = config.training().points.get(index);
    let val = config.validation().and_then(|d| d.points.get(index));
    match (train, val) {
        (Some(train), Some(val)) => format!("Diff: {:.4}\n{}", train.y - val.y, text),
        _ => text.to_string(),
    }
}

/// Index of the training point under the pointer at plot coordinate `x`.
pub fn hovered_index(config: &ChartConfig, x: f64) -> Option<usize> {
    let points = &config.training().points;
    if points.is_empty() || !x.is_finite() {
        return None;
    }

    match config.x_axis {
        XAxis::Category { .. } => {
            let idx = x.round();
            if idx < 0.0 {
                return None;
            }
            let idx = idx as usize;
            (idx < points.len()).then_some(idx)
        }
        XAxis::Linear { .. } => points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.x - x)
                    .abs()
                    .partial_cmp(&(b.x - x).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i),
    }
}

/// Tick text for a categorical axis mark; blank between categories.
pub fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
