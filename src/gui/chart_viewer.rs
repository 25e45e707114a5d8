//! Chart Viewer Widget
//! Central panel showing the chart card: title, live chart and status line.

use crate::charts::ChartPlotter;
use crate::widget::{ChartWidget, WidgetState};
use egui::{Color32, RichText};

/// Content width outside of an embedding viewer pane
const CONTENT_MAX_WIDTH: f32 = 600.0;
const CHART_HEIGHT: f32 = 380.0;
const TITLE_PADDING: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAction {
    None,
    ExportPng,
}

pub struct ChartViewer {
    viewer_pane: bool,
    /// Last export result, shown next to the status line
    pub message: Option<String>,
}

impl ChartViewer {
    pub fn new(viewer_pane: bool) -> Self {
        Self {
            viewer_pane,
            message: None,
        }
    }

    fn content_width(&self, available: f32) -> f32 {
        if self.viewer_pane {
            available
        } else {
            available.min(CONTENT_MAX_WIDTH)
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, widget: &ChartWidget) -> ViewerAction {
        let mut action = ViewerAction::None;
        let width = self.content_width(ui.available_width());
        let config = widget.config();

        ui.vertical_centered(|ui| {
            ui.set_max_width(width);

            ui.add_space(TITLE_PADDING);
            ui.label(RichText::new(&config.title).size(18.0).strong());
            ui.add_space(TITLE_PADDING);

            ChartPlotter::draw_line_chart(ui, config, widget.data(), CHART_HEIGHT);

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let state = widget.state();
                let state_color = match state {
                    WidgetState::Polling => Color32::from_rgb(40, 167, 69),
                    WidgetState::Stopped => Color32::GRAY,
                    _ => ui.visuals().text_color(),
                };
                ui.label(RichText::new(state.as_str()).size(12.0).color(state_color));
                ui.label(
                    RichText::new(format!("{} points", config.training().points.len()))
                        .size(12.0),
                );

                if let Some(error) = widget.last_error() {
                    ui.label(
                        RichText::new(format!("Last poll failed: {}", error))
                            .size(12.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("💾 Export PNG").clicked() {
                        action = ViewerAction::ExportPng;
                    }
                });
            });

            if let Some(message) = &self.message {
                ui.label(RichText::new(message).size(11.0).color(Color32::GRAY));
            }
        });

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_limited_outside_viewer_pane() {
        assert_eq!(ChartViewer::new(false).content_width(1400.0), 600.0);
        assert_eq!(ChartViewer::new(false).content_width(400.0), 400.0);
        assert_eq!(ChartViewer::new(true).content_width(1400.0), 1400.0);
    }
}
