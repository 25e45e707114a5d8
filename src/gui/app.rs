//! tunechart Main Application
//! Window bootstrap, poll result handling and PNG export.

use crate::charts::{StaticChartRenderer, EXPORT_HEIGHT, EXPORT_WIDTH};
use crate::cli::LaunchConfig;
use crate::data::{source_for, PollHandle};
use crate::gui::{ChartViewer, ViewerAction};
use crate::widget::{ChartWidget, WidgetState};

/// Main application window.
pub struct TuneChartApp {
    widget: ChartWidget,
    chart_viewer: ChartViewer,
    poller: Option<PollHandle>,
}

impl TuneChartApp {
    /// Render the initial snapshot and start polling when the settings ask for it.
    pub fn new(cc: &eframe::CreationContext<'_>, widget: ChartWidget, launch: &LaunchConfig) -> Self {
        let mut app = Self {
            widget,
            chart_viewer: ChartViewer::new(launch.viewer_pane),
            poller: None,
        };
        app.widget.render();

        if app.widget.begin_polling() {
            match source_for(&launch.source, launch.base_dir.as_deref()) {
                Ok(source) => {
                    let ctx = cc.egui_ctx.clone();
                    app.poller = Some(PollHandle::spawn(source, launch.interval, move || {
                        ctx.request_repaint();
                    }));
                }
                Err(err) => {
                    tracing::error!(source = %launch.source, error = %err, "Cannot poll data source");
                    app.chart_viewer.message = Some(format!("Polling disabled: {}", err));
                    app.widget.stop();
                }
            }
        }

        app
    }

    /// Check for poll results
    fn check_poll_results(&mut self) {
        let Some(poller) = &self.poller else {
            return;
        };

        // Read before draining so a final event sent just before exit is not lost
        let finished = poller.is_finished();
        for event in poller.try_events() {
            self.widget.apply_poll(event);
        }

        if finished || self.widget.state() == WidgetState::Stopped {
            self.poller = None;
        }
    }

    /// Handle PNG export - render the chart in memory and save it where the user picks
    fn handle_export_png(&mut self) {
        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("tunechart.png")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        let result = StaticChartRenderer::render_to_file(
            self.widget.config(),
            &output_path,
            EXPORT_WIDTH,
            EXPORT_HEIGHT,
        );
        self.chart_viewer.message = Some(match result {
            Ok(()) => format!("Exported {}", output_path.display()),
            Err(e) => {
                tracing::warn!(error = %e, "PNG export failed");
                format!("Export error: {}", e)
            }
        });
    }
}

impl eframe::App for TuneChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_poll_results();

        if self.widget.take_redraw() {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if self.chart_viewer.show(ui, &self.widget) == ViewerAction::ExportPng {
                    self.handle_export_png();
                }
            });
        });
    }
}

impl Drop for TuneChartApp {
    fn drop(&mut self) {
        self.widget.stop();
        // Dropping the handle cancels the background poll
        self.poller = None;
    }
}
