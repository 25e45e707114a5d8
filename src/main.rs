//! tunechart - Live Training Curve Viewer
//!
//! Plots a tuning run's training/validation metric and keeps polling the
//! run's data snapshot until it reports that it has stopped.

mod charts;
mod cli;
mod data;
mod gui;
mod logging;
mod widget;

use anyhow::Context;
use charts::{StaticChartRenderer, EXPORT_HEIGHT, EXPORT_WIDTH};
use clap::Parser;
use cli::{Cli, LaunchConfig};
use data::{Data, Settings};
use eframe::egui;
use gui::TuneChartApp;
use widget::ChartWidget;

fn main() -> anyhow::Result<()> {
    let launch: LaunchConfig = Cli::parse().into();
    if let Err(err) = logging::init() {
        eprintln!("{err}");
    }

    let settings = Settings::load(&launch.settings_path).context("Failed to load chart settings")?;
    let data = Data::load(&launch.data_path).context("Failed to load initial data")?;
    tracing::info!(
        metric = settings.metric(),
        x_label = settings.x_label(),
        update = settings.update,
        points = data.train.len(),
        "Chart settings loaded"
    );

    let mut widget = ChartWidget::new(settings, data);

    if launch.print_config {
        widget.render();
        println!("{}", serde_json::to_string_pretty(&widget.config().to_chartjs())?);
        return Ok(());
    }

    if let Some(path) = &launch.export {
        widget.render();
        StaticChartRenderer::render_to_file(widget.config(), path, EXPORT_WIDTH, EXPORT_HEIGHT)
            .with_context(|| format!("Failed to export chart to {}", path.display()))?;
        return Ok(());
    }

    let title = match widget.settings().title() {
        "" => "tunechart".to_string(),
        title => title.to_string(),
    };

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 560.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title(&title),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(TuneChartApp::new(cc, widget, &launch)))),
    )
    .map_err(|err| anyhow::anyhow!("Window failed: {err}"))
}
