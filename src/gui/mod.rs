//! GUI module - application window and chart view

mod app;
mod chart_viewer;

pub use app::TuneChartApp;
pub use chart_viewer::{ChartViewer, ViewerAction};
