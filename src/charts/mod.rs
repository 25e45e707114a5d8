//! Charts module - chart configuration, tooltips and rendering

mod config;
mod plotter;
mod renderer;
pub mod tooltip;

pub use config::ChartConfig;
pub use plotter::ChartPlotter;
pub use renderer::{StaticChartRenderer, EXPORT_HEIGHT, EXPORT_WIDTH};
