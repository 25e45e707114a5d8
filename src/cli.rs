//! Command line configuration.

use crate::data::{is_http, DEFAULT_INTERVAL};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const VIEWER_PANE_PARAM: &str = "viewer_pane";

/// tunechart: live training/validation curve viewer.
#[derive(Parser, Debug)]
#[command(name = "tunechart", version, about, long_about = None)]
pub struct Cli {
    /// Chart settings JSON (metric, title, axis labels and bounds, update flag).
    #[arg(long, env = "TUNECHART_SETTINGS")]
    pub settings: PathBuf,

    /// Initial data snapshot JSON.
    #[arg(long, env = "TUNECHART_DATA")]
    pub data: PathBuf,

    /// Where fresh snapshots are polled from: an http(s) URL or a file path.
    /// Relative paths resolve next to the initial data file.
    #[arg(long, env = "TUNECHART_SOURCE", default_value = "data.json")]
    pub source: String,

    /// Embedded display: keep the chart at full window width.
    #[arg(long)]
    pub viewer_pane: bool,

    /// Delay between polls, in milliseconds.
    #[arg(
        long,
        env = "TUNECHART_INTERVAL_MS",
        default_value_t = DEFAULT_INTERVAL.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: u64,

    /// Render the chart to a PNG file and exit.
    #[arg(long, value_name = "PNG")]
    pub export: Option<PathBuf>,

    /// Print the chart configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

/// Resolved launch options.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub settings_path: PathBuf,
    pub data_path: PathBuf,
    pub source: String,
    /// Directory relative poll locations resolve against.
    pub base_dir: Option<PathBuf>,
    pub viewer_pane: bool,
    pub interval: Duration,
    pub export: Option<PathBuf>,
    pub print_config: bool,
}

impl From<Cli> for LaunchConfig {
    fn from(cli: Cli) -> Self {
        let viewer_pane = cli.viewer_pane || is_viewer_pane(&cli.source);
        let base_dir = cli
            .data
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from);
        Self {
            settings_path: cli.settings,
            data_path: cli.data,
            source: cli.source,
            base_dir,
            viewer_pane,
            interval: Duration::from_millis(cli.interval_ms),
            export: cli.export,
            print_config: cli.print_config,
        }
    }
}

/// Whether `location` carries a `viewer_pane=` query parameter.
pub fn is_viewer_pane(location: &str) -> bool {
    if !is_http(location) {
        return false;
    }
    let Ok(url) = Url::parse(location) else {
        return false;
    };
    url.query().is_some_and(|query| {
        query.split('&').any(|pair| {
            pair.strip_prefix(VIEWER_PANE_PARAM)
                .is_some_and(|rest| rest.starts_with('='))
        })
    })
}
