//! Chart Widget
//! Owns the settings, the chart configuration and the current data snapshot.

use crate::charts::ChartConfig;
use crate::data::{Data, PollEvent, Settings};

/// Lifecycle: `Idle -> Rendered -> (Polling <-> Rendered) -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    Rendered,
    Polling,
    Stopped,
}

impl WidgetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetState::Idle => "Idle",
            WidgetState::Rendered => "Rendered",
            WidgetState::Polling => "Polling",
            WidgetState::Stopped => "Stopped",
        }
    }
}

pub struct ChartWidget {
    settings: Settings,
    config: ChartConfig,
    data: Data,
    state: WidgetState,
    /// Sequence number of the last applied poll event
    last_seq: u64,
    last_error: Option<String>,
    needs_redraw: bool,
}

impl ChartWidget {
    pub fn new(settings: Settings, data: Data) -> Self {
        let config = ChartConfig::from_settings(&settings);
        Self {
            settings,
            config,
            data,
            state: WidgetState::Idle,
            last_seq: 0,
            last_error: None,
            needs_redraw: false,
        }
    }

    /// Copy the snapshot into the chart datasets and request a redraw.
    pub fn render(&mut self) {
        self.config.datasets[0].points = self.data.train.clone();
        if let Some(validation) = self.config.datasets.get_mut(1) {
            validation.points = self.data.val.clone();
        }
        self.needs_redraw = true;
        if self.state == WidgetState::Idle {
            self.state = WidgetState::Rendered;
        }
    }

    /// Enter the polling state when the settings ask for live updates.
    pub fn begin_polling(&mut self) -> bool {
        if !self.settings.update || self.state == WidgetState::Stopped {
            return false;
        }
        self.state = WidgetState::Polling;
        true
    }

    /// Apply one poll result. Returns whether it changed the widget.
    ///
    /// Events that are not newer than the last applied one are ignored,
    /// as is anything arriving after the widget stopped.
    pub fn apply_poll(&mut self, event: PollEvent) -> bool {
        if self.state == WidgetState::Stopped {
            return false;
        }
        let seq = event.seq();
        if seq <= self.last_seq {
            tracing::debug!(seq, last = self.last_seq, "Discarding stale poll event");
            return false;
        }
        self.last_seq = seq;

        match event {
            PollEvent::Snapshot { data, .. } => {
                let stop = data.is_stopped();
                self.data = data;
                self.last_error = None;
                self.render();
                if stop {
                    tracing::info!(seq, "Run finished, chart is final");
                    self.state = WidgetState::Stopped;
                }
            }
            PollEvent::Failed { message, .. } => {
                self.last_error = Some(message);
            }
        }
        true
    }

    /// Teardown: no further poll results are accepted.
    pub fn stop(&mut self) {
        self.state = WidgetState::Stopped;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns and clears the pending redraw request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::tooltip;
    use crate::data::Point;

    fn settings(metric: &str, update: bool) -> Settings {
        Settings {
            metric: vec![metric.to_string()],
            title: vec!["T".to_string()],
            x_label: vec!["Iteration".to_string()],
            min: vec![0.0],
            max: vec![10.0],
            labels: Vec::new(),
            show_line: true,
            update,
        }
    }

    fn data() -> Data {
        Data {
            train: vec![Point::new(0.0, 1.0), Point::new(1.0, 0.5)],
            val: vec![Point::new(0.0, 1.2), Point::new(1.0, 0.6)],
            line_footer: vec!["a".to_string(), "b".to_string()],
            stop: vec![false],
        }
    }

    fn snapshot(seq: u64, points: usize, stop: bool) -> PollEvent {
        PollEvent::Snapshot {
            seq,
            data: Data {
                train: (0..points).map(|i| Point::new(i as f64, 0.1)).collect(),
                val: (0..points).map(|i| Point::new(i as f64, 0.2)).collect(),
                line_footer: Vec::new(),
                stop: vec![stop],
            },
        }
    }

    #[test]
    fn initial_render_copies_both_series() {
        let mut widget = ChartWidget::new(settings("RMSE", false), data());
        assert_eq!(widget.state(), WidgetState::Idle);
        widget.render();

        assert_eq!(widget.state(), WidgetState::Rendered);
        assert_eq!(widget.config().datasets[0].points, data().train);
        assert_eq!(widget.config().datasets[1].points, data().val);
        assert_eq!(
            tooltip::footer(widget.config(), widget.data(), 0),
            "Diff: -0.2000\na"
        );
        assert!(widget.take_redraw());
        assert!(!widget.take_redraw());
    }

    #[test]
    fn aicc_render_ignores_validation() {
        let mut widget = ChartWidget::new(settings("AICc", false), data());
        widget.render();
        assert_eq!(widget.config().datasets.len(), 1);
        assert_eq!(tooltip::footer(widget.config(), widget.data(), 1), "b");
    }

    #[test]
    fn render_is_idempotent() {
        let mut widget = ChartWidget::new(settings("RMSE", false), data());
        widget.render();
        let before = widget.config().clone();
        widget.render();
        assert_eq!(*widget.config(), before);
    }

    #[test]
    fn polling_requires_update_flag() {
        let mut widget = ChartWidget::new(settings("RMSE", false), data());
        widget.render();
        assert!(!widget.begin_polling());
        assert_eq!(widget.state(), WidgetState::Rendered);

        let mut widget = ChartWidget::new(settings("RMSE", true), data());
        widget.render();
        assert!(widget.begin_polling());
        assert_eq!(widget.state(), WidgetState::Polling);
    }

    #[test]
    fn snapshots_replace_data_wholesale() {
        let mut widget = ChartWidget::new(settings("RMSE", true), data());
        widget.render();
        widget.begin_polling();

        assert!(widget.apply_poll(snapshot(1, 3, false)));
        assert_eq!(widget.config().datasets[0].points.len(), 3);
        assert!(widget.data().line_footer.is_empty());
        assert_eq!(widget.state(), WidgetState::Polling);
    }

    #[test]
    fn stop_snapshot_finishes_widget() {
        let mut widget = ChartWidget::new(settings("RMSE", true), data());
        widget.render();
        widget.begin_polling();

        assert!(widget.apply_poll(snapshot(1, 4, true)));
        assert_eq!(widget.state(), WidgetState::Stopped);
        assert_eq!(widget.config().datasets[1].points.len(), 4);
        assert!(!widget.apply_poll(snapshot(2, 5, false)));
        assert_eq!(widget.config().datasets[0].points.len(), 4);
    }

    #[test]
    fn stale_events_are_ignored() {
        let mut widget = ChartWidget::new(settings("RMSE", true), data());
        widget.render();
        widget.begin_polling();

        assert!(widget.apply_poll(snapshot(5, 5, false)));
        assert!(!widget.apply_poll(snapshot(4, 2, false)));
        assert!(!widget.apply_poll(snapshot(5, 2, false)));
        assert_eq!(widget.config().datasets[0].points.len(), 5);
    }

    #[test]
    fn failures_keep_data_and_record_error() {
        let mut widget = ChartWidget::new(settings("RMSE", true), data());
        widget.render();
        widget.begin_polling();

        assert!(widget.apply_poll(PollEvent::Failed {
            seq: 1,
            message: "connection refused".to_string(),
        }));
        assert_eq!(widget.last_error(), Some("connection refused"));
        assert_eq!(widget.config().datasets[0].points, data().train);

        widget.apply_poll(snapshot(2, 1, false));
        assert_eq!(widget.last_error(), None);
    }

    #[test]
    fn teardown_rejects_later_results() {
        let mut widget = ChartWidget::new(settings("RMSE", true), data());
        widget.render();
        widget.begin_polling();
        widget.stop();
        assert!(!widget.begin_polling());
        assert!(!widget.apply_poll(snapshot(1, 3, false)));
    }
}
