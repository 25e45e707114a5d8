//! Chart Data Model
//! Settings and data snapshots as produced by the tuning process.
//!
//! Both records follow the jsonlite layout: scalars arrive as one-element
//! arrays, so every scalar field is read through a `first` accessor.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Metric whose runs carry no validation series.
pub const AICC_METRIC: &str = "AICc";

/// Horizontal axis label that switches the chart to categorical mode.
pub const FEATURE_COMBINATION: &str = "feature combination";

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    InvalidFile {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid JSON: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// A single plotted point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Chart settings, fixed for the lifetime of the window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub metric: Vec<String>,
    pub title: Vec<String>,
    pub x_label: Vec<String>,
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    pub labels: Vec<String>,
    #[serde(deserialize_with = "flag")]
    pub show_line: bool,
    #[serde(deserialize_with = "flag")]
    pub update: bool,
}

impl Settings {
    pub fn metric(&self) -> &str {
        first_str(&self.metric)
    }

    pub fn title(&self) -> &str {
        first_str(&self.title)
    }

    pub fn x_label(&self) -> &str {
        first_str(&self.x_label)
    }

    pub fn suggested_min(&self) -> Option<f64> {
        self.min.first().copied()
    }

    pub fn suggested_max(&self) -> Option<f64> {
        self.max.first().copied()
    }

    /// Whether the run tracks a validation series next to the training one.
    pub fn has_validation(&self) -> bool {
        self.metric() != AICC_METRIC
    }

    pub fn is_categorical(&self) -> bool {
        self.x_label() == FEATURE_COMBINATION
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = read_file(path)?;
        serde_json::from_str(&text).map_err(|source| ModelError::InvalidFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// One complete data snapshot. Replaced wholesale on every poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    pub train: Vec<Point>,
    pub val: Vec<Point>,
    #[serde(rename = "lineFooter")]
    pub line_footer: Vec<String>,
    pub stop: Vec<bool>,
}

impl Data {
    /// True once the producer has signalled that no more points will come.
    pub fn is_stopped(&self) -> bool {
        self.stop.first().copied().unwrap_or(false)
    }

    pub fn footer_at(&self, index: usize) -> &str {
        self.line_footer.get(index).map(String::as_str).unwrap_or("")
    }

    /// Decode a snapshot body.
    ///
    /// Bodies that were JSON-encoded twice (a JSON string holding the
    /// object) are unwrapped once before decoding.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let value = match value {
            serde_json::Value::String(inner) => serde_json::from_str(&inner)?,
            other => other,
        };
        Ok(serde_json::from_value(value)?)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = read_file(path)?;
        Self::from_json(&text).map_err(|err| match err {
            ModelError::Invalid(source) => ModelError::InvalidFile {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }
}

/// Accepts `true` as well as the boxed `[true]` form.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Plain(bool),
        Boxed(Vec<bool>),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Plain(value) => value,
        Flag::Boxed(values) => values.first().copied().unwrap_or(false),
    })
}

fn first_str(values: &[String]) -> &str {
    values.first().map(String::as_str).unwrap_or("")
}

fn read_file(path: &Path) -> Result<String, ModelError> {
    fs::read_to_string(path).map_err(|source| ModelError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn settings_read_first_elements() {
        let settings = Settings::from_json(
            r#"{"metric":["RMSE"],"title":["T"],"x_label":["Iteration"],
                "min":[0],"max":[10],"show_line":true,"update":false}"#,
        )
        .unwrap();
        assert_eq!(settings.metric(), "RMSE");
        assert_eq!(settings.title(), "T");
        assert_eq!(settings.x_label(), "Iteration");
        assert_eq!(settings.suggested_min(), Some(0.0));
        assert_eq!(settings.suggested_max(), Some(10.0));
        assert!(settings.labels.is_empty());
        assert!(settings.has_validation());
        assert!(!settings.is_categorical());
    }

    #[test]
    fn boxed_flags_are_unwrapped() {
        let settings =
            Settings::from_json(r#"{"show_line":[true],"update":[false]}"#).unwrap();
        assert!(settings.show_line);
        assert!(!settings.update);
    }

    #[test]
    fn aicc_settings_have_no_validation() {
        let settings = Settings::from_json(r#"{"metric":["AICc"]}"#).unwrap();
        assert!(!settings.has_validation());
    }

    #[test]
    fn empty_scalars_fall_back_to_neutral_values() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings.metric(), "");
        assert_eq!(settings.suggested_min(), None);
        let data = Data::from_json("{}").unwrap();
        assert!(!data.is_stopped());
        assert_eq!(data.footer_at(3), "");
    }

    #[test]
    fn data_decodes_line_footer_and_stop() {
        let data = Data::from_json(
            r#"{"train":[{"x":0,"y":1}],"lineFooter":["a"],"stop":[true]}"#,
        )
        .unwrap();
        assert_eq!(data.train, vec![Point::new(0.0, 1.0)]);
        assert!(data.val.is_empty());
        assert_eq!(data.footer_at(0), "a");
        assert!(data.is_stopped());
    }

    #[test]
    fn data_accepts_doubly_encoded_body() {
        let inner = r#"{"train":[{"x":1,"y":2}],"stop":[false]}"#;
        let wrapped = serde_json::to_string(inner).unwrap();
        let data = Data::from_json(&wrapped).unwrap();
        assert_eq!(data.train, vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn malformed_data_is_an_error() {
        assert!(matches!(
            Data::from_json("{\"train\": ["),
            Err(ModelError::Invalid(_))
        ));
    }

    #[test]
    fn load_reports_path_on_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        match Data::load(file.path()) {
            Err(ModelError::InvalidFile { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("settings.json");
        assert!(matches!(
            Settings::load(&missing),
            Err(ModelError::Read { .. })
        ));
    }
}
