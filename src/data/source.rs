//! Poll Sources
//! Fetches one data snapshot per call, over HTTP or from a local file.

use super::model::{Data, ModelError};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_TIMEOUT: Duration = Duration::from_secs(10);
/// Snapshots are a few hundred points; anything near this is not a snapshot.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;
const CACHE_BUST_PARAM: &str = "_";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid source URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("Failed to read response body: {0}")]
    Body(#[from] io::Error),
    #[error("Failed to decode snapshot: {0}")]
    Decode(#[from] ModelError),
}

/// Something that can be asked for the freshest data snapshot.
pub trait DataSource: Send {
    fn fetch(&mut self) -> Result<Data, SourceError>;

    /// Human-readable location, used in logs and the status line.
    fn describe(&self) -> String;
}

/// Shared HTTP agent with bounded timeouts.
fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .build()
    })
}

/// Polls a `GET` endpoint with caching disabled.
pub struct HttpSource {
    url: Url,
}

impl HttpSource {
    pub fn new(url: &str) -> Result<Self, SourceError> {
        let url = Url::parse(url).map_err(|source| SourceError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self { url })
    }

    /// The request URL for one poll, with a cache-busting timestamp appended.
    fn request_url(&self) -> Url {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair(CACHE_BUST_PARAM, &stamp.to_string());
        url
    }
}

impl DataSource for HttpSource {
    fn fetch(&mut self) -> Result<Data, SourceError> {
        let url = self.request_url();
        let response = agent()
            .get(url.as_str())
            .set("Cache-Control", "no-cache")
            .set("Pragma", "no-cache")
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(status, _) => SourceError::Status {
                    url: self.url.to_string(),
                    status,
                },
                ureq::Error::Transport(transport) => SourceError::Transport {
                    url: self.url.to_string(),
                    message: transport.to_string(),
                },
            })?;

        let body = read_body(response)?;
        Ok(Data::from_json(&body)?)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

fn read_body(response: ureq::Response) -> Result<String, io::Error> {
    let mut limited = response.into_reader().take(MAX_BODY_BYTES as u64 + 1);
    let mut body = String::new();
    limited.read_to_string(&mut body)?;
    if body.len() > MAX_BODY_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Response exceeded {MAX_BODY_BYTES} bytes"),
        ));
    }
    Ok(body)
}

/// Re-reads a JSON file that the producer rewrites in place.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for FileSource {
    fn fetch(&mut self) -> Result<Data, SourceError> {
        let text = std::fs::read_to_string(&self.path)?;
        Ok(Data::from_json(&text)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub fn is_http(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Pick a source for `location`.
///
/// Relative file locations resolve against `base_dir`, the directory that
/// held the initial data file.
pub fn source_for(
    location: &str,
    base_dir: Option<&Path>,
) -> Result<Box<dyn DataSource>, SourceError> {
    if is_http(location) {
        return Ok(Box::new(HttpSource::new(location)?));
    }

    let path = Path::new(location);
    let path = match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    };
    Ok(Box::new(FileSource::new(path)))
}
