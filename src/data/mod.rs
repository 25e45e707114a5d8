//! Data module - snapshot model, poll sources and the background poller

mod model;
mod poller;
mod source;

pub use model::{Data, Point, Settings};
pub use poller::{PollEvent, PollHandle, DEFAULT_INTERVAL};
pub use source::{is_http, source_for};
