//! 🔌 Backends — where the real I/O happens.
//!
//! 🚰 Sources pour decoded lines out of a gzipped dataset. Sinks swallow
//! rendered payloads. Neither knows what a title is, which is how they like it.
//!
//! 🎭 The casting agency:
//! - `http`: the public dataset, streamed over HTTP.
//! - `file`: the same dataset from disk, plus an NDJSON file sink.
//! - `elasticsearch`: bulk indexing and title search.
//! - `in_mem`: a Vec pretending to be infrastructure.
//!
//! 🦆 The duck is here because every file must have one. This is law.

mod elasticsearch;
mod file;
pub(crate) mod gzip_lines;
mod http;
pub(crate) mod in_mem;
mod sink;
mod source;

pub use elasticsearch::ElasticsearchSinkConfig;
pub(crate) use elasticsearch::search_titles;
pub use file::{FileSinkConfig, FileSourceConfig};
pub use http::HttpSourceConfig;
pub(crate) use sink::{Sink, SinkBackend};
pub(crate) use source::{LineSource, SourceBackend};
