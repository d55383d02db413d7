// ai
//! 🎬 imdx — streams the public title dataset into a search index, one batch at a time.
//!
//! ```text
//!   gzip TSV ──► lines ──► Record ──► movie? ──► batch of 10k ──► /_bulk
//! ```
//!
//! The entry points are [`run`] for the import and [`search`] for asking the
//! index what it now knows. Everything else is plumbing. 🦆

pub mod app_config;
pub mod error;

mod accumulator;
mod backends;
mod common;
mod composers;
mod cursor;
mod progress;
mod selection;
mod supervisors;

use anyhow::Result;

use crate::app_config::{AppConfig, SinkConfig};
use crate::supervisors::Supervisor;

pub use backends::{ElasticsearchSinkConfig, FileSinkConfig, FileSourceConfig, HttpSourceConfig};
pub use common::{Record, TitlePair};
pub use progress::format_duration;
pub use supervisors::ImportSummary;

/// 🚀 Run one full import with the given config.
pub async fn run(app_config: AppConfig) -> Result<ImportSummary> {
    Supervisor::new(app_config).run().await
}

/// 🔍 Match `title` against the original titles in the configured index.
///
/// Only meaningful with an Elasticsearch sink; any other sink is an error.
pub async fn search(app_config: &AppConfig, title: &str, from: usize, size: usize) -> Result<Vec<Record>> {
    match &app_config.sink_config {
        SinkConfig::Elasticsearch(es_config) => {
            backends::search_titles(es_config, title, from, size).await
        }
        other => anyhow::bail!(
            "💀 Searching needs an Elasticsearch sink, but the config points at {:?}. \
             A file does not answer questions.",
            other
        ),
    }
}
