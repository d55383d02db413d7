use anyhow::Result;
use async_trait::async_trait;

use crate::app_config::SinkConfig;
use crate::backends::{elasticsearch, file, in_mem};

/// 🕳️ A sink that sends pre-rendered payloads — pure I/O, zero logic.
///
/// Sinks are ONLY an abstraction for how to send the request — HTTP POST to /_bulk,
/// write to file, stash in memory. They do not buffer. They do not serialize records.
/// They do not retry. The accumulator hands them a finished payload and a deadline.
///
/// # Contract 📜
/// - `send` accepts a fully rendered payload string and writes/sends it. That's it.
/// - `close` flushes, finalizes, and bids the data a fond farewell. MUST be called.
#[async_trait]
pub(crate) trait Sink: std::fmt::Debug + Send {
    /// 📡 Send a fully rendered payload to the destination. I/O only. No questions asked.
    async fn send(&mut self, payload: String) -> Result<()>;
    /// 🗑️ Flush, finalize, and release.
    async fn close(&mut self) -> Result<()>;
}

/// 🎭 The many faces of a Sink — the index, a file, or a Vec in RAM.
#[derive(Debug)]
pub(crate) enum SinkBackend {
    InMemory(in_mem::InMemorySink),
    File(file::FileSink),
    Elasticsearch(elasticsearch::ElasticsearchSink),
}

impl SinkBackend {
    /// 🔧 Build the sink the config asks for. The Elasticsearch one pings the cluster first.
    pub(crate) async fn from_config(config: &SinkConfig) -> Result<Self> {
        Ok(match config {
            SinkConfig::InMemory(()) => Self::InMemory(in_mem::InMemorySink::new()),
            SinkConfig::File(file_config) => {
                Self::File(file::FileSink::new(file_config.clone()).await?)
            }
            SinkConfig::Elasticsearch(es_config) => {
                Self::Elasticsearch(elasticsearch::ElasticsearchSink::new(es_config.clone()).await?)
            }
        })
    }
}

#[async_trait]
impl Sink for SinkBackend {
    async fn send(&mut self, payload: String) -> Result<()> {
        match self {
            SinkBackend::InMemory(sink) => sink.send(payload).await,
            SinkBackend::File(sink) => sink.send(payload).await,
            SinkBackend::Elasticsearch(sink) => sink.send(payload).await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self {
            SinkBackend::InMemory(sink) => sink.close().await,
            SinkBackend::File(sink) => sink.close().await,
            SinkBackend::Elasticsearch(sink) => sink.close().await,
        }
    }
}
