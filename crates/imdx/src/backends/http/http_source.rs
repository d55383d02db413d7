use std::io;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, info};

use crate::backends::LineSource;
use crate::backends::gzip_lines::{ChunkReader, GzipLines};
use crate::error::{ImportError, Result};

/// 🎬 Where the title basics have lived for years. Override it if you mirror them.
pub(crate) const DEFAULT_DATASET_URL: &str = "https://datasets.imdbws.com/title.basics.tsv.gz";

// -- 📡 HttpSourceConfig — "it's just a URL", said everyone, right before the TLS handshake.
#[derive(Debug, Deserialize, Clone)]
pub struct HttpSourceConfig {
    /// 📡 Full URL of the gzipped TSV.
    #[serde(default = "default_dataset_url")]
    pub url: String,
    /// ⏱️ How long we wait for a TCP handshake before calling it. Reads are not bounded.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_dataset_url() -> String {
    DEFAULT_DATASET_URL.to_string()
}

// -- ⏱️ 10 seconds. same patience we give Elasticsearch. fair is fair.
fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            url: default_dataset_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// 📦 A reqwest response body, served one chunk at a time.
struct ResponseChunks(reqwest::Response);

#[async_trait]
impl ChunkReader for ResponseChunks {
    type Chunk = Bytes;

    async fn next_chunk(&mut self) -> io::Result<Option<Bytes>> {
        self.0.chunk().await.map_err(io::Error::other)
    }
}

/// 📡 Streams the gzipped dataset over HTTP and vends decoded lines.
///
/// Nothing is buffered beyond the chunk in hand and the lines decoded from it.
/// `close()` drops the response, which hands the connection back (or hangs up on it).
pub(crate) struct HttpSource {
    lines: Option<GzipLines<ResponseChunks>>,
    config: HttpSourceConfig,
}

impl std::fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSource")
            .field("config", &self.config)
            .field("open", &self.lines.is_some())
            .finish()
    }
}

impl HttpSource {
    /// 🚀 GET the dataset, check the status, and eat the header line.
    ///
    /// 💀 Anything that stops us before the first data line (DNS, refused
    /// connection, non-2xx status, bytes that aren't gzip) is `SourceUnavailable`.
    pub(crate) async fn open(config: HttpSourceConfig) -> Result<Self> {
        info!("📡 Opening {}...", config.url);
        let unavailable = |reason: String| ImportError::SourceUnavailable {
            locator: config.url.clone(),
            reason,
        };

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|err| unavailable(format!("could not build an HTTP client: {err}")))?;

        let response = client
            .get(&config.url)
            .send()
            .await
            .map_err(|err| unavailable(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("server answered {status}")));
        }

        // 📏 Content-Length is the compressed size. Good enough for a progress bar.
        let total_size = response.content_length().unwrap_or(0);
        debug!("📏 {} announced {} compressed bytes", config.url, total_size);

        let lines = GzipLines::open(ResponseChunks(response), &config.url, total_size).await?;
        Ok(Self {
            lines: Some(lines),
            config,
        })
    }
}

#[async_trait]
impl LineSource for HttpSource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.as_mut() {
            Some(lines) => Ok(lines.next_line().await?),
            None => Ok(None),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(lines) = self.lines.take() {
            lines.release();
            debug!("🗑️ closed {}", self.config.url);
        }
        Ok(())
    }
}
