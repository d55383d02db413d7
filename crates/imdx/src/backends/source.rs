use async_trait::async_trait;

use crate::app_config::SourceConfig;
use crate::backends::{file, http};
use crate::error::Result;

/// 🚰 A source that produces one decoded text line per call — and has no idea what a title is.
///
/// # Contract 📜
/// - The header line is gone before the first `next_line()`; opening swallowed it.
/// - `Ok(Some(line))` while data flows, without the trailing `\n` / `\r\n`.
/// - `Ok(None)` = end of stream. Also what you get after `close()`.
/// - `Err(Io)` when the stream breaks after opening. Opening failures are
///   `SourceUnavailable` and happen in the concrete constructors.
/// - `close()` releases the stream and is safe to call twice. The cursor only calls it once.
/// - No parsing happens here. A faucet, not a chef.
#[async_trait]
pub(crate) trait LineSource: std::fmt::Debug + Send {
    /// 📄 Next line, or `None` when the tap runs dry.
    async fn next_line(&mut self) -> Result<Option<String>>;

    /// 🗑️ Let go of the underlying stream.
    async fn close(&mut self) -> Result<()>;
}

/// 🎭 The many faces of a line source. Network or disk, same gzip, same lines.
#[derive(Debug)]
pub(crate) enum SourceBackend {
    Http(http::HttpSource),
    File(file::FileSource),
}

impl SourceBackend {
    /// 🔧 Open whichever source the config points at, header already discarded.
    pub(crate) async fn open(config: &SourceConfig) -> Result<Self> {
        Ok(match config {
            SourceConfig::Http(http_config) => {
                Self::Http(http::HttpSource::open(http_config.clone()).await?)
            }
            SourceConfig::File(file_config) => {
                Self::File(file::FileSource::open(file_config.clone()).await?)
            }
        })
    }
}

#[async_trait]
impl LineSource for SourceBackend {
    async fn next_line(&mut self) -> Result<Option<String>> {
        match self {
            SourceBackend::Http(source) => source.next_line().await,
            SourceBackend::File(source) => source.next_line().await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self {
            SourceBackend::Http(source) => source.close().await,
            SourceBackend::File(source) => source.close().await,
        }
    }
}
