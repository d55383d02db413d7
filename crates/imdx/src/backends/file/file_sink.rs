use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::{
    fs::File,
    io::{self, AsyncWriteExt},
};
use tracing::trace;

use crate::backends::Sink;

// -- 🚰 FileSinkConfig — cousin of FileSourceConfig, equally traumatized by disk full errors.
#[derive(Debug, Deserialize, Clone)]
pub struct FileSinkConfig {
    /// 📂 Where the NDJSON goes. Truncated on open.
    pub file_name: String,
}

/// 🚰 FileSink — receives fully rendered payloads and writes them to disk. I/O only.
///
/// ⚠️ `File::create` truncates if the file exists. No warning. No backup. Just gone.
#[derive(Debug)]
pub(crate) struct FileSink {
    file_buf: io::BufWriter<File>,
    config: FileSinkConfig,
}

impl FileSink {
    /// 🚀 Creates (or obliterates and recreates) the sink file behind a BufWriter.
    pub(crate) async fn new(config: FileSinkConfig) -> Result<Self> {
        let file_handle = File::create(&config.file_name).await.context(format!(
            "💀 The sink file '{}' could not be conjured into existence. \
                We stared at the path. The path stared back. \
                One of us was wrong about whether the parent directory existed.",
            &config.file_name
        ))?;
        Ok(Self {
            file_buf: io::BufWriter::new(file_handle),
            config,
        })
    }
}

#[async_trait]
impl Sink for FileSink {
    /// 📡 One payload, one `write_all`. The composer already did the formatting.
    async fn send(&mut self, payload: String) -> Result<()> {
        trace!(
            "📬 payload of {} bytes walked into {} — writing it all down",
            payload.len(),
            self.config.file_name
        );
        self.file_buf
            .write_all(payload.as_bytes())
            .await
            .context(format!("💀 Writing to '{}' failed", self.config.file_name))
    }

    /// 🗑️ Flush the BufWriter. Async Drop is not a thing, so this is the only flush you get.
    async fn close(&mut self) -> Result<()> {
        self.file_buf.flush().await.context(format!(
            "💀 Error flushing '{}' — the bytes could see the disk, they just couldn't reach it.",
            self.config.file_name
        ))
    }
}
