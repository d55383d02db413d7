use std::io;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::{fs::File, io::AsyncReadExt};
use tracing::{debug, info};

use crate::backends::LineSource;
use crate::backends::gzip_lines::{ChunkReader, GzipLines};
use crate::error::{ImportError, Result};

// -- 📏 64 KiB per read. big enough to keep the decompressor busy, small enough to not care.
const READ_CHUNK_BYTES: usize = 64 * 1024;

// -- 📂 FileSourceConfig — "It's just a file", said no sysadmin ever before the disk filled up.
// KNOWLEDGE GRAPH: config lives co-located with the backend that uses it.
#[derive(Debug, Deserialize, Clone)]
pub struct FileSourceConfig {
    /// 📂 Path to a gzipped TSV in the title-basics layout.
    pub file_name: String,
}

/// 📦 A tokio file, read in fixed-size bites.
struct FileChunks(File);

#[async_trait]
impl ChunkReader for FileChunks {
    type Chunk = Vec<u8>;

    async fn next_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut chunk = vec![0u8; READ_CHUNK_BYTES];
        let read = self.0.read(&mut chunk).await?;
        if read == 0 {
            return Ok(None);
        }
        chunk.truncate(read);
        Ok(Some(chunk))
    }
}

/// 📂 FileSource — the offline twin of `HttpSource`. Same gzip, same lines, no CDN.
pub(crate) struct FileSource {
    lines: Option<GzipLines<FileChunks>>,
    config: FileSourceConfig,
}

// 🐛 GzipLines carries a progress bar; nobody debugging a file source wants to read it.
impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSource")
            .field("config", &self.config)
            .field("open", &self.lines.is_some())
            .finish()
    }
}

impl FileSource {
    /// 🚀 Open the file, size it up for the progress bar, and eat the header line.
    ///
    /// 💀 Missing file, no permission, not gzip → `SourceUnavailable`.
    pub(crate) async fn open(config: FileSourceConfig) -> Result<Self> {
        info!("📂 Opening {}...", config.file_name);
        let file = File::open(&config.file_name)
            .await
            .map_err(|err| ImportError::SourceUnavailable {
                locator: config.file_name.clone(),
                reason: format!("the door would not budge: {err}"),
            })?;

        // 📏 metadata failing is not fatal. the progress bar just shrugs.
        let total_size = file.metadata().await.map(|m| m.len()).unwrap_or(0);

        let lines = GzipLines::open(FileChunks(file), &config.file_name, total_size).await?;
        Ok(Self {
            lines: Some(lines),
            config,
        })
    }
}

#[async_trait]
impl LineSource for FileSource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.as_mut() {
            Some(lines) => Ok(lines.next_line().await?),
            None => Ok(None),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(lines) = self.lines.take() {
            lines.release();
            debug!("🗑️ closed {}", self.config.file_name);
        }
        Ok(())
    }
}
