// ai
//! 📦 The batch accumulator — holds up to B documents, then ships them in one go.
//!
//! 🎬 *[a Vec fills up. ten thousand movies, shoulder to shoulder. the door opens.]*
//!
//! ```text
//!   add(record) ──► batch.len() == B ? ──yes──► flush ──► fresh batch
//!                                    └─no──► wait for more
//!   flush_remainder() ──► batch empty ? ──yes──► nothing happens. no request. no drama.
//!                                     └─no──► flush
//! ```
//!
//! Every flush is bounded by the flush timeout. A failed or late flush is
//! fatal to the import, but the batch is taken out *before* sending, so the
//! accumulator itself is left holding an empty batch either way.

use std::time::Duration;

use tracing::{debug, info};

use crate::backends::Sink;
use crate::common::{IndexDocument, Record};
use crate::composers::{Composer, ComposerBackend};
use crate::error::{ImportError, Result};

/// 📊 What made it out the door so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FlushStats {
    pub(crate) batches: u64,
    pub(crate) documents: u64,
}

/// 📦 Buffers serialized documents and flushes them through a composer and a sink.
#[derive(Debug)]
pub(crate) struct BatchAccumulator<S: Sink> {
    sink: S,
    composer: ComposerBackend,
    batch: Vec<IndexDocument>,
    batch_size: usize,
    flush_timeout: Duration,
    stats: FlushStats,
}

impl<S: Sink> BatchAccumulator<S> {
    /// 🚀 `batch_size` must be at least 1; the supervisor checks before we get here.
    pub(crate) fn new(
        sink: S,
        composer: ComposerBackend,
        batch_size: usize,
        flush_timeout: Duration,
    ) -> Self {
        Self {
            sink,
            composer,
            batch: Vec::with_capacity(batch_size),
            batch_size,
            flush_timeout,
            stats: FlushStats::default(),
        }
    }

    /// ➕ Serialize and buffer one record; flush if that filled the batch.
    pub(crate) async fn add(&mut self, record: &Record) -> Result<()> {
        let document = record.to_document().map_err(|err| ImportError::FlushFailure {
            documents: self.batch.len() + 1,
            reason: format!("could not serialize {}: {err}", record.id),
        })?;
        self.batch.push(document);
        if self.batch.len() >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// 🧹 Flush whatever is left. An empty batch sends nothing at all.
    pub(crate) async fn flush_remainder(&mut self) -> Result<()> {
        if self.batch.is_empty() {
            debug!("🧹 nothing left over to flush");
            return Ok(());
        }
        self.flush().await
    }

    /// 🗑️ Let the sink finish up (flush buffers, close files).
    pub(crate) async fn close(&mut self) -> anyhow::Result<()> {
        self.sink.close().await
    }

    pub(crate) fn stats(&self) -> FlushStats {
        self.stats
    }

    /// 📡 Compose the batch and send it, within the deadline.
    async fn flush(&mut self) -> Result<()> {
        // 🔄 taken before sending: whatever happens next, a fresh batch starts empty
        let batch = std::mem::take(&mut self.batch);
        let documents = batch.len();
        info!("📦 Indexing {} titles...", documents);

        let payload = self.composer.compose(&batch);
        match tokio::time::timeout(self.flush_timeout, self.sink.send(payload)).await {
            Ok(Ok(())) => {
                self.stats.batches += 1;
                self.stats.documents += documents as u64;
                debug!(
                    "✅ batch #{} landed, {} documents so far",
                    self.stats.batches, self.stats.documents
                );
                Ok(())
            }
            Ok(Err(err)) => Err(ImportError::FlushFailure {
                documents,
                reason: format!("{err:#}"),
            }),
            Err(_elapsed) => Err(ImportError::FlushTimeout {
                documents,
                timeout: self.flush_timeout,
            }),
        }
    }
}
