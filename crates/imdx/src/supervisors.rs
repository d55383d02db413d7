//! 🎬 *[camera pans across a dimly lit server room]*
//! 🎬 "In a world where ten million titles wait in a gzip file..."
//! 🎬 "One supervisor dared to index the movies."
//! 🎬 *[record scratch]* 🦆
//!
//! 📦 The Supervisor wires the pieces together and drives the loop:
//!
//! ```text
//!   SourceBackend ─► TitleCursor ─► SelectionFilter ─► BatchAccumulator ─► Composer ─► SinkBackend
//! ```
//!
//! One task, strictly sequential. The next line is not read while a flush is
//! in flight, so memory stays at one batch plus one decoded chunk.
//!
//! Any error ends the run on the spot: no final flush, no retry, no skipping
//! the bad row. Whatever was already flushed stays flushed.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};

use crate::accumulator::BatchAccumulator;
use crate::app_config::AppConfig;
use crate::backends::{LineSource, Sink, SinkBackend, SourceBackend};
use crate::composers::ComposerBackend;
use crate::cursor::TitleCursor;
use crate::selection::SelectionFilter;

/// 📊 The receipt at the end of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// 📄 Data lines decoded into titles.
    pub titles_read: u64,
    /// 🎬 Titles the filter let through.
    pub titles_selected: u64,
    /// 📦 Bulk requests that succeeded.
    pub batches_flushed: u64,
    /// ✅ Documents inside those requests.
    pub documents_flushed: u64,
    pub elapsed: Duration,
}

/// 📦 Owns the config, builds the pipeline, runs it once.
pub(crate) struct Supervisor {
    app_config: AppConfig,
}

impl Supervisor {
    pub(crate) fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }

    /// 🚀 Import the whole dataset. Returns the receipt, or the first thing that went wrong.
    ///
    /// Order of operations: refuse a zero batch size, open the source (header
    /// gone), then check the sink can be reached, then stream. The source goes
    /// first so a dataset that isn't there never gets to truncate an output file.
    pub(crate) async fn run(&self) -> Result<ImportSummary> {
        let runtime = &self.app_config.runtime;
        if runtime.batch_size == 0 {
            anyhow::bail!(
                "💀 batch_size = 0 would flush nothing, forever. Pick something positive; 10000 is traditional."
            );
        }
        let started = Instant::now();

        let source = SourceBackend::open(&self.app_config.source_config).await?;
        let mut cursor = TitleCursor::open(source).await?;

        let sink = match SinkBackend::from_config(&self.app_config.sink_config).await {
            Ok(sink) => sink,
            Err(err) => {
                cursor.close().await;
                return Err(err.context("💀 Could not get the sink ready. The import never started."));
            }
        };
        let composer = ComposerBackend::from_sink_config(&self.app_config.sink_config);
        let mut accumulator = BatchAccumulator::new(
            sink,
            composer,
            runtime.batch_size,
            Duration::from_secs(runtime.flush_timeout_secs),
        );
        let filter = SelectionFilter::from_title_types(&runtime.title_types);

        info!(
            "🎬 Streaming titles (batches of {}, keeping {})",
            runtime.batch_size,
            if runtime.title_types.is_empty() {
                "everything".to_string()
            } else {
                runtime.title_types.join(", ")
            }
        );

        let pumped = pump(&mut cursor, &filter, &mut accumulator).await;
        let closed = accumulator.close().await;
        let mut summary = match (pumped, closed) {
            (Ok(summary), Ok(())) => summary,
            (Ok(_), Err(close_err)) => {
                return Err(close_err.context("💀 Every batch landed, but the sink would not close cleanly."));
            }
            (Err(err), close_result) => {
                if let Err(close_err) = close_result {
                    warn!("⚠️ closing the sink after a failed import also failed: {close_err:#}");
                }
                return Err(err.into());
            }
        };
        summary.elapsed = started.elapsed();

        info!(
            "✅ Done: {} titles read, {} selected, {} documents in {} batches",
            summary.titles_read,
            summary.titles_selected,
            summary.documents_flushed,
            summary.batches_flushed
        );
        Ok(summary)
    }
}

/// 🔄 The loop itself. Reads until the cursor runs dry, then flushes what's left.
///
/// On error the remainder is NOT flushed; the partial batch is simply dropped.
/// A cursor error has already closed the source; a flush error closes it here.
async fn pump<L: LineSource, S: Sink>(
    cursor: &mut TitleCursor<L>,
    filter: &SelectionFilter,
    accumulator: &mut BatchAccumulator<S>,
) -> crate::error::Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    while cursor.has_more() {
        let record = cursor.take().await?;
        summary.titles_read += 1;
        if filter.keeps(&record) {
            summary.titles_selected += 1;
            if let Err(err) = accumulator.add(&record).await {
                cursor.close().await;
                return Err(err);
            }
        }
    }
    accumulator.flush_remainder().await?;

    let stats = accumulator.stats();
    summary.batches_flushed = stats.batches;
    summary.documents_flushed = stats.documents;
    Ok(summary)
}
