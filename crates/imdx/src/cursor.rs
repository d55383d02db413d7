// ai
//! 🎞️ The title cursor — one record of lookahead over a line source.
//!
//! ```text
//!   open ──► Ready(record) ──take──► Ready(next) ──take──► ... ──take──► Exhausted
//!                 │                                                       ▲
//!                 └──────────── malformed line / broken stream ───────────┘ (Err, source closed)
//! ```
//!
//! The cursor always holds the *next* record, so `has_more` is a question about
//! state, not about I/O. The source is closed exactly once: the moment the
//! cursor reaches `Exhausted`, whether that came from end of input or from an
//! error while looking ahead.
//!
//! 🦆 The duck holds one record at a time. It does not juggle.

use tracing::{trace, warn};

use crate::backends::LineSource;
use crate::common::Record;
use crate::error::{ImportError, Result};

/// 🎛️ Where the cursor is in life.
#[derive(Debug)]
enum CursorState {
    /// 🎬 The next record, already parsed and waiting.
    Ready(Record),
    /// 🏁 Nothing left. The source has been closed.
    Exhausted,
}

/// 🎞️ Lazily turns a [`LineSource`] into a sequence of [`Record`]s.
#[derive(Debug)]
pub(crate) struct TitleCursor<S: LineSource> {
    source: S,
    state: CursorState,
    // 📏 1-based position in the underlying file. The header was line 1.
    line_number: u64,
}

impl<S: LineSource> TitleCursor<S> {
    /// 🚀 Wrap an opened source (header already gone) and look ahead once.
    ///
    /// An empty dataset is fine: the cursor starts `Exhausted` and the source
    /// is already closed. A malformed first line is an error, also with the
    /// source closed.
    pub(crate) async fn open(source: S) -> Result<Self> {
        let mut cursor = Self {
            source,
            state: CursorState::Exhausted,
            line_number: 1,
        };
        cursor.refill().await?;
        Ok(cursor)
    }

    /// ❓ Is there a record waiting? No I/O, no side effects.
    pub(crate) fn has_more(&self) -> bool {
        matches!(self.state, CursorState::Ready(_))
    }

    /// 🎬 Hand over the waiting record and look ahead for the next one.
    ///
    /// 💀 `NoMoreElements` when exhausted. `MalformedRecord` / `Io` when the
    /// look-ahead fails; the record in hand is lost with it, and the cursor is
    /// exhausted from then on.
    pub(crate) async fn take(&mut self) -> Result<Record> {
        let record = match std::mem::replace(&mut self.state, CursorState::Exhausted) {
            CursorState::Ready(record) => record,
            CursorState::Exhausted => return Err(ImportError::NoMoreElements),
        };
        self.refill().await?;
        Ok(record)
    }

    /// 🗑️ Give up early: drop the waiting record and close the source.
    ///
    /// For when something downstream failed and nobody will `take()` again.
    /// Already exhausted means already closed, so this does nothing. A failing
    /// close is logged, since the caller is busy with a more interesting error.
    pub(crate) async fn close(&mut self) {
        if let CursorState::Exhausted = std::mem::replace(&mut self.state, CursorState::Exhausted) {
            return;
        }
        trace!("🗑️ closing the source early at line {}", self.line_number);
        if let Err(close_err) = self.source.close().await {
            warn!("⚠️ closing the source early also failed: {close_err}");
        }
    }

    /// 🔄 Read one line ahead. Leaves the state as `Ready` or as `Exhausted` with
    /// the source closed, never anything in between.
    async fn refill(&mut self) -> Result<()> {
        let next = match self.source.next_line().await {
            Ok(Some(line)) => {
                self.line_number += 1;
                Record::from_tsv_line(&line).map_err(|cause| ImportError::MalformedRecord {
                    line_number: self.line_number,
                    cause,
                })
            }
            Ok(None) => {
                trace!("🏁 end of input after line {}", self.line_number);
                self.state = CursorState::Exhausted;
                return self.source.close().await;
            }
            Err(err) => Err(err),
        };

        match next {
            Ok(record) => {
                self.state = CursorState::Ready(record);
                Ok(())
            }
            Err(err) => {
                self.state = CursorState::Exhausted;
                if let Err(close_err) = self.source.close().await {
                    warn!("⚠️ closing the source after a failure also failed: {close_err}");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::in_mem::InMemorySource;
    use crate::error::MalformedRow;

    const HEADER: &str =
        "tconst\ttitleType\tprimaryTitle\toriginalTitle\tisAdult\tstartYear\tendYear\truntimeMinutes\tgenres";

    fn dataset(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    fn row(id: &str, kind: &str) -> String {
        format!("{id}\t{kind}\tP\tO\t0\t2000\t\\N\t90\tDrama")
    }

    #[tokio::test]
    async fn the_one_where_every_record_comes_out_in_file_order() -> Result<()> {
        let rows = [row("tt1", "movie"), row("tt2", "short"), row("tt3", "movie")];
        let source = InMemorySource::from_text(&dataset(&rows.each_ref().map(String::as_str)));
        let closes = source.close_count.clone();
        let mut cursor = TitleCursor::open(source).await?;

        let mut ids = Vec::new();
        while cursor.has_more() {
            ids.push(cursor.take().await?.id);
        }

        assert_eq!(ids, vec!["tt1", "tt2", "tt3"]);
        assert_eq!(closes.load(std::sync::atomic::Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_taking_past_the_end_is_refused_politely() -> Result<()> {
        let source = InMemorySource::from_text(&dataset(&[&row("tt1", "movie")]));
        let mut cursor = TitleCursor::open(source).await?;

        cursor.take().await?;
        assert!(!cursor.has_more());
        assert!(matches!(cursor.take().await, Err(ImportError::NoMoreElements)));
        assert!(matches!(cursor.take().await, Err(ImportError::NoMoreElements)));
        assert_eq!(cursor.source.closes(), 1, "exhaustion closes once, not per take");
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_a_header_only_file_is_born_exhausted() -> Result<()> {
        let cursor = TitleCursor::open(InMemorySource::from_text(HEADER)).await?;
        assert!(!cursor.has_more());
        assert_eq!(cursor.source.closes(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_has_more_does_not_touch_the_source() -> Result<()> {
        let source = InMemorySource::from_text(&dataset(&[&row("tt1", "movie")]));
        let cursor = TitleCursor::open(source).await?;
        for _ in 0..5 {
            assert!(cursor.has_more());
        }
        assert_eq!(cursor.source.closes(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_a_bad_line_reports_its_real_line_number() -> Result<()> {
        let text = dataset(&[&row("tt1", "movie"), &row("tt2", "movie"), "tt3\tmovie\tshort row"]);
        let mut cursor = TitleCursor::open(InMemorySource::from_text(&text)).await?;

        assert_eq!(cursor.take().await?.id, "tt1");
        // 🧪 taking tt2 looks ahead at line 4, which is the broken one
        let err = cursor.take().await.expect_err("💀 line 4 should not parse");
        match err {
            ImportError::MalformedRecord { line_number, cause } => {
                assert_eq!(line_number, 4);
                assert_eq!(cause, MalformedRow::FieldCount { expected: 9, found: 3 });
            }
            other => panic!("💀 expected MalformedRecord, got {other:?}"),
        }
        assert!(!cursor.has_more());
        assert_eq!(cursor.source.closes(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_giving_up_early_still_closes_exactly_once() -> Result<()> {
        let text = dataset(&[&row("tt1", "movie"), &row("tt2", "movie")]);
        let mut cursor = TitleCursor::open(InMemorySource::from_text(&text)).await?;

        cursor.close().await;
        cursor.close().await;

        assert!(!cursor.has_more());
        assert!(matches!(cursor.take().await, Err(ImportError::NoMoreElements)));
        assert_eq!(cursor.source.closes(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_closing_after_the_end_is_a_no_op() -> Result<()> {
        let mut cursor = TitleCursor::open(InMemorySource::from_text(HEADER)).await?;
        cursor.close().await;
        assert_eq!(cursor.source.closes(), 1, "exhaustion already closed it");
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_first_data_line_is_line_two() {
        let text = dataset(&["tt1\tmovie\tP\tO\t0\tnineteen\t\\N\t90\tDrama"]);
        let result = TitleCursor::open(InMemorySource::from_text(&text)).await;
        assert!(matches!(
            result,
            Err(ImportError::MalformedRecord { line_number: 2, .. })
        ));
    }

    #[tokio::test]
    async fn the_one_where_the_stream_breaks_mid_flight() -> Result<()> {
        let text = dataset(&[&row("tt1", "movie"), &row("tt2", "movie"), &row("tt3", "movie")]);
        let source = InMemorySource::from_text(&text).failing_after(2);
        let closes = source.close_count.clone();
        let mut cursor = TitleCursor::open(source).await?;

        assert_eq!(cursor.take().await?.id, "tt1");
        assert!(matches!(cursor.take().await, Err(ImportError::Io(_))));
        assert!(!cursor.has_more());
        assert!(matches!(cursor.take().await, Err(ImportError::NoMoreElements)));
        assert_eq!(closes.load(std::sync::atomic::Ordering::SeqCst), 1);
        Ok(())
    }
}
