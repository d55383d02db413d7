//! 💀 error.rs — the taxonomy of everything that can go wrong between a gzip
//! stream and a search index. It's a short list. It's a long night.
//!
//! 🧠 Knowledge graph:
//! - Core modules (backends' line sources, parser, cursor, accumulator) return
//!   [`Result`] over [`ImportError`] so callers can tell a dead network from a
//!   bad row from a grumpy cluster.
//! - Sinks and config stay on `anyhow` like the rest of the crate; the
//!   accumulator folds sink failures into [`ImportError::FlushFailure`].
//! - Nothing here is retried. Nothing here is downgraded to a warning.
//!   Every variant bubbles up to whoever called `Supervisor::run`. 🦆

use std::time::Duration;

use thiserror::Error;

/// 📦 Shorthand for results that speak the import error dialect.
pub type Result<T> = std::result::Result<T, ImportError>;

/// 💀 Every way an import can end early.
#[derive(Debug, Error)]
pub enum ImportError {
    /// 📡 The source couldn't be opened, or the first bytes weren't gzip.
    #[error("💀 source '{locator}' is unavailable: {reason}")]
    SourceUnavailable { locator: String, reason: String },

    /// 🌊 The source opened fine and then fell over mid-stream.
    #[error("💀 read failure while streaming the source: {0}")]
    Io(#[from] std::io::Error),

    /// 🧾 A data line refused to become a title.
    #[error("💀 malformed record on line {line_number}: {cause}")]
    MalformedRecord {
        line_number: u64,
        #[source]
        cause: MalformedRow,
    },

    /// 🚰 The sink said no.
    #[error("💀 flushing {documents} documents failed: {reason}")]
    FlushFailure { documents: usize, reason: String },

    /// ⏱️ The sink said nothing for too long.
    #[error("💀 flushing {documents} documents did not finish within {timeout:?}")]
    FlushTimeout { documents: usize, timeout: Duration },

    /// 🏁 `take()` on a cursor that already ran dry. A caller bug, not a data bug.
    #[error("💀 no more titles: the cursor is exhausted")]
    NoMoreElements,
}

/// 🧾 Why a single TSV row could not be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedRow {
    #[error("expected {expected} tab-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("column '{column}' is neither an integer nor \\N: '{raw}'")]
    NotANumber { column: &'static str, raw: String },
}
