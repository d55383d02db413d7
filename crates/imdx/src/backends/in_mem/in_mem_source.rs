use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::backends::LineSource;
use crate::error::{ImportError, Result};

/// 📦 The world's most honest line source: a string, split on `\n`.
///
/// Drops the first line on construction like the real sources drop their
/// header. Can be told to blow up after N lines, to see who cleans up.
#[derive(Debug, Clone)]
pub(crate) struct InMemorySource {
    lines: std::collections::VecDeque<String>,
    // 💣 after this many lines, next_line() fails with an Io error
    fail_after: Option<usize>,
    served: usize,
    closed: bool,
    /// 🔢 How many times `close()` actually released something. Shared so tests can peek.
    pub(crate) close_count: Arc<AtomicUsize>,
}

impl InMemorySource {
    /// 🚀 Serve `text` minus its first line.
    pub(crate) fn from_text(text: &str) -> Self {
        let mut lines: std::collections::VecDeque<String> =
            text.lines().map(str::to_owned).collect();
        lines.pop_front();
        Self {
            lines,
            fail_after: None,
            served: 0,
            closed: false,
            close_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 💣 Serve `lines` good lines, then fail like a dropped connection.
    pub(crate) fn failing_after(mut self, lines: usize) -> Self {
        self.fail_after = Some(lines);
        self
    }

    pub(crate) fn closes(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LineSource for InMemorySource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        if self.closed {
            return Ok(None);
        }
        if self.fail_after == Some(self.served) {
            return Err(ImportError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "the network tripped over a cable",
            )));
        }
        self.served += 1;
        Ok(self.lines.pop_front())
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.close_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
