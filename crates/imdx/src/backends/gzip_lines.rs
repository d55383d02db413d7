// ai
//! 🫁 Gzip Lines — un-squishing a byte stream one chunk at a time and handing
//! out text lines like a deli counter hands out tickets.
//!
//! 🎬 INT. NETWORK BUFFER — CONTINUOUS
//!
//! Bytes arrive compressed, in chunks of whatever size the network felt like.
//! Lines do not respect chunk boundaries. Lines do not respect anything.
//! This module stitches them back together without ever holding the whole
//! dataset in memory, because the whole dataset is ~200MB squished and
//! nobody's laptop wants to be a hero today.
//!
//! 🧠 Knowledge graph:
//! - `GzipLineDecoder`: sync core. `feed(chunk)` → flate2's *write-side* `MultiGzDecoder`
//!   decompresses into a Vec → memchr finds the newlines → `next_line()` hands them out.
//! - `ChunkReader`: anything that can produce compressed chunks (HTTP body, file).
//! - `GzipLines<R>`: async pump gluing the two together, plus progress reporting.
//!   Pulls chunks until a line pops out or the stream ends.
//! - Errors during `open` (header discard) become `SourceUnavailable`; errors after
//!   that are plain `Io`. A stream that ends early fails the gzip trailer check → `Io`.

use std::io::{self, Write};

use async_trait::async_trait;
use flate2::write::MultiGzDecoder;
use tracing::trace;

use crate::error::{ImportError, Result};
use crate::progress::ProgressMetrics;

/// 📦 Something that yields compressed chunks until it doesn't.
///
/// `Ok(None)` = end of stream. The chunk type is whatever the transport already
/// has lying around (`Bytes` for HTTP, `Vec<u8>` for files) so nobody copies twice.
#[async_trait]
pub(crate) trait ChunkReader: Send {
    type Chunk: AsRef<[u8]> + Send;

    async fn next_chunk(&mut self) -> io::Result<Option<Self::Chunk>>;
}

/// 🔪 Sync gzip-to-lines core. Feed it compressed bytes, ask it for lines.
pub(crate) struct GzipLineDecoder {
    // 🪆 multi-member: concatenated gzip files decode as one stream
    decoder: MultiGzDecoder<Vec<u8>>,
    // 📥 decompressed bytes; everything before `consumed` has already been handed out
    pending: Vec<u8>,
    consumed: usize,
    compressed_bytes: u64,
    finished: bool,
}

impl GzipLineDecoder {
    pub(crate) fn new() -> Self {
        Self {
            decoder: MultiGzDecoder::new(Vec::new()),
            pending: Vec::new(),
            consumed: 0,
            compressed_bytes: 0,
            finished: false,
        }
    }

    /// 📥 Push one compressed chunk through the decompressor.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.compressed_bytes += chunk.len() as u64;
        self.decoder.write_all(chunk)?;
        self.decoder.flush()?;
        self.absorb_decoded();
        Ok(())
    }

    /// 🏁 No more compressed input. Verifies the gzip trailer, so a stream that
    /// was cut short errors here instead of pretending it was complete.
    pub(crate) fn finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if self.compressed_bytes == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream was empty: no gzip header to speak of",
            ));
        }
        self.decoder.try_finish()?;
        self.absorb_decoded();
        Ok(())
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    /// 📄 The next complete line, without its `\n` / `\r\n`.
    ///
    /// `None` means "no complete line buffered". Before `finish()` that means
    /// feed me more; after it, that means we're done. A trailing line with no
    /// newline is only released once the stream is finished.
    pub(crate) fn next_line(&mut self) -> io::Result<Option<String>> {
        let unread_len = self.pending.len() - self.consumed;
        let (line_len, advance) = match memchr::memchr(b'\n', &self.pending[self.consumed..]) {
            Some(newline) => (newline, newline + 1),
            None if self.finished && unread_len > 0 => (unread_len, unread_len),
            None => return Ok(None),
        };

        let start = self.consumed;
        self.consumed += advance;
        let mut raw = &self.pending[start..start + line_len];
        if let [rest @ .., b'\r'] = raw {
            raw = rest;
        }

        String::from_utf8(raw.to_vec())
            .map(Some)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    // 🧹 move freshly decompressed bytes into `pending`, compacting what was already read
    fn absorb_decoded(&mut self) {
        let decoded = self.decoder.get_mut();
        if decoded.is_empty() {
            return;
        }
        if self.consumed > 0 {
            self.pending.drain(..self.consumed);
            self.consumed = 0;
        }
        self.pending.append(decoded);
    }
}

/// 🚰 Async line pump over any [`ChunkReader`].
pub(crate) struct GzipLines<R: ChunkReader> {
    reader: R,
    decoder: GzipLineDecoder,
    progress: ProgressMetrics,
    // 🔢 lines handed out since the progress bar last heard from us
    lines_since_update: u64,
}

impl<R: ChunkReader> GzipLines<R> {
    /// 🚀 Wrap the reader and swallow the header line.
    ///
    /// Anything that goes wrong here (dead stream, bytes that aren't gzip,
    /// a header that isn't text) means the source never really opened, so it
    /// surfaces as `SourceUnavailable` against `locator`.
    pub(crate) async fn open(reader: R, locator: &str, total_size: u64) -> Result<Self> {
        let mut lines = Self {
            reader,
            decoder: GzipLineDecoder::new(),
            progress: ProgressMetrics::new(locator.to_owned(), total_size),
            lines_since_update: 0,
        };

        // 🗑️ first line is column names. we know them already. see TitleColumn.
        let header = lines
            .next_line()
            .await
            .map_err(|err| ImportError::SourceUnavailable {
                locator: locator.to_owned(),
                reason: err.to_string(),
            })?;
        trace!("🗑️ discarded header line: {:?}", header);
        Ok(lines)
    }

    /// 📄 Next decoded line, or `None` at end of stream.
    pub(crate) async fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(line) = self.decoder.next_line()? {
                self.lines_since_update += 1;
                return Ok(Some(line));
            }
            if self.decoder.is_finished() {
                self.progress
                    .update(0, std::mem::take(&mut self.lines_since_update));
                self.progress.finish();
                return Ok(None);
            }
            match self.reader.next_chunk().await? {
                Some(chunk) => {
                    let chunk = chunk.as_ref();
                    trace!("🫁 inflating {} compressed bytes", chunk.len());
                    self.decoder.feed(chunk)?;
                    self.progress.update(
                        chunk.len() as u64,
                        std::mem::take(&mut self.lines_since_update),
                    );
                }
                None => self.decoder.finish()?,
            }
        }
    }
}

impl<R: ChunkReader> GzipLines<R> {
    /// 🗑️ Let go of the stream. The progress bar gets its ending even when the story stopped early.
    pub(crate) fn release(self) {
        self.progress.finish();
    }
}

impl<R: ChunkReader> std::fmt::Debug for GzipLines<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GzipLines")
            .field("progress", &self.progress)
            .finish()
    }
}
