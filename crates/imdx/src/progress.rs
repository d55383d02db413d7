// AI
//! 📊 progress.rs — "Are we there yet?" — every import, every time, forever.
//!
//! 🚀 The dataset is a few hundred MiB of gzip and ten-million-ish lines of titles.
//! This module watches the *compressed* bytes go by (that's what Content-Length
//! tells us about) and counts the lines that come out the other end.
//!
//! ⚠️  Warning: Watching this progress bar will not make the CDN go faster.
//!
//! 🦆 The duck is just vibing.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::NOTHING};
use indicatif::{ProgressBar, ProgressStyle};

// -- 📏 one mebibyte. not a megabyte. the hill remains occupied.
const MIB: f64 = 1024.0 * 1024.0;

// -- ⏱️ how far back the rate calculation looks
const RATE_WINDOW: Duration = Duration::from_secs(5);

/// 🔢 "1234567" → "1,234,567". Eyes everywhere rejoice.
pub(crate) fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// ⏱️ MM:SS, or HH:MM:SS when the import has become a lifestyle.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// 📡 Throughput over the sliding window.
struct Rates {
    lines_per_sec: f64,
    mib_per_sec: f64,
}

/// 📊 Tracks compressed bytes pulled and lines decoded for one source.
///
/// The bar length is the compressed size when we know it (HTTP Content-Length,
/// file metadata) and 0 when we don't, in which case percentages and ETAs
/// politely show `--`.
pub(crate) struct ProgressMetrics {
    source_name: String,
    total_size: u64,
    total_bytes: u64,
    total_lines: u64,
    progress_bar: ProgressBar,
    // 🔄 (when, bytes so far, lines so far), oldest first
    rate_samples: VecDeque<(Instant, u64, u64)>,
    start_time: Instant,
}

impl std::fmt::Debug for ProgressMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // -- 🎭 ProgressBar does not do Debug. we do it for it.
        f.debug_struct("ProgressMetrics")
            .field("source_name", &self.source_name)
            .field("total_size", &self.total_size)
            .field("total_bytes", &self.total_bytes)
            .field("total_lines", &self.total_lines)
            .finish()
    }
}

impl ProgressMetrics {
    /// 🚀 New tracker for `source_name`. `total_size` of 0 means "no idea".
    pub(crate) fn new(source_name: String, total_size: u64) -> Self {
        let progress_bar = ProgressBar::new(total_size);
        // -- 🐛 the template is a literal; if it ever fails to parse we just keep the default style
        if let Ok(style) = ProgressStyle::default_bar().template("{msg}\n| [{bar:40.cyan/blue}]") {
            progress_bar.set_style(style.progress_chars("=>-"));
        }

        let start_time = Instant::now();
        let mut rate_samples = VecDeque::new();
        rate_samples.push_back((start_time, 0, 0));

        Self {
            source_name,
            total_size,
            total_bytes: 0,
            total_lines: 0,
            progress_bar,
            rate_samples,
            start_time,
        }
    }

    /// 🔄 Account for another chunk's worth of bytes and the lines handed out since last time.
    pub(crate) fn update(&mut self, bytes_read: u64, lines_read: u64) {
        self.total_bytes += bytes_read;
        self.total_lines += lines_read;

        let rates = self.calculate_rates();
        self.render(rates);
        self.progress_bar.set_position(self.total_bytes);
    }

    /// ✅ Done. Ring the bell.
    pub(crate) fn finish(&self) {
        self.progress_bar.finish();
    }

    fn percent(&self) -> Option<f64> {
        (self.total_size > 0).then(|| self.total_bytes as f64 / self.total_size as f64 * 100.0)
    }

    fn calculate_rates(&mut self) -> Rates {
        let now = Instant::now();
        while let Some(&(timestamp, _, _)) = self.rate_samples.front() {
            if now.duration_since(timestamp) <= RATE_WINDOW {
                break;
            }
            self.rate_samples.pop_front();
        }
        self.rate_samples
            .push_back((now, self.total_bytes, self.total_lines));

        let Some(&(oldest, oldest_bytes, oldest_lines)) = self.rate_samples.front() else {
            return Rates { lines_per_sec: 0.0, mib_per_sec: 0.0 };
        };
        let elapsed = now.duration_since(oldest).as_secs_f64();
        if elapsed <= 0.0 {
            // -- 💤 a window of zero seconds has no opinions
            return Rates { lines_per_sec: 0.0, mib_per_sec: 0.0 };
        }

        Rates {
            lines_per_sec: self.total_lines.saturating_sub(oldest_lines) as f64 / elapsed,
            mib_per_sec: self.total_bytes.saturating_sub(oldest_bytes) as f64 / MIB / elapsed,
        }
    }

    /// 🎨 Three right-aligned rows under the source name:
    /// ```text
    ///   <lines/s>   <lines>
    ///   <MiB/s>     <MiB read / MiB total>
    ///   <elapsed>   <percent, remaining>
    /// ```
    fn render(&self, rates: Rates) {
        let elapsed = self.start_time.elapsed();
        let (percent, remaining) = match self.percent() {
            Some(percent) if percent > 0.0 => {
                // 🔮 linear extrapolation. the future looks like the past. historically wrong, usually close.
                let total_secs = elapsed.as_secs_f64() / (percent / 100.0);
                let left = (total_secs - elapsed.as_secs_f64()).max(0.0);
                (format!("{percent:.2}%"), format_duration(Duration::from_secs_f64(left)))
            }
            _ => ("--%".to_string(), "--:--".to_string()),
        };
        let size = if self.total_size > 0 {
            format!("{:.2} MiB", self.total_size as f64 / MIB)
        } else {
            "?".to_string()
        };

        let right = |text: String| Cell::new(text).set_alignment(CellAlignment::Right);
        let mut table = Table::new();
        table.load_preset(NOTHING);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.add_row(vec![
            right(format!("{} lines/s", format_number(rates.lines_per_sec as u64))),
            right(format!("{} lines", format_number(self.total_lines))),
        ]);
        table.add_row(vec![
            right(format!("{:.2} MiB/s", rates.mib_per_sec)),
            right(format!("{:.2} MiB / {}", self.total_bytes as f64 / MIB, size)),
        ]);
        table.add_row(vec![
            right(format!("{} elapsed", format_duration(elapsed))),
            right(format!("{percent}, {remaining} remaining")),
        ]);

        self.progress_bar
            .set_message(format!("source: {}\n{}", self.source_name, table));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_big_numbers_get_their_commas() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(10_748_511), "10,748,511");
    }

    #[test]
    fn the_one_where_durations_grow_an_hour_column_only_when_needed() {
        assert_eq!(format_duration(Duration::from_secs(59)), "00:59");
        assert_eq!(format_duration(Duration::from_secs(61)), "01:01");
        assert_eq!(format_duration(Duration::from_secs(3723)), "01:02:03");
    }

    #[test]
    fn the_one_where_totals_accumulate_and_percent_needs_a_size() {
        let mut known = ProgressMetrics::new("test://known".into(), 200);
        known.update(50, 10);
        known.update(50, 5);
        assert_eq!((known.total_bytes, known.total_lines), (100, 15));
        assert_eq!(known.percent(), Some(50.0));

        let mut unknown = ProgressMetrics::new("test://unknown".into(), 0);
        unknown.update(50, 10);
        assert_eq!(unknown.percent(), None);
        unknown.finish();
    }
}
