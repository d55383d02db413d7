// ai
//! 📂 Previously, on "Things That Could Go Wrong With A File"...
//!
//! Somebody downloaded the dataset once, on hotel wifi, and swore they would
//! never do it again. This module is for them. It reads the very same gzipped
//! TSV from local disk through the very same decoder the HTTP source uses, and
//! it can write the selected documents back out as NDJSON for whoever wants to
//! look at them without spinning up a cluster.
//!
//! 🚰 disk → FileSource → GzipLines → cursor ... accumulator → composer → FileSink → BufWriter
//! 💀 Disk full → your problem now
//! 🦆 (mandatory, no notes)

mod file_sink;
mod file_source;

pub(crate) use file_sink::FileSink;
pub use file_sink::FileSinkConfig;
pub(crate) use file_source::FileSource;
pub use file_source::FileSourceConfig;
