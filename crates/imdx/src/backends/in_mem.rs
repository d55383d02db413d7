//! # Previously, on imdx...
//!
//! 🎬 Nobody wants to stand up a search cluster to find out whether a batch of
//! three is really a batch of three. So this module keeps everything in RAM,
//! gone the moment you blink.
//!
//! - [`InMemorySink`] keeps every payload it was sent behind an `Arc<Mutex<...>>`
//!   so tests can inspect what arrived after the pipeline took ownership.
//! - `InMemorySource` (tests only) serves lines from a string, header and all,
//!   and counts how many times it was closed. Exactly once, or we riot.
//!
//! 🦆
//!
//! ⚠️ Not for a real import. Ten million titles in a Vec is a cry for help.

#[cfg(test)]
mod in_mem_source;
mod in_mem_sink;

pub(crate) use in_mem_sink::InMemorySink;
#[cfg(test)]
pub(crate) use in_mem_source::InMemorySource;
