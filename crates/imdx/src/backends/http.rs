// ai
//! 📡 HTTP Backend — the dataset lives on somebody else's CDN and we go get it.
//!
//! INT. CDN EDGE NODE — 4:12 AM. A gzip file sits in cache, a few hundred MiB
//! of every movie, short, and tvEpisode anyone ever bothered to catalogue.
//! A GET request arrives. The bytes start flowing. They do not stop until
//! the last `\N` has crossed the wire.
//!
//! 🧠 Knowledge graph:
//! - `HttpSourceConfig`: url + connect timeout, co-located with the source
//! - `HttpSource`: reqwest GET → `Response::chunk()` → `GzipLines` → `LineSource`
//! - Opening failures (DNS, refused, 404, not gzip) → `SourceUnavailable`
//!
//! 🦆 The duck does not have a CDN account. It watches from the edge.

mod http_source;

pub(crate) use http_source::HttpSource;
pub use http_source::HttpSourceConfig;
