// ai
//! 🎬 *[the batch is full. the sink hungers.]*
//! *["Compose me," whispers the payload. "Make me whole."]*
//!
//! 🎼 Composers turn a batch of already-serialized documents into the one
//! string a sink sends. The sink picks the format by existing:
//!
//! | Sink | Composer | Payload |
//! |---|---|---|
//! | Elasticsearch | `BulkNdjsonComposer` | `{"index":{...}}\n{doc}\n` per document |
//! | File | `NdjsonComposer` | `{doc}\n` per document |
//! | InMemory | `JsonArrayComposer` | `[{doc},{doc}]` |
//!
//! 🦆 (the duck composes... symphonies? payloads? both? the duck has no comment.)

use serde_json::json;

use crate::app_config::SinkConfig;
use crate::common::IndexDocument;

/// 🎼 Assembles a batch into a wire-format payload. Pure string work, no I/O.
pub(crate) trait Composer: std::fmt::Debug {
    fn compose(&self, documents: &[IndexDocument]) -> String;
}

/// 📡 The `/_bulk` dialect: an action line naming index and `_id`, then the source.
///
/// Same `_id` twice in one batch? The cluster applies both in order and the
/// later one wins. Same as across batches. Nobody here deduplicates.
#[derive(Debug, Clone)]
pub(crate) struct BulkNdjsonComposer {
    index: String,
}

impl BulkNdjsonComposer {
    pub(crate) fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
        }
    }
}

impl Composer for BulkNdjsonComposer {
    fn compose(&self, documents: &[IndexDocument]) -> String {
        let estimated_size: usize = documents
            .iter()
            .map(|d| d.body.len() + d.id.len() + self.index.len() + 32)
            .sum();
        let mut payload = String::with_capacity(estimated_size);

        for document in documents {
            // 🔑 json! escapes the id and index for us. quotes in ids are rare, not impossible.
            let action = json!({ "index": { "_index": self.index, "_id": document.id } });
            payload.push_str(&action.to_string());
            payload.push('\n');
            payload.push_str(&document.body);
            payload.push('\n');
        }
        // ✅ trailing \n included. the bulk API insists.
        payload
    }
}

/// 📄 One document per line. For humans with `jq` and no cluster.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NdjsonComposer;

impl Composer for NdjsonComposer {
    fn compose(&self, documents: &[IndexDocument]) -> String {
        let mut payload =
            String::with_capacity(documents.iter().map(|d| d.body.len() + 1).sum());
        for document in documents {
            payload.push_str(&document.body);
            payload.push('\n');
        }
        payload
    }
}

/// 📦 `[doc,doc,doc]`. Valid JSON, so tests can parse a whole flush back in one go.
#[derive(Debug, Clone, Copy)]
pub(crate) struct JsonArrayComposer;

impl Composer for JsonArrayComposer {
    fn compose(&self, documents: &[IndexDocument]) -> String {
        let bodies: Vec<&str> = documents.iter().map(|d| d.body.as_str()).collect();
        format!("[{}]", bodies.join(","))
    }
}

/// 🎭 The polymorphic composer. Same trait → impls → enum → from_config dance as the backends.
#[derive(Debug, Clone)]
pub(crate) enum ComposerBackend {
    BulkNdjson(BulkNdjsonComposer),
    Ndjson(NdjsonComposer),
    JsonArray(JsonArrayComposer),
}

impl ComposerBackend {
    /// 🔧 The payload format follows the destination, not the source.
    pub(crate) fn from_sink_config(sink: &SinkConfig) -> Self {
        match sink {
            SinkConfig::Elasticsearch(es) => Self::BulkNdjson(BulkNdjsonComposer::new(&es.index)),
            SinkConfig::File(_) => Self::Ndjson(NdjsonComposer),
            SinkConfig::InMemory(()) => Self::JsonArray(JsonArrayComposer),
        }
    }
}

impl Composer for ComposerBackend {
    fn compose(&self, documents: &[IndexDocument]) -> String {
        match self {
            Self::BulkNdjson(c) => c.compose(documents),
            Self::Ndjson(c) => c.compose(documents),
            Self::JsonArray(c) => c.compose(documents),
        }
    }
}
