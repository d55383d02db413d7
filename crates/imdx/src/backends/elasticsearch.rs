//! 🔍 Elasticsearch backend — where titles go to be found again.
//!
//! 🎬 *[a cluster hums in a rack somewhere. it has been waiting for movies.]*
//!
//! Two halves, one cluster:
//! - `ElasticsearchSink`: POSTs rendered bulk NDJSON to `/_bulk`.
//! - `search_titles`: asks `/{index}/_search` for a title and decodes what comes back.
//!
//! Both share the same config and the same auth rules: API key beats basic auth.

mod elasticsearch_search;
mod elasticsearch_sink;

pub(crate) use elasticsearch_search::search_titles;
pub(crate) use elasticsearch_sink::ElasticsearchSink;
pub use elasticsearch_sink::ElasticsearchSinkConfig;

/// 🔒 Attach credentials to a request. API key first, then basic auth, then nothing.
pub(crate) fn authorize(
    request: reqwest::RequestBuilder,
    config: &ElasticsearchSinkConfig,
) -> reqwest::RequestBuilder {
    if let Some(ref api_key) = config.api_key {
        request.header("Authorization", format!("ApiKey {api_key}"))
    } else if let Some(ref username) = config.username {
        request.basic_auth(username, config.password.as_ref())
    } else {
        request
    }
}
