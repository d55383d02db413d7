use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{ElasticsearchSinkConfig, authorize};
use crate::common::Record;

// -- 📬 Only the parts of a search response we actually read. The rest can stay in the envelope.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(rename = "_source")]
    source: serde_json::Value,
}

/// 🔍 Ask the index which titles sound like `title`. One page, `from`/`size` apiece.
///
/// A `match` on `title.original`, so "godfather" finds "The Godfather" and
/// friends. Hits whose `_source` won't decode as a [`Record`] are logged and
/// skipped; the page carries on without them.
pub(crate) async fn search_titles(
    config: &ElasticsearchSinkConfig,
    title: &str,
    from: usize,
    size: usize,
) -> Result<Vec<Record>> {
    let query = json!({
        "from": from,
        "size": size,
        "query": { "match": { "title.original": title } }
    });
    debug!("🔍 Query: {}", query);

    let client = reqwest::Client::new();
    let request = client
        .post(config.endpoint(&format!("{}/_search", config.index)))
        .header("Content-Type", "application/json")
        .body(query.to_string());

    let response = authorize(request, config)
        .send()
        .await
        .context(format!("💀 The search never reached {}", config.url))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .context("💀 The search answered, then mumbled the rest")?;
    if !status.is_success() {
        anyhow::bail!(
            "💀 Searching '{}' for '{}' came back '{}': {}",
            config.index,
            title,
            status,
            body
        );
    }

    let parsed: SearchResponse = serde_json::from_str(&body)
        .context("💀 The search response did not look like a search response")?;

    Ok(parsed
        .hits
        .hits
        .into_iter()
        .filter_map(|hit| match serde_json::from_value::<Record>(hit.source) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "⚠️ Skipping hit {} that doesn't look like a title: {}",
                    hit.id.as_deref().unwrap_or("<no id>"),
                    err
                );
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ElasticsearchSinkConfig {
        ElasticsearchSinkConfig {
            url: server.uri(),
            username: None,
            password: None,
            api_key: None,
            index: "imdb".into(),
        }
    }

    #[tokio::test]
    async fn the_one_where_a_match_query_brings_back_the_godfather() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/imdb/_search"))
            .and(body_json(json!({
                "from": 0,
                "size": 50,
                "query": { "match": { "title.original": "godfather" } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "took": 3,
                "hits": { "total": { "value": 2 }, "hits": [
                    { "_id": "tt0068646", "_source": {
                        "id": "tt0068646", "kind": "movie",
                        "title": { "primary": "The Godfather", "original": "The Godfather" },
                        "adult": false, "startYear": 1972, "runtimeMinutes": 175,
                        "genres": ["Crime", "Drama"]
                    }},
                    { "_id": "junk", "_source": { "someone": "else's document" } }
                ]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let found = search_titles(&config_for(&server), "godfather", 0, 50).await?;

        assert_eq!(found.len(), 1, "the junk hit gets skipped");
        assert_eq!(found[0].to_string(), "The Godfather (1972)");
        assert_eq!(found[0].end_year, None);
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_index_does_not_exist() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/imdb/_search"))
            .respond_with(ResponseTemplate::new(404).set_body_string("index_not_found_exception"))
            .mount(&server)
            .await;

        let err = search_titles(&config_for(&server), "anything", 0, 10)
            .await
            .expect_err("💀 a 404 is not an empty result");
        assert!(format!("{err:#}").contains("index_not_found_exception"));
    }
}
