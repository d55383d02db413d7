use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, trace};

use super::authorize;
use crate::backends::Sink;

/// 🗂️ The index every import has written to since the beginning of time (or the dataset).
pub(crate) const DEFAULT_INDEX: &str = "imdb";

// -- 🔍 ElasticsearchSinkConfig — one cluster, one index, at most one way to prove who you are.
#[derive(Debug, Deserialize, Clone)]
pub struct ElasticsearchSinkConfig {
    /// 📡 Cluster root, e.g. `http://localhost:9200`. Trailing slash forgiven.
    pub url: String,
    /// 🔒 Username. The bouncer at the club. Except the club is a database.
    #[serde(default)]
    pub username: Option<String>,
    /// 🔒 Password. "password123" is not a password. It is a confession.
    #[serde(default)]
    pub password: Option<String>,
    /// 🔒 API key. Wins over username/password when both show up.
    #[serde(default)]
    pub api_key: Option<String>,
    /// 🗂️ Target index for every document.
    #[serde(default = "default_index")]
    pub index: String,
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

impl ElasticsearchSinkConfig {
    /// 📡 `{url}/{path}` without the double slash that haunts string concatenation.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), path)
    }
}

/// 📡 Takes a finished bulk NDJSON payload and POSTs it to `/_bulk`. Nothing else.
///
/// No buffering, no retries, no client-side request timeout: the accumulator
/// upstream owns the deadline and wraps every `send` in it.
#[derive(Debug)]
pub(crate) struct ElasticsearchSink {
    client: reqwest::Client,
    config: ElasticsearchSinkConfig,
}

impl ElasticsearchSink {
    /// 🚀 Build the client and knock on the cluster's front door.
    ///
    /// The root GET has to come back 2xx, otherwise we bail here instead of
    /// ten thousand titles later.
    pub(crate) async fn new(config: ElasticsearchSinkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .context("💀 The HTTP client refused to be born. Probably TLS. It's always TLS.")?;

        info!("🔍 Checking on the cluster at {}...", config.url);
        let response = authorize(client.get(&config.url), &config)
            .send()
            .await
            .context(format!(
                "💀 Knocked on {} and nobody answered. Is the cluster up? Is the URL right? Is it Monday?",
                config.url
            ))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "💀 The cluster at {} answered the door with '{}' and then said '{}'. Not the welcome we hoped for.",
                config.url,
                status,
                body
            );
        }
        debug!("✅ Cluster is home, index '{}' is the target", config.index);

        Ok(Self { client, config })
    }

    async fn submit_bulk_request(&self, request_body: String) -> Result<()> {
        let request = self
            .client
            .post(self.config.endpoint("_bulk"))
            // ⚠️ not application/json. the bulk API is picky.
            .header("Content-Type", "application/x-ndjson");

        let response = authorize(request, &self.config)
            .body(request_body)
            .send()
            .await
            .context("💀 The bulk request never made it. The network took the payload and walked off with it.")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "💀 The bulk request arrived, but the cluster said '{}'. The body read: '{}'.",
                status,
                body
            );
        }
        trace!("🚀 bulk request landed");
        Ok(())
    }
}

#[async_trait]
impl Sink for ElasticsearchSink {
    /// 📡 POST the batch. The composer already wrote the action lines.
    async fn send(&mut self, payload: String) -> Result<()> {
        debug!("📡 Sending {} bytes to /_bulk", payload.len());
        self.submit_bulk_request(payload)
            .await
            .context("💀 The bulk submission stumbled at the finish line.")
    }

    /// 🗑️ Nothing buffered, nothing to flush. The connection pool drops with us.
    async fn close(&mut self) -> Result<()> {
        debug!("🗑️ Elasticsearch sink closing, no buffer to flush");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn cluster() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"tagline\":\"You Know, for Search\"}"))
            .mount(&server)
            .await;
        server
    }

    fn config_for(server: &MockServer) -> ElasticsearchSinkConfig {
        ElasticsearchSinkConfig {
            url: format!("{}/", server.uri()),
            username: None,
            password: None,
            api_key: None,
            index: default_index(),
        }
    }

    #[tokio::test]
    async fn the_one_where_the_payload_lands_on_bulk_as_ndjson() -> Result<()> {
        let server = cluster().await;
        let payload = "{\"index\":{\"_index\":\"imdb\",\"_id\":\"tt1\"}}\n{\"id\":\"tt1\"}\n";
        Mock::given(method("POST"))
            .and(path("/_bulk"))
            .and(header("Content-Type", "application/x-ndjson"))
            .and(body_string(payload))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"errors\":false}"))
            .expect(1)
            .mount(&server)
            .await;

        let mut sink = ElasticsearchSink::new(config_for(&server)).await?;
        sink.send(payload.to_string()).await?;
        sink.close().await?;
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_api_key_beats_the_password() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("Authorization", "ApiKey s3cret"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = ElasticsearchSinkConfig {
            username: Some("elastic".into()),
            password: Some("changeme".into()),
            api_key: Some("s3cret".into()),
            ..config_for(&server)
        };
        ElasticsearchSink::new(config).await?;
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_cluster_rejects_the_batch() -> Result<()> {
        let server = cluster().await;
        Mock::given(method("POST"))
            .and(path("/_bulk"))
            .respond_with(ResponseTemplate::new(429).set_body_string("too many requests"))
            .mount(&server)
            .await;

        let mut sink = ElasticsearchSink::new(config_for(&server)).await?;
        let err = sink
            .send("{}\n".to_string())
            .await
            .expect_err("💀 a 429 should not count as a flush");
        assert!(format!("{err:#}").contains("429"));
        Ok(())
    }

    #[tokio::test]
    async fn the_one_where_the_cluster_is_not_home() {
        let url = {
            let server = MockServer::start().await;
            server.uri()
        };
        let config = ElasticsearchSinkConfig {
            url,
            username: None,
            password: None,
            api_key: None,
            index: default_index(),
        };
        assert!(ElasticsearchSink::new(config).await.is_err());
    }

    #[test]
    fn the_one_where_the_index_defaults_to_imdb() -> Result<()> {
        let config: ElasticsearchSinkConfig =
            serde_json::from_str("{\"url\":\"http://localhost:9200\"}")?;
        assert_eq!(config.index, "imdb");
        assert_eq!(config.endpoint("_bulk"), "http://localhost:9200/_bulk");
        Ok(())
    }
}
