//! 🔧 App Configuration — the sacred TOML-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the junk drawer. Nothing." — every developer at 3am 🦆
//!
//! 🏗️ Powered by Figment: `IMDX_*` environment variables first, an optional
//! TOML file on top. The file wins when both have an opinion.

use std::path::Path;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use tracing::info;

use crate::backends::{
    ElasticsearchSinkConfig, FileSinkConfig, FileSourceConfig, HttpSourceConfig,
};

/// 📦 One struct to rule them all: where titles come from, where they go, and how.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// 📡 Where the gzipped dataset comes from.
    #[serde(default)]
    pub source_config: SourceConfig,
    pub sink_config: SinkConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// 🚰 The dataset's address. Over the wire by default.
#[derive(Debug, Deserialize, Clone)]
pub enum SourceConfig {
    Http(HttpSourceConfig),
    File(FileSourceConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Http(HttpSourceConfig::default())
    }
}

/// 🕳️ Where selected titles end up.
#[derive(Debug, Deserialize, Clone)]
pub enum SinkConfig {
    Elasticsearch(ElasticsearchSinkConfig),
    File(FileSinkConfig),
    InMemory(()),
}

/// ⚙️ The knobs of the import loop itself.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// 📦 Titles per bulk request. Zero is refused at startup.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// ⏱️ Seconds a single flush may take before the import gives up.
    #[serde(default = "default_flush_timeout_secs")]
    pub flush_timeout_secs: u64,
    /// 🎬 Which `titleType`s get indexed. Empty means all of them.
    #[serde(default = "default_title_types")]
    pub title_types: Vec<String>,
}

fn default_batch_size() -> usize {
    10_000
}

fn default_flush_timeout_secs() -> u64 {
    30
}

fn default_title_types() -> Vec<String> {
    vec!["movie".to_string()]
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            flush_timeout_secs: default_flush_timeout_secs(),
            title_types: default_title_types(),
        }
    }
}

/// 🚀 Load the config — from a file, from env vars, or from the sheer power of hoping.
///
/// - `None` → `IMDX_*` env vars only.
/// - `Some(path)` → env vars + TOML file, merged. TOML wins on conflicts.
///
/// 💀 Unparseable config is an error with the file name in it.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = Figment::new().merge(Env::prefixed("IMDX_").split("__"));
    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables (IMDX_*). \
             The file exists in our hearts, but apparently not in a shape serde recognizes.",
            path.display()
        ),
        None => "💀 Failed to parse configuration from environment variables (IMDX_*). \
                 No file was provided, so this one's all on the environment."
            .to_string(),
    };

    config.extract().context(context_msg)
}
