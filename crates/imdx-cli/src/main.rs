//! 🚀 imdx — the front door. Loads config, sets up logging, runs the import
//! (or a search), and prints a receipt. The real work lives in the library. 🦆

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imdx")]
#[command(about = "Stream the title basics dataset into Elasticsearch")]
#[command(version)]
struct Cli {
    /// TOML config file. Defaults to ./imdx.toml when it exists; env vars (IMDX_*) either way.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download, filter and bulk-index the dataset
    Import,
    /// Look up titles by original title in the configured index
    Search {
        /// Title (or part of one) to match
        title: String,
        /// Offset of the first hit
        #[arg(long, default_value_t = 0)]
        from: usize,
        /// Number of hits per page
        #[arg(long, default_value_t = 50)]
        size: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // 🔒 an explicit --config must exist; the implicit default is allowed to be missing
    let config_file = match cli.config {
        Some(path) => {
            let exists = path.try_exists().context(format!(
                "💀 Couldn't check whether '{}' exists. Permissions? A cursed mount? Use an absolute path to be absolutely certain.",
                path.display()
            ))?;
            if !exists {
                anyhow::bail!(
                    "💀 Configuration file '{}' does not exist. Double check the path, or the cwd it's relative to.",
                    path.display()
                );
            }
            Some(path)
        }
        None => {
            let default = PathBuf::from("imdx.toml");
            default.try_exists().unwrap_or(false).then_some(default)
        }
    };

    let app_config = imdx::app_config::load_config(config_file.as_deref()).context(
        "💀 Couldn't load the configuration. Take a look at the file, make sure you didn't forget a sink_config.",
    )?;

    let result = match cli.command {
        Commands::Import => imdx::run(app_config).await.map(print_summary),
        Commands::Search { title, from, size } => imdx::search(&app_config, &title, from, size)
            .await
            .map(|records| {
                println!("Found {} titles for '{}':", records.len(), title);
                for record in records {
                    println!("  {} [{}] {}", record.id, record.kind, record);
                }
            }),
    };

    if let Err(err) = result {
        error!("💀 error: {}", err);
        // -- 🧅 peel the onion of sadness, one layer at a time
        let mut the_vibes_are_giving_connection_issues = false;
        for cause in err.chain().skip(1) {
            error!("⚠️  cause: {}", cause);
            let cause_str = cause.to_string();
            if cause_str.contains("error sending request")
                || cause_str.contains("connection refused")
                || cause_str.contains("Connection refused")
                || cause_str.contains("tcp connect error")
                || cause_str.contains("dns error")
            {
                the_vibes_are_giving_connection_issues = true;
            }
        }

        if the_vibes_are_giving_connection_issues {
            error!(
                "🔧 hint: something isn't reachable. Is Elasticsearch actually running \
                (`docker ps`, `curl localhost:9200`)? Can this machine reach the dataset URL? ☕"
            );
        }

        std::process::exit(1);
    }

    Ok(())
}

/// 🧾 The receipt, as a table.
fn print_summary(summary: imdx::ImportSummary) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["", "count"]);
    let rows = [
        ("titles read", summary.titles_read.to_string()),
        ("titles selected", summary.titles_selected.to_string()),
        ("batches flushed", summary.batches_flushed.to_string()),
        ("documents flushed", summary.documents_flushed.to_string()),
        ("elapsed", imdx::format_duration(summary.elapsed)),
    ];
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}
