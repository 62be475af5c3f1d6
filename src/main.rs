//! AeroDesk - Airport Services Query Engine
//!
//! Interactive CLI: reads one question per line from stdin and prints the
//! engine's answer with confidence and sources.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session with the default config
//! cargo run --release
//!
//! # Explicit session id and config file
//! ./aerodesk --session kiosk-7 --config aerodesk.toml
//! ```
//!
//! # Environment Variables
//!
//! - `AERODESK_CONFIG`: Path to the TOML config (default: ./aerodesk.toml)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use aerodesk::{EngineConfig, Query, QueryEngine, SledContentCache};

#[derive(Parser, Debug)]
#[command(name = "aerodesk")]
#[command(about = "Airport services query engine for Muscat International Airport")]
#[command(version)]
struct CliArgs {
    /// Session id for conversational context
    #[arg(short, long, default_value = "cli")]
    session: String,

    /// Path to a TOML config file (overrides AERODESK_CONFIG)
    #[arg(short, long)]
    config: Option<String>,

    /// Directory for the persistent content cache
    #[arg(long, default_value = "aerodesk-cache")]
    cache_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config from {path}"))?
            .with_default_sources(),
        None => EngineConfig::load(),
    };

    let cache = SledContentCache::open(&args.cache_dir)
        .with_context(|| format!("opening content cache at {}", args.cache_dir))?;
    let engine = QueryEngine::builder(config)
        .cache(Arc::new(cache))
        .build()?;

    info!(session = %args.session, "AeroDesk ready - type a question, Ctrl-D to exit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let response = engine.handle(&Query::new(text, &args.session)).await;
        println!("\n{}", response.text);
        println!(
            "  [intent: {} | confidence: {:.2} | {}ms]",
            response.intent, response.confidence, response.elapsed_ms
        );
        for source in &response.sources {
            println!("  source: {} ({})", source.title, source.url);
        }
        if !response.suggested_actions.is_empty() {
            println!("  you could also: {}", response.suggested_actions.join("; "));
        }
        if response.requires_human {
            println!("  (flagged for staff follow-up)");
        }
        println!();
    }

    Ok(())
}
