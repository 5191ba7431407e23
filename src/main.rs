//! API tester backend.
//!
//! Relays HTTP requests on behalf of a browser client, records them in a
//! time-limited history, annotates results through a hosted language model
//! and stores named collections of saved requests.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                   API TESTER                      │
//!   Browser client   │  ┌────────┐   ┌──────────┐   ┌───────────────┐   │
//!   ─────────────────┼─▶│  http  │──▶│  relay   │──▶│ target server │───┼──▶ Internet
//!                    │  │ server │   │ (reqwest)│   └───────────────┘   │
//!                    │  └───┬────┘   └────┬─────┘                       │
//!                    │      │             ├──▶ store::history (SQLite)  │
//!                    │      │             └──▶ annotate (chat API)      │
//!                    │      └──▶ store::collections (SQLite)             │
//!                    │                                                   │
//!                    │  Background: store::retention (7-day sweep)       │
//!                    │  Cross-cutting: config, observability, lifecycle  │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use api_tester::config::load_config;
use api_tester::lifecycle::{signals, Application, Shutdown};
use api_tester::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "api-tester", version, about = "API tester backend")]
struct Args {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address (e.g. 127.0.0.1:5000).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "api-tester starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let app = Application::build(config).await?;
    tracing::info!(address = %app.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());
    app.run(shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
