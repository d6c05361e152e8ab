//! Content gateway.
//!
//! Serves content-addressed trees over HTTP, with `_redirects` fallback
//! rules for sites published on their own origin.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ http::host ──▶ resolution::pipeline
//!                                                        │        │
//!                                                        ▼        ▼
//!                                                     store    redirects
//!                                                        │
//!     Client Response                                    ▼
//!     ◀────────────── http::response ◀───────────── Resolution
//!
//!     Cross-cutting: config (load, validate, watch), observability, lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use content_gateway::config::{load_config, ConfigWatcher, GatewayConfig};
use content_gateway::lifecycle::{wait_for_shutdown_signal, Shutdown};
use content_gateway::observability::{init_logging, metrics};
use content_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "content-gateway")]
#[command(about = "Content-addressed HTTP gateway with _redirects support", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability);
    tracing::info!("content-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        store_root = %config.store.root,
        offline = config.store.offline,
        redirects_enabled = config.redirects.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Hot reload only when a file was given
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => (tokio::sync::mpsc::unbounded_channel().1, None),
    };

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config)?;

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
