//! Gemini HTTP gateway.
//!
//! Serves Gemini capsules to web browsers: every `GET /<host>/<path>`
//! becomes one Gemini exchange, and gemtext responses are rendered to HTML.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser ──HTTP──▶ http::server ──▶ gemini::client ──TLS──▶ Capsule
//!                            │                  │
//!                            ▼                  ▼
//!     Browser ◀──HTML── http::response ◀── gemtext::{classify, render}
//!
//!     Cross-cutting: config, observability, lifecycle, security, resilience
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use gemini_gateway::config::{loader, GatewayConfig};
use gemini_gateway::lifecycle::{wait_for_signal, Shutdown};
use gemini_gateway::observability::{logging, metrics};
use gemini_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "gemini-gateway")]
#[command(about = "HTTP gateway for Gemini capsules", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;

    tracing::info!("gemini-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        exchange_timeout_secs = config.gemini.exchange_timeout_secs,
        max_body_bytes = config.gemini.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
