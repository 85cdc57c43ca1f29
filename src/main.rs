//! UI5 Development Proxy
//!
//! A local development server for SAP UI5 applications built with Tokio and
//! Axum. Requests for framework resources are forwarded to a remote UI5
//! content delivery host; everything else is served from the project root.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                 UI5 DEV PROXY                     │
//!                    │                                                   │
//!   Client Request   │  ┌─────────┐    ┌────────────┐    ┌───────────┐  │
//!   ─────────────────┼─▶│  http   │───▶│ dispatcher │─┬─▶│ transport │──┼──▶ ui5.sap.com
//!                    │  │ server  │    │ (decide)   │ │  │ (reqwest) │  │    /<version>
//!                    │  └─────────┘    └────────────┘ │  └───────────┘  │
//!                    │                                │                 │
//!                    │                                └─▶ static files  │
//!                    │                                    (project root)│
//!                    │                                                   │
//!                    │  Startup (once, before serving):                  │
//!                    │  config ──▶ version resolver ──▶ upstream target  │
//!                    │              (config override | manifest.json)    │
//!                    └──────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod proxy;
pub mod resources;
pub mod version;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::loader::{load_config, ConfigError};
use crate::config::validation::validate_config;
use crate::config::ProxyConfig;
use crate::http::HttpServer;
use crate::proxy::Dispatcher;
use crate::resources::FsResourceReader;

/// Command-line options. Each override takes precedence over the config file.
#[derive(Debug, Parser)]
#[command(name = "ui5-dev-proxy", version, about = "Development proxy for SAP UI5 resources")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "ui5-proxy.toml")]
    config: PathBuf,

    /// Project root to serve static files from.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Listen address, e.g. "127.0.0.1:8080".
    #[arg(long)]
    listen: Option<String>,

    /// UI5 version override, e.g. "1.96.0".
    #[arg(long)]
    ui5_version: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ui5_dev_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("ui5-dev-proxy v0.1.0 starting");

    let cli = Cli::parse();

    // Missing config file means defaults; an unreadable or invalid one is fatal.
    let mut config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        ProxyConfig::default()
    };

    if let Some(root) = cli.root {
        config.serve.root = root;
    }
    if let Some(listen) = cli.listen {
        config.listener.bind_address = listen;
    }
    if let Some(version) = cli.ui5_version {
        config.ui5.version = Some(version);
    }

    // Overrides bypass the loader, so the merged result is validated again.
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        serve_root = %config.serve.root.display(),
        upstream_url = %config.ui5.upstream_url,
        "Configuration loaded"
    );

    // Resolve the upstream target before accepting any traffic. Failures here
    // (unreadable project files, malformed manifest) abort startup.
    let reader = FsResourceReader::new(&config.serve.root);
    let dispatcher = Arc::new(Dispatcher::new(&config.ui5, reader).await?);

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Create and run HTTP server
    let server = HttpServer::new(config, dispatcher);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
