//! geo-router edge host
//!
//! Runs the geo decision function behind a local HTTP listener, standing in
//! for the CDN's edge trigger runtime.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 GEO ROUTER                   │
//!                         │                                              │
//!   Viewer request        │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   (+ viewer country) ───┼─▶│  http   │──▶│ routing  │──▶│  decision │  │
//!                         │  │ server  │   │  tables  │   │  policy   │  │
//!   Edge invocation  ─────┼─▶│ /_edge/ │   └──────────┘   └─────┬─────┘  │
//!                         │  └─────────┘                        │        │
//!                         │        ┌──────────────┬─────────────┤        │
//!                         │        ▼              ▼             ▼        │
//!                         │    302 Found     403 Forbidden   forward ────┼──▶ Regional
//!                         │                                              │    origin
//!                         │  ┌────────────────────────────────────────┐  │
//!                         │  │ config (load once) │ observability     │  │
//!                         │  │ lifecycle          │ (logs, metrics)   │  │
//!                         │  └────────────────────────────────────────┘  │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use geo_router::config::load_config;
use geo_router::observability::{logging, metrics};
use geo_router::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "geo-router")]
#[command(about = "CDN edge geo-router host", long_about = None)]
struct Args {
    /// Routing configuration (TOML, or JSON by extension).
    #[arg(short, long, default_value = "geo-router.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    logging::init_logging(&config.observability)?;

    tracing::info!("geo-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        path = %args.config.display(),
        regions = config.regions.len(),
        default_region = %config.default_region,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
