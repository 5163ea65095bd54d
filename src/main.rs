//! Commission intake service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser form (GET /)
//!          │
//!          ▼  POST /api/submit
//!     ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!     │ request id + │───▶│ rate limiter │───▶│  validator   │───▶│     sink     │──▶ spreadsheet
//!     │   tracing    │    │ (per client) │    │ (first rule  │    │ (one append) │
//!     └──────────────┘    └──────┬───────┘    │  that fails) │    └──────┬───────┘
//!                                │            └──────┬───────┘           │
//!                               429                 400                 500 / 200
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use commission_intake::clock::{Clock, SystemClock};
use commission_intake::config::{load_config, IntakeConfig};
use commission_intake::http::IntakeServer;
use commission_intake::lifecycle::{build_sink, Shutdown};
use commission_intake::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "commission-intake", version)]
#[command(about = "Collects classical music commission ideas into a spreadsheet", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => IntakeConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("commission-intake v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        sink = ?config.sink.kind,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sink = build_sink(&config, clock.clone())?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_on_signal());

    IntakeServer::with_clock(config, sink, clock)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
