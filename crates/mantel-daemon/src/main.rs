//! Mantel Daemon - Main entry point
//!
//! Validates the mount configuration, probes the mount, and serves its
//! actuators over HTTP and WebSocket.

mod api;
mod config;
mod server;
mod state;
mod ws;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "mantel")]
#[command(about = "Network remote for motorized mantel mounts")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "mantel.toml")]
    config: PathBuf,

    /// Mount host (overrides configuration)
    #[arg(long)]
    host: Option<String>,

    /// Mount UDP port (overrides configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Probe the mount and exit
    #[arg(long)]
    probe_only: bool,

    /// Start without probing the mount
    #[arg(long, conflicts_with = "probe_only")]
    skip_probe: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    write_default_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Mantel Remote v{}", env!("CARGO_PKG_VERSION"));

    if args.write_default_config {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    // Command line overrides
    if let Some(host) = args.host {
        config.mount.host = Some(host);
    }
    if let Some(port) = args.port {
        config.mount.port = port;
    }
    if let Some(bind) = args.bind {
        config.daemon.bind = bind;
    }

    let destination = config.destination()?;
    info!(dest = %destination, "Configuration loaded");

    if args.probe_only {
        mantel_udp::probe_mount(&destination).await?;
        println!("Mount reachable at {}", destination);
        return Ok(());
    }

    let state = state::AppState::setup(config, !args.skip_probe).await?;
    server::run(state).await
}
