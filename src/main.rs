//! Portal entry point: tracing, configuration, listener, server.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scival_portal::config::{load_config, PortalConfig};
use scival_portal::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "scival-portal", about = "Server-rendered front-end for scholarly metrics")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scival_portal=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            tracing::warn!("no config file supplied, using defaults (upstream API key unset)");
            PortalConfig::default()
        }
    };

    if let Some(port) = args.port {
        match config.listener.bind_address.parse::<SocketAddr>() {
            Ok(mut addr) => {
                addr.set_port(port);
                config.listener.bind_address = addr.to_string();
            }
            Err(e) => tracing::warn!(error = %e, "ignoring --port, bind address unparseable"),
        }
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    let server = HttpServer::new(config)?;

    tracing::info!(address = %local_addr, "Portal listening");
    server.run(listener).await?;

    Ok(())
}
