//! Chess desk server.
//!
//! Serves board sessions, position conversion and the move-suggestion proxy
//! over HTTP/JSON.

use chess_desk::DeskConfig;
use chess_desk_server::{app, AppState};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Chess desk server.
#[derive(Parser)]
#[command(name = "chess-desk-server")]
#[command(about = "Board setup, play and engine move suggestions over HTTP")]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value = "desk.toml")]
    config: PathBuf,

    /// Port to listen on, overriding the configuration file
    #[arg(long)]
    port: Option<u16>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = DeskConfig::load(&args.config)?;
    if let Some(port) = args.port {
        config.port = port;
    }
    tracing::info!("Config: {:?}", args.config);
    tracing::info!("Engine service: {}", config.upstream_url);

    let addr = SocketAddr::new(config.bind, config.port);
    let app = app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
