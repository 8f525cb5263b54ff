//! linechat - Entry Point
//!
//! Parses the listen address, binds it and serves until interrupted.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use linechat::{bind, serve, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Exits with a usage message and status 2 on a bad command line
    let config = Config::parse();

    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=linechat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("linechat=info")),
        )
        .init();

    let listener = match bind(&config).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to listen on {}: {}", config.listen, e);
            return Err(e.into());
        }
    };
    info!("Listening for connections on {}", listener.local_addr()?);

    tokio::select! {
        _ = serve(listener, config) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Interrupted, shutting down");
        }
    }

    Ok(())
}
