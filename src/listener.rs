//! Accept loop
//!
//! Binds the listen address, starts the dispatcher and spawns a handler for
//! every accepted connection.

use std::io;
use std::net::SocketAddr;

use futures_util::{stream, Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::dispatcher::{self, Dispatcher};
use crate::error::AppError;
use crate::handler::handle_connection;

/// Bind the configured listen address
///
/// Host names are resolved here. Failure is fatal to the server.
pub async fn bind(config: &Config) -> Result<TcpListener, AppError> {
    let listener = TcpListener::bind(config.listen.as_str()).await?;
    Ok(listener)
}

/// Serve chat clients on `listener` forever
///
/// A failed accept is logged and the loop carries on.
pub async fn serve(listener: TcpListener, config: Config) {
    let incoming = stream::poll_fn(|cx| listener.poll_accept(cx).map(Some));
    serve_incoming(incoming, config).await;
}

/// Serve every connection yielded by `incoming` until it ends
pub async fn serve_incoming<I, S>(mut incoming: I, config: Config)
where
    I: Stream<Item = io::Result<(S, SocketAddr)>> + Unpin,
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (events, receiver) = dispatcher::queue(config.queue_capacity.get());
    tokio::spawn(Dispatcher::new(receiver).run());

    info!("Dispatcher actor started");

    let connection = config.connection();

    while let Some(accepted) = incoming.next().await {
        match accepted {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let events = events.clone();

                tokio::spawn(async move {
                    match handle_connection(stream, addr, events, connection).await {
                        Ok(()) => {}
                        Err(e) if e.is_transport() => {
                            warn!("Connection {} ended: {}", addr, e);
                        }
                        Err(e) => error!("Connection handler error for {}: {}", addr, e),
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
