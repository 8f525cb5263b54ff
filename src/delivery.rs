//! Delivery task
//!
//! Drains one participant's outbox to its connection, one frame per line,
//! in queue order.

use futures_util::{Sink, SinkExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::codec::Outbound;
use crate::error::AppError;
use crate::outbox::OutboxReceiver;

/// Write every line from `outbox` to `sink`
///
/// Returns once the outbox is closed and drained, closing the sink. Each
/// message on `echo` writes the echo-erase sequence. A write error ends
/// delivery immediately.
pub async fn deliver<S>(
    mut outbox: OutboxReceiver,
    mut echo: mpsc::Receiver<()>,
    mut sink: S,
) -> Result<(), AppError>
where
    S: Sink<Outbound> + Unpin,
    AppError: From<S::Error>,
{
    loop {
        // Erase requests precede the broadcast of the line that caused them.
        tokio::select! {
            biased;
            Some(()) = echo.recv() => sink.send(Outbound::EraseEcho).await?,
            line = outbox.recv() => match line {
                Some(line) => sink.send(Outbound::Line(line)).await?,
                None => break,
            },
        }
    }

    debug!("Outbox closed, closing connection writer");
    sink.close().await?;
    Ok(())
}
