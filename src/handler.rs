//! Connection handler
//!
//! One task per client. Registers the participant with the dispatcher,
//! turns input lines into events, and submits the Leave event when the
//! connection goes away.

use std::net::SocketAddr;

use futures_util::{Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodecError};
use tracing::{debug, info, warn};

use crate::codec::{ChatCodec, Inbound};
use crate::config::ConnectionConfig;
use crate::delivery::deliver;
use crate::dispatcher::EventSender;
use crate::error::AppError;
use crate::event::{classify, Event};
use crate::outbox;
use crate::participant::Participant;

/// Handle one client connection
///
/// Spawns the delivery task, joins the chat, then reads until the client
/// disconnects or delivery fails. Always submits Leave once Join was
/// accepted.
pub async fn handle_connection<S>(
    stream: S,
    peer: SocketAddr,
    events: EventSender,
    config: ConnectionConfig,
) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let mut participant = Participant::from_peer(peer);
    let id = participant.id;
    info!("Participant {} connected from {}", id, peer);

    let (reader, writer) = tokio::io::split(stream);
    let codec = ChatCodec::new(config.max_line_length);
    let mut lines = FramedRead::new(reader, codec.clone());
    let sink = FramedWrite::new(writer, codec);

    // Server -> client path
    let (outbox, outbox_rx) = outbox::channel(config.outbox_capacity);
    let (echo_tx, echo_rx) = mpsc::channel(config.outbox_capacity);
    let mut delivery = tokio::spawn(async move {
        if let Err(e) = deliver(outbox_rx, echo_rx, sink).await {
            debug!("Delivery to {} failed: {}", id, e);
        }
        debug!("Delivery task ended for {}", id);
    });

    events.submit(Event::join(&participant, outbox)).await?;

    let erase_echo = config.erase_echo.then_some(&echo_tx);

    // Wait for either side to finish
    let outcome = tokio::select! {
        result = read_lines(&mut participant, &mut lines, &events, erase_echo) => {
            debug!("Read loop ended for {}", id);
            result
        }
        _ = &mut delivery => {
            debug!("Delivery ended before input for {}", id);
            Ok(())
        }
    };

    events.submit(Event::leave(&participant)).await?;
    info!("Participant {} ('{}') disconnected", id, participant.name());

    outcome
}

/// Classify and submit every input line until the stream ends
async fn read_lines<R>(
    participant: &mut Participant,
    lines: &mut R,
    events: &EventSender,
    erase_echo: Option<&mpsc::Sender<()>>,
) -> Result<(), AppError>
where
    R: Stream<Item = Result<Inbound, LinesCodecError>> + Unpin,
{
    while let Some(item) = lines.next().await {
        let line = match item? {
            Inbound::Line(line) => line,
            Inbound::Skipped(reason) => {
                warn!("Skipping input line from {}: {}", participant.id, reason);
                continue;
            }
        };

        if let Some(echo) = erase_echo {
            let _ = echo.try_send(());
        }

        let Some(event) = classify(participant, &line) else {
            continue;
        };

        // Keep the local name in step with what the dispatcher will store
        if let Event::Rename { new, .. } = &event {
            participant.set_name(new.clone());
        }

        events.submit(event).await?;
    }

    Ok(())
}
