//! Per-participant outbound delivery channel
//!
//! A bounded FIFO from the dispatcher to one participant's delivery task.
//! `Outbox` is not `Clone`: the registry holds the only
//! sender, so removing the member is what closes the channel, and it can
//! only happen once.
//!
//! Pushes never wait. A full outbox drops the line for that participant
//! alone, so a slow reader cannot stall the dispatcher or anyone else.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

/// A rendered notification line, shared between every outbox it is pushed to
pub type Line = Arc<str>;

/// Result of offering a line to an outbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push {
    /// The line was queued
    Queued,
    /// The outbox was full; the line was dropped
    Dropped,
    /// The delivery task has gone away
    Closed,
}

/// Sending half, owned by the registry
#[derive(Debug)]
pub struct Outbox {
    sender: mpsc::Sender<Line>,
}

/// Receiving half, owned by the delivery task
#[derive(Debug)]
pub struct OutboxReceiver {
    receiver: mpsc::Receiver<Line>,
}

/// Create an outbox holding at most `capacity` undelivered lines
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn channel(capacity: usize) -> (Outbox, OutboxReceiver) {
    let (sender, receiver) = mpsc::channel(capacity);
    (Outbox { sender }, OutboxReceiver { receiver })
}

impl Outbox {
    /// Offer a line without waiting
    pub fn push(&self, line: Line) -> Push {
        match self.sender.try_send(line) {
            Ok(()) => Push::Queued,
            Err(TrySendError::Full(_)) => Push::Dropped,
            Err(TrySendError::Closed(_)) => Push::Closed,
        }
    }

    /// Whether the delivery task has dropped its receiver
    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl OutboxReceiver {
    /// Wait for the next line
    ///
    /// Returns `None` once the outbox has been dropped and every queued
    /// line has been received.
    pub async fn recv(&mut self) -> Option<Line> {
        self.receiver.recv().await
    }

    /// Take the next line if one is ready
    #[cfg(test)]
    pub fn try_recv(&mut self) -> Result<Line, mpsc::error::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Take every line that is ready right now
    #[cfg(test)]
    pub fn drain(&mut self) -> Vec<Line> {
        let mut lines = Vec::new();
        while let Ok(line) = self.receiver.try_recv() {
            lines.push(line);
        }
        lines
    }
}
