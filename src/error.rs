//! Error types for the chat server
//!
//! Connection-level failures end a single connection; registry errors
//! describe events that disagree with the current membership and are
//! discarded by the dispatcher.

use std::io;

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

use crate::types::ParticipantId;

/// Application-level errors
///
/// Every variant is fatal to the connection that hit it and to nothing else.
#[derive(Debug, Error)]
pub enum AppError {
    /// Socket I/O failure
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Line framing error from the transport
    #[error("Line codec error: {0}")]
    Codec(#[from] LinesCodecError),

    /// The dispatcher has stopped and no longer accepts events
    #[error("Event queue closed")]
    QueueClosed,
}

impl AppError {
    /// Whether the error came from the client's socket rather than the server
    ///
    /// Resets and half-written lines are routine for one connection and are
    /// logged quietly.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Io(_) | AppError::Codec(LinesCodecError::Io(_)))
    }
}

/// Registry consistency errors
///
/// Only reachable when events are submitted out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The participant is not (or no longer) registered
    #[error("Participant {0} is not registered")]
    NotMember(ParticipantId),

    /// The participant joined twice
    #[error("Participant {0} is already registered")]
    AlreadyMember(ParticipantId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_reset_is_transport_error() {
        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
        assert!(AppError::Codec(LinesCodecError::Io(reset)).is_transport());

        let refused = io::Error::new(io::ErrorKind::AddrInUse, "in use");
        assert!(AppError::from(refused).is_transport());
    }

    #[test]
    fn test_queue_closed_is_not_transport_error() {
        assert!(!AppError::QueueClosed.is_transport());
        assert!(!AppError::Codec(LinesCodecError::MaxLineLengthExceeded).is_transport());
    }
}
