//! Participant struct definition
//!
//! The connection-side view of a participant: its id and the display name
//! the connection believes it has. The dispatcher's registry holds the
//! authoritative copy; this one only feeds event classification.

use std::net::SocketAddr;

use crate::types::ParticipantId;

/// Connected participant as seen by its own connection handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Unique identifier for this participant
    pub id: ParticipantId,
    /// Current display name
    name: String,
}

impl Participant {
    /// Create a participant with a fresh id and the given display name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(),
            name: name.into(),
        }
    }

    /// Create a participant named after its remote address
    pub fn from_peer(addr: SocketAddr) -> Self {
        Self::new(addr.to_string())
    }

    /// Get the current display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the display name
    ///
    /// Called by the handler once it has submitted the matching rename.
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }
}
