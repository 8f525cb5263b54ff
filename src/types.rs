//! Basic type definitions for the chat server
//!
//! Provides the `ParticipantId` newtype, a process-local handle that
//! identifies one connection for its whole lifetime. It is never shown
//! to clients; they only ever see display names.

use uuid::Uuid;

/// Unique participant identifier (newtype pattern)
///
/// Wraps a UUID v4. Display names can change and collide, so the registry
/// and every event key on this instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    /// Create a new random participant ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
