//! Participant registry
//!
//! The live set of participants and their display names. Membership is the
//! sole definition of who receives broadcasts. Owned by the dispatcher and
//! never shared.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::error::RegistryError;
use crate::outbox::{Line, Outbox, Push};
use crate::types::ParticipantId;

/// A registered participant
#[derive(Debug)]
pub struct Member {
    /// Authoritative display name
    pub name: String,
    /// Only sender into this participant's delivery channel
    pub outbox: Outbox,
    /// Lines dropped since the outbox last accepted one
    dropped: usize,
}

/// Outcome of one broadcast across all members
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Members whose outbox accepted the line
    pub queued: usize,
    /// Members whose outbox was full
    pub dropped: usize,
    /// Members whose delivery task is already gone
    pub closed: usize,
}

/// Registry of connected participants
#[derive(Debug, Default)]
pub struct Registry {
    members: HashMap<ParticipantId, Member>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant
    ///
    /// Changes nothing if `id` is already registered; the offered outbox is
    /// dropped and `AlreadyMember` returned.
    pub fn add(
        &mut self,
        id: ParticipantId,
        name: String,
        outbox: Outbox,
    ) -> Result<(), RegistryError> {
        if self.members.contains_key(&id) {
            return Err(RegistryError::AlreadyMember(id));
        }
        self.members.insert(
            id,
            Member {
                name,
                outbox,
                dropped: 0,
            },
        );
        Ok(())
    }

    /// Unregister a participant
    ///
    /// Dropping the returned member closes its outbox. Removing an absent
    /// participant returns `None`.
    pub fn remove(&mut self, id: ParticipantId) -> Option<Member> {
        self.members.remove(&id)
    }

    /// Overwrite a participant's display name, returning the old one
    pub fn rename(&mut self, id: ParticipantId, name: String) -> Result<String, RegistryError> {
        let member = self
            .members
            .get_mut(&id)
            .ok_or(RegistryError::NotMember(id))?;
        Ok(std::mem::replace(&mut member.name, name))
    }

    /// Offer `line` to every member's outbox without waiting
    ///
    /// A stalled member is warned about once when it starts dropping lines
    /// and once more when its outbox drains.
    pub fn broadcast(&mut self, line: &Line) -> BroadcastReport {
        let mut report = BroadcastReport::default();

        for (id, member) in &mut self.members {
            match member.outbox.push(Line::clone(line)) {
                Push::Queued => {
                    if member.dropped > 0 {
                        info!(
                            "Outbox for {} ({}) draining again after {} dropped lines",
                            member.name, id, member.dropped
                        );
                        member.dropped = 0;
                    }
                    report.queued += 1;
                }
                Push::Dropped => {
                    if member.dropped == 0 {
                        warn!("Outbox full for {} ({}), dropping lines", member.name, id);
                    }
                    member.dropped += 1;
                    report.dropped += 1;
                }
                Push::Closed => report.closed += 1,
            }
        }

        report
    }

    /// Check if a participant is registered
    #[cfg(test)]
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.members.contains_key(&id)
    }

    /// Get a registered participant's display name
    pub fn name(&self, id: ParticipantId) -> Option<&str> {
        self.members.get(&id).map(|m| m.name.as_str())
    }

    /// Ids of every registered participant, in no particular order
    #[cfg(test)]
    pub fn members(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.members.keys().copied()
    }

    /// Number of registered participants
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if nobody is registered
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
