//! Events submitted to the dispatcher
//!
//! `Event` is the closed set of things a connection can cause. `classify`
//! turns one line of input into at most one event without touching shared
//! state.

use crate::message::Command;
use crate::outbox::Outbox;
use crate::participant::Participant;
use crate::types::ParticipantId;

/// Events sent from connection handlers to the dispatcher
#[derive(Debug)]
pub enum Event {
    /// Participant connected; hands its outbox to the registry
    Join {
        id: ParticipantId,
        name: String,
        outbox: Outbox,
    },
    /// Participant disconnected
    Leave { id: ParticipantId },
    /// Participant sent a chat line
    Message { id: ParticipantId, text: String },
    /// Participant changed display name; `previous != new`
    Rename {
        id: ParticipantId,
        previous: String,
        new: String,
    },
    /// Participant rang the bell
    Attention { id: ParticipantId },
}

impl Event {
    /// Build the join event for a freshly connected participant
    pub fn join(participant: &Participant, outbox: Outbox) -> Self {
        Event::Join {
            id: participant.id,
            name: participant.name().to_string(),
            outbox,
        }
    }

    /// Build the leave event for a participant
    pub fn leave(participant: &Participant) -> Self {
        Event::Leave { id: participant.id }
    }

    /// The participant this event originates from
    pub fn participant_id(&self) -> ParticipantId {
        match self {
            Event::Join { id, .. }
            | Event::Leave { id }
            | Event::Message { id, .. }
            | Event::Rename { id, .. }
            | Event::Attention { id } => *id,
        }
    }
}

/// Classify one line of input from `participant`
///
/// Empty lines and renames to the current name yield no event.
pub fn classify(participant: &Participant, line: &str) -> Option<Event> {
    let id = participant.id;

    match Command::parse(line)? {
        Command::Rename(new) => {
            if new == participant.name() {
                return None;
            }
            Some(Event::Rename {
                id,
                previous: participant.name().to_string(),
                new,
            })
        }
        Command::Bell => Some(Event::Attention { id }),
        Command::Say(text) => Some(Event::Message { id, text }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbox;

    use proptest::prelude::*;

    #[test]
    fn test_classify_empty_line() {
        let participant = Participant::new("anon");
        assert!(classify(&participant, "").is_none());
    }

    #[test]
    fn test_classify_message() {
        let participant = Participant::new("anon");
        match classify(&participant, "hello") {
            Some(Event::Message { id, text }) => {
                assert_eq!(id, participant.id);
                assert_eq!(text, "hello");
            }
            other => panic!("Wrong event: {:?}", other),
        }
    }

    #[test]
    fn test_classify_rename() {
        let participant = Participant::new("127.0.0.1:5000");
        match classify(&participant, "/name Alice") {
            Some(Event::Rename { id, previous, new }) => {
                assert_eq!(id, participant.id);
                assert_eq!(previous, "127.0.0.1:5000");
                assert_eq!(new, "Alice");
            }
            other => panic!("Wrong event: {:?}", other),
        }
    }

    #[test]
    fn test_classify_rename_to_same_name() {
        let participant = Participant::new("Alice");
        assert!(classify(&participant, "/name Alice").is_none());
    }

    #[test]
    fn test_classify_bell() {
        let participant = Participant::new("Bob");
        assert!(matches!(
            classify(&participant, "/bell"),
            Some(Event::Attention { id }) if id == participant.id
        ));
    }

    #[test]
    fn test_classify_unknown_command_is_literal_message() {
        let participant = Participant::new("Bob");
        assert!(matches!(
            classify(&participant, "/me waves"),
            Some(Event::Message { text, .. }) if text == "/me waves"
        ));
    }

    #[test]
    fn test_classify_does_not_change_participant() {
        let participant = Participant::new("anon");
        let before = participant.clone();
        let _ = classify(&participant, "/name Alice");
        assert_eq!(participant, before);
    }

    #[test]
    fn test_join_and_leave_constructors() {
        let participant = Participant::new("anon");
        let (outbox, _rx) = outbox::channel(1);

        let join = Event::join(&participant, outbox);
        assert!(matches!(&join, Event::Join { name, .. } if name == "anon"));
        assert_eq!(join.participant_id(), participant.id);
        assert!(matches!(
            Event::leave(&participant),
            Event::Leave { id } if id == participant.id
        ));
    }

    /// Comparable summary of an event, ignoring the outbox
    fn summary(event: &Option<Event>) -> Option<(ParticipantId, String, String, String)> {
        event.as_ref().map(|event| match event {
            Event::Join { id, name, .. } => (*id, "join".into(), name.clone(), String::new()),
            Event::Leave { id } => (*id, "leave".into(), String::new(), String::new()),
            Event::Message { id, text } => (*id, "message".into(), text.clone(), String::new()),
            Event::Rename { id, previous, new } => {
                (*id, "rename".into(), previous.clone(), new.clone())
            }
            Event::Attention { id } => (*id, "attention".into(), String::new(), String::new()),
        })
    }

    proptest! {
        /// Property: classification is deterministic
        #[test]
        fn classify_is_deterministic(
            name in "[a-zA-Z0-9 ]{1,12}",
            line in "(/name |/bell|/)?[a-zA-Z0-9 ]{0,16}"
        ) {
            let participant = Participant::new(name);
            let first = classify(&participant, &line);
            let second = classify(&participant, &line);
            prop_assert_eq!(summary(&first), summary(&second));
        }

        /// Property: a rename event always changes the name
        #[test]
        fn classify_never_emits_noop_rename(
            name in "[a-zA-Z]{1,8}",
            line in "/name [a-zA-Z]{0,8}"
        ) {
            let participant = Participant::new(name);
            if let Some(Event::Rename { previous, new, .. }) = classify(&participant, &line) {
                prop_assert_ne!(previous, new);
            }
        }

        /// Property: renaming to the current name yields nothing
        #[test]
        fn rename_to_current_name_is_suppressed(name in "[a-zA-Z]{1,8}") {
            let participant = Participant::new(name.clone());
            let line = format!("/name {}", name);
            prop_assert!(classify(&participant, &line).is_none());
        }
    }
}
