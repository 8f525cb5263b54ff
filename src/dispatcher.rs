//! Event dispatcher actor
//!
//! The single serialization point of the server. Handlers submit events
//! into a bounded queue; the dispatcher takes them one at a time, applies
//! each to the registry and broadcasts the resulting line. Arrival order at
//! the queue is the order every participant observes.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::event::Event;
use crate::message::Notification;
use crate::outbox::{Line, Outbox};
use crate::registry::Registry;
use crate::types::ParticipantId;

/// Handle for submitting events to the dispatcher
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

/// The dispatcher's end of the event queue
#[derive(Debug)]
pub struct EventReceiver {
    receiver: mpsc::Receiver<Event>,
}

/// Create the inbound event queue
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn queue(capacity: usize) -> (EventSender, EventReceiver) {
    let (sender, receiver) = mpsc::channel(capacity);
    (EventSender { sender }, EventReceiver { receiver })
}

impl EventSender {
    /// Submit an event, waiting for queue space
    ///
    /// Once this returns `Ok` the event's position in the total order is fixed.
    pub async fn submit(&self, event: Event) -> Result<(), AppError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| AppError::QueueClosed)
    }
}

/// The dispatcher actor
///
/// Sole owner and mutator of the registry.
pub struct Dispatcher {
    /// Connected participants
    registry: Registry,
    /// Inbound event queue
    receiver: EventReceiver,
}

impl Dispatcher {
    /// Create a dispatcher consuming `receiver`
    pub fn new(receiver: EventReceiver) -> Self {
        Self {
            registry: Registry::new(),
            receiver,
        }
    }

    /// Run the dispatch loop
    ///
    /// Processes events until every `EventSender` is dropped.
    pub async fn run(mut self) {
        info!("Dispatcher started");

        while let Some(event) = self.receiver.receiver.recv().await {
            debug!("Dispatching event from {}", event.participant_id());
            self.handle_event(event);
        }

        info!("Dispatcher shutting down");
    }

    /// Read access to the registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Apply one event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Join { id, name, outbox } => self.handle_join(id, name, outbox),
            Event::Leave { id } => self.handle_leave(id),
            Event::Message { id, text } => self.handle_message(id, text),
            Event::Rename { id, previous, new } => self.handle_rename(id, previous, new),
            Event::Attention { id } => self.handle_attention(id),
        }
    }

    fn handle_join(&mut self, id: ParticipantId, name: String, outbox: Outbox) {
        if let Err(e) = self.registry.add(id, name.clone(), outbox) {
            warn!("Join discarded: {}", e);
            return;
        }

        info!("{} joined as '{}'", id, name);
        self.announce(Notification::Joined { name });
        debug!("Total participants: {}", self.registry.len());
    }

    fn handle_leave(&mut self, id: ParticipantId) {
        let Some(member) = self.registry.remove(id) else {
            warn!("Leave from unregistered participant {} ignored", id);
            return;
        };

        info!("{} ('{}') left", id, member.name);
        self.announce(Notification::Left { name: member.name });
        debug!("Total participants: {}", self.registry.len());
    }

    fn handle_message(&mut self, id: ParticipantId, text: String) {
        let Some(name) = self.registry.name(id) else {
            warn!("Message from unregistered participant {} discarded", id);
            return;
        };

        let name = name.to_string();
        self.announce(Notification::Said { name, text });
    }

    fn handle_rename(&mut self, id: ParticipantId, previous: String, new: String) {
        match self.registry.rename(id, new.clone()) {
            Ok(stored) => {
                if stored != previous {
                    debug!("Rename of {} expected '{}' but found '{}'", id, previous, stored);
                }
                info!("{} renamed '{}' -> '{}'", id, previous, new);
                self.announce(Notification::Renamed { previous, new });
            }
            Err(e) => {
                warn!("Rename discarded: {}", e);
            }
        }
    }

    fn handle_attention(&mut self, id: ParticipantId) {
        let Some(name) = self.registry.name(id) else {
            warn!("Bell from unregistered participant {} discarded", id);
            return;
        };

        let name = name.to_string();
        self.announce(Notification::Bell { name });
    }

    /// Render a notification and broadcast it to every member
    fn announce(&mut self, notification: Notification) {
        let line: Line = notification.to_string().into();
        let report = self.registry.broadcast(&line);

        debug!(
            "Broadcast '{}': queued {}, dropped {}, closed {}",
            line, report.queued, report.dropped, report.closed
        );
    }
}
