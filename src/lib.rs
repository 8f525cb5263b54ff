//! Line-oriented multi-user chat server
//!
//! Clients connect over TCP and exchange newline-delimited text. Every
//! join, leave, message, rename and bell is broadcast to everyone who is
//! connected.
//!
//! # Commands
//! - `/name <new name>` changes your display name
//! - `/bell` rings everyone's bell
//! - anything else is sent as a message
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `Dispatcher` is the only owner of the participant `Registry` and
//!   applies events strictly in queue order
//! - Each connection has a `handler` task that classifies input lines into
//!   `Event`s and submits them through an `EventSender`
//! - Each participant has a bounded `Outbox` drained by its own delivery
//!   task; a full outbox drops lines for that participant only
//!
//! # Example
//! ```ignore
//! use linechat::{bind, serve, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::new("localhost:8000");
//!     let listener = bind(&config).await.unwrap();
//!     serve(listener, config).await;
//! }
//! ```

pub mod codec;
pub mod config;
pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handler;
pub mod listener;
pub mod message;
pub mod outbox;
pub mod participant;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use config::{Config, ConnectionConfig};
pub use dispatcher::{Dispatcher, EventReceiver, EventSender};
pub use error::{AppError, RegistryError};
pub use event::{classify, Event};
pub use handler::handle_connection;
pub use listener::{bind, serve, serve_incoming};
pub use message::{Command, Notification};
pub use participant::Participant;
pub use registry::Registry;
pub use types::ParticipantId;
