//! Line protocol definitions
//!
//! Inbound lines are parsed into a `Command`; outbound notifications are
//! rendered from a `Notification` through its `Display` impl. Neither side
//! carries framing: the codec adds and strips the trailing newline.

use std::fmt;

/// Prefix of the rename command, including its separating space
const NAME_PREFIX: &str = "/name ";

/// The attention command
const BELL: &str = "/bell";

/// Client → Server command
///
/// What a single input line asks for, before it is bound to a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/name <new>`: change display name
    Rename(String),
    /// `/bell`: ring everyone's bell
    Bell,
    /// Any other non-empty line, verbatim
    Say(String),
}

impl Command {
    /// Parse one line of input
    ///
    /// Returns `None` for an empty line. Unknown `/` commands, and `/name `
    /// with nothing after it, are ordinary messages.
    pub fn parse(line: &str) -> Option<Self> {
        if line.is_empty() {
            return None;
        }

        if let Some(new_name) = line.strip_prefix(NAME_PREFIX) {
            if !new_name.is_empty() {
                return Some(Command::Rename(new_name.to_string()));
            }
        }

        if line == BELL {
            return Some(Command::Bell);
        }

        Some(Command::Say(line.to_string()))
    }
}

/// Server → Client notification
///
/// One variant per outbound line form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A participant joined
    Joined { name: String },
    /// A participant left
    Left { name: String },
    /// A participant said something
    Said { name: String, text: String },
    /// A participant changed name
    Renamed { previous: String, new: String },
    /// A participant rang the bell
    Bell { name: String },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Joined { name } => write!(f, "{} has joined", name),
            Notification::Left { name } => write!(f, "{} has left", name),
            Notification::Said { name, text } => write!(f, "{}: {}", name, text),
            Notification::Renamed { previous, new } => {
                write!(f, "{} is now known as {}", previous, new)
            }
            Notification::Bell { name } => write!(f, "<<< {} rang the bell >>>", name),
        }
    }
}
