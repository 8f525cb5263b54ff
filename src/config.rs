//! Command-line configuration
//!
//! The listen address is the only required argument. The remaining flags
//! tune queue bounds and presentation and all have defaults.

use std::num::NonZeroUsize;

use clap::Parser;

/// Default inbound event queue bound
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Default per-participant outbox bound
pub const DEFAULT_OUTBOX_CAPACITY: usize = 64;

/// Default longest accepted input line, in bytes
pub const DEFAULT_MAX_LINE_LENGTH: usize = 4096;

/// Server configuration parsed from the command line
#[derive(Debug, Clone, Parser)]
#[command(name = "linechat", version, about = "Line-oriented multi-user chat server")]
pub struct Config {
    /// Address to listen on as host:port, e.g. 127.0.0.1:8000, localhost:8000 or :8000
    #[arg(value_parser = parse_listen)]
    pub listen: String,

    /// Number of events that may wait for the dispatcher
    #[arg(long, default_value_t = nonzero(DEFAULT_QUEUE_CAPACITY))]
    pub queue_capacity: NonZeroUsize,

    /// Number of lines buffered per participant before new lines are dropped
    #[arg(long, default_value_t = nonzero(DEFAULT_OUTBOX_CAPACITY))]
    pub outbox_capacity: NonZeroUsize,

    /// Longest accepted input line in bytes; longer lines are skipped
    #[arg(long, default_value_t = nonzero(DEFAULT_MAX_LINE_LENGTH))]
    pub max_line_length: NonZeroUsize,

    /// Erase each typed line on the client's terminal so only the broadcast copy remains
    #[arg(long)]
    pub erase_echo: bool,
}

impl Config {
    /// Create a configuration for `listen` with every other setting at its default
    pub fn new(listen: impl Into<String>) -> Self {
        Self {
            listen: listen.into(),
            queue_capacity: nonzero(DEFAULT_QUEUE_CAPACITY),
            outbox_capacity: nonzero(DEFAULT_OUTBOX_CAPACITY),
            max_line_length: nonzero(DEFAULT_MAX_LINE_LENGTH),
            erase_echo: false,
        }
    }

    /// The subset of settings each connection handler needs
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            outbox_capacity: self.outbox_capacity.get(),
            max_line_length: self.max_line_length.get(),
            erase_echo: self.erase_echo,
        }
    }
}

/// Per-connection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub outbox_capacity: usize,
    pub max_line_length: usize,
    pub erase_echo: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            erase_echo: false,
        }
    }
}

/// Check that `value` has the shape `host:port`
///
/// An empty host means every local interface. The host is resolved at bind
/// time, so names such as `localhost` are accepted here.
fn parse_listen(value: &str) -> Result<String, String> {
    let Some((host, port)) = value.rsplit_once(':') else {
        return Err("expected host:port".to_string());
    };
    port.parse::<u16>().map_err(|e| format!("invalid port '{}': {}", port, e))?;

    if host.is_empty() {
        return Ok(format!("0.0.0.0:{}", port));
    }
    Ok(value.to_string())
}

const fn nonzero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("default capacity must be non-zero"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listen_address_only() {
        let config = Config::try_parse_from(["linechat", "127.0.0.1:8000"]).unwrap();
        assert_eq!(config.listen, "127.0.0.1:8000");
        assert_eq!(config.queue_capacity.get(), DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.outbox_capacity.get(), DEFAULT_OUTBOX_CAPACITY);
        assert!(!config.erase_echo);
    }

    #[test]
    fn test_missing_address_is_usage_error() {
        let err = Config::try_parse_from(["linechat"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_malformed_address_is_usage_error() {
        let err = Config::try_parse_from(["linechat", "not-an-address"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_hostname_address_accepted() {
        let config = Config::try_parse_from(["linechat", "localhost:8000"]).unwrap();
        assert_eq!(config.listen, "localhost:8000");

        let config = Config::try_parse_from(["linechat", "[::1]:8000"]).unwrap();
        assert_eq!(config.listen, "[::1]:8000");
    }

    #[test]
    fn test_port_only_listens_on_all_interfaces() {
        let config = Config::try_parse_from(["linechat", ":8000"]).unwrap();
        assert_eq!(config.listen, "0.0.0.0:8000");
    }

    #[test]
    fn test_bad_port_is_usage_error() {
        for arg in ["localhost:", "localhost:http", "localhost:70000"] {
            let err = Config::try_parse_from(["linechat", arg]).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{}", arg);
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result =
            Config::try_parse_from(["linechat", "127.0.0.1:0", "--outbox-capacity", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "linechat",
            "0.0.0.0:9000",
            "--queue-capacity",
            "8",
            "--outbox-capacity",
            "4",
            "--erase-echo",
        ])
        .unwrap();
        let conn = config.connection();
        assert_eq!(config.queue_capacity.get(), 8);
        assert_eq!(conn.outbox_capacity, 4);
        assert!(conn.erase_echo);
    }

    #[test]
    fn test_new_matches_defaults() {
        let config = Config::new("127.0.0.1:0");
        assert_eq!(config.connection(), ConnectionConfig::default());
    }
}
