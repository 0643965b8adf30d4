//! peal protocol core
//!
//! Message model, wire serialization, and datagram parsing for the
//! xPL broadcast protocol.
//!
//! This crate provides:
//! - The protocol message record ([`Message`])
//! - Line-oriented datagram parsing ([`DatagramParser`], [`parse_datagram`])
//! - Protocol constants (port, message type tags, schemas, header names)

pub mod message;
pub mod parser;

pub use message::Message;
pub use parser::{parse_datagram, DatagramParser};

/// Well-known xPL UDP port
pub const XPL_PORT: u16 = 3865;

/// Target value addressing every node on the bus
pub const TARGET_ALL: &str = "*";

/// Hop count stamped on locally originated messages
pub const HOP_LOCAL: &str = "1";

/// Message type tags
pub mod message_type {
    /// Command directed at a device
    pub const COMMAND: &str = "xpl-cmnd";
    /// Status report
    pub const STATUS: &str = "xpl-stat";
    /// Trigger notification
    pub const TRIGGER: &str = "xpl-trig";
}

/// Schemas used by the engine itself
pub mod schema {
    /// Periodic liveness heartbeat
    pub const HEARTBEAT: &str = "hbeat.app";
    /// Final heartbeat announcing departure from the bus
    pub const HEARTBEAT_END: &str = "hbeat.end";
    /// Request for an immediate heartbeat
    pub const HEARTBEAT_REQUEST: &str = "hbeat.request";
}

/// Envelope header names
pub mod header {
    pub const HOP: &str = "hop";
    pub const SOURCE: &str = "source";
    pub const TARGET: &str = "target";
}
