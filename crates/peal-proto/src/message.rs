//! xPL message record and wire serialization

use std::collections::BTreeMap;
use std::fmt;

use crate::header;

/// A single xPL message.
///
/// On the wire a message is a type tag line, a brace-delimited block of
/// envelope headers, a schema line, and a brace-delimited body block.
/// Header and body keys are unique within their block; both blocks keep
/// their keys ordered so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Type tag, by convention one of the [`crate::message_type`] values
    pub message_type: String,
    /// Dotted schema name identifying the body semantics
    pub schema: String,
    /// Envelope headers (`hop`, `source`, `target`)
    pub headers: BTreeMap<String, String>,
    /// Schema-defined payload entries
    pub body: BTreeMap<String, String>,
}

impl Message {
    /// Create an empty message with the given type and schema
    pub fn new(message_type: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            message_type: message_type.into(),
            schema: schema.into(),
            headers: BTreeMap::new(),
            body: BTreeMap::new(),
        }
    }

    /// Set an envelope header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set a body entry
    pub fn with_body(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }

    /// Value of the `source` header, if present
    pub fn source(&self) -> Option<&str> {
        self.headers.get(header::SOURCE).map(String::as_str)
    }

    /// Value of the `target` header, if present
    pub fn target(&self) -> Option<&str> {
        self.headers.get(header::TARGET).map(String::as_str)
    }

    /// Body entry by name, if present
    pub fn body_value(&self, name: &str) -> Option<&str> {
        self.body.get(name).map(String::as_str)
    }

    /// Stamp the `source` header with the sending application's id
    pub fn set_source(&mut self, application_id: &str) {
        self.headers
            .insert(header::SOURCE.to_string(), application_id.to_string());
    }
}

/// Wire serialization: one line per element, LF separated, with each
/// block wrapped in `{` / `}` lines.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message_type)?;
        writeln!(f, "{{")?;
        for (name, value) in &self.headers {
            writeln!(f, "{}={}", name, value)?;
        }
        writeln!(f, "}}")?;
        writeln!(f, "{}", self.schema)?;
        writeln!(f, "{{")?;
        for (name, value) in &self.body {
            writeln!(f, "{}={}", name, value)?;
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{message_type, schema, TARGET_ALL};

    #[test]
    fn test_builder_accessors() {
        let msg = Message::new(message_type::COMMAND, "x10.basic")
            .with_header("hop", "1")
            .with_header("source", "peal-test.node")
            .with_header("target", TARGET_ALL)
            .with_body("command", "on")
            .with_body("device", "porch");

        assert_eq!(msg.source(), Some("peal-test.node"));
        assert_eq!(msg.target(), Some("*"));
        assert_eq!(msg.body_value("command"), Some("on"));
        assert_eq!(msg.body_value("missing"), None);
    }

    #[test]
    fn test_set_source_replaces() {
        let mut msg = Message::new(message_type::TRIGGER, schema::HEARTBEAT)
            .with_header("source", "old.node");
        msg.set_source("new.node");
        assert_eq!(msg.source(), Some("new.node"));
        assert_eq!(msg.headers.len(), 1);
    }

    #[test]
    fn test_display_wire_format() {
        let msg = Message::new(message_type::COMMAND, "x10.basic")
            .with_header("hop", "1")
            .with_header("source", "a.b")
            .with_header("target", "*")
            .with_body("command", "off")
            .with_body("device", "porch");

        let wire = msg.to_string();
        assert_eq!(
            wire,
            "xpl-cmnd\n{\nhop=1\nsource=a.b\ntarget=*\n}\nx10.basic\n{\ncommand=off\ndevice=porch\n}\n"
        );
    }

    #[test]
    fn test_display_empty_blocks() {
        let msg = Message::new(message_type::STATUS, "hbeat.request");
        assert_eq!(msg.to_string(), "xpl-stat\n{\n}\nhbeat.request\n{\n}\n");
    }
}
