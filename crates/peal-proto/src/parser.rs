//! Line-oriented datagram parsing
//!
//! One UDP payload carries one message: a type line, a brace-delimited
//! header block, a schema line, and a brace-delimited body block. The
//! parser consumes the payload line by line and only reports a message
//! once both blocks have closed, so a truncated datagram never yields
//! a partial message.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::message::Message;

/// Parser states, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    MessageType,
    Header,
    Schema,
    Body,
    Ready,
}

fn name_value() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^= ]+)\s*=\s*(.*)$").unwrap())
}

fn split_name_value(line: &str) -> Option<(String, String)> {
    let caps = name_value().captures(line)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// Incremental parser producing one [`Message`] per instance.
///
/// Feed lines in payload order, then check [`is_ready`](Self::is_ready)
/// before taking the message with [`into_message`](Self::into_message).
/// Lines inside a block that do not match `name = value` are skipped;
/// lines after the body block closes are ignored.
#[derive(Debug, Default)]
pub struct DatagramParser {
    state: State,
    message: Message,
}

impl DatagramParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line of the payload
    pub fn feed_line(&mut self, line: &str) {
        let line = line.trim();
        match self.state {
            State::MessageType => {
                if line == "{" {
                    self.state = State::Header;
                } else {
                    self.message.message_type = line.to_string();
                }
            }
            State::Header => {
                if line == "}" {
                    self.state = State::Schema;
                } else if let Some((name, value)) = split_name_value(line) {
                    self.message.headers.insert(name, value);
                }
            }
            State::Schema => {
                if line == "{" {
                    self.state = State::Body;
                } else {
                    self.message.schema = line.to_string();
                }
            }
            State::Body => {
                if line == "}" {
                    self.state = State::Ready;
                } else if let Some((name, value)) = split_name_value(line) {
                    self.message.body.insert(name, value);
                }
            }
            State::Ready => {}
        }
    }

    /// True once the body block has closed
    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    /// Take the accumulated message. Only meaningful after
    /// [`is_ready`](Self::is_ready) reports true.
    pub fn into_message(self) -> Message {
        self.message
    }
}

/// Parse one UDP payload into a message.
///
/// Returns `None` unless the payload contains a complete message.
pub fn parse_datagram(payload: &str) -> Option<Message> {
    let mut parser = DatagramParser::new();
    for line in payload.lines() {
        parser.feed_line(line);
    }
    if parser.is_ready() {
        Some(parser.into_message())
    } else {
        None
    }
}
