//! Wire format tests for peal-proto

use peal_proto::{header, message_type, parse_datagram, schema, DatagramParser, Message};

fn heartbeat_payload() -> String {
    Message::new(message_type::STATUS, schema::HEARTBEAT)
        .with_header(header::HOP, "1")
        .with_header(header::SOURCE, "peal-test.node")
        .with_header(header::TARGET, "*")
        .with_body("interval", "5")
        .with_body("port", "50393")
        .with_body("remote-ip", "192.168.1.10")
        .with_body("version", "0.3.0")
        .to_string()
}

#[test]
fn test_parse_heartbeat() {
    let msg = parse_datagram(&heartbeat_payload()).expect("heartbeat should parse");
    assert_eq!(msg.message_type, "xpl-stat");
    assert_eq!(msg.schema, "hbeat.app");
    assert_eq!(msg.source(), Some("peal-test.node"));
    assert_eq!(msg.target(), Some("*"));
    assert_eq!(msg.body_value("interval"), Some("5"));
    assert_eq!(msg.body_value("port"), Some("50393"));
    assert_eq!(msg.body_value("remote-ip"), Some("192.168.1.10"));
    assert_eq!(msg.body_value("version"), Some("0.3.0"));
}

#[test]
fn test_parse_heartbeat_end() {
    let wire = Message::new(message_type::STATUS, schema::HEARTBEAT_END)
        .with_header(header::SOURCE, "peal-test.node")
        .with_header(header::TARGET, "*")
        .to_string();
    let msg = parse_datagram(&wire).expect("sign-off should parse");
    assert_eq!(msg.schema, "hbeat.end");
}

#[test]
fn test_empty_payload_rejected() {
    assert!(parse_datagram("").is_none());
    assert!(parse_datagram("\n\n").is_none());
}

#[test]
fn test_type_line_last_wins() {
    let payload = "garbage\nxpl-cmnd\n{\nsource=a.b\n}\nx10.basic\n{\n}\n";
    let msg = parse_datagram(payload).expect("payload should parse");
    assert_eq!(msg.message_type, "xpl-cmnd");
}

#[test]
fn test_schema_line_last_wins() {
    let payload = "xpl-cmnd\n{\nsource=a.b\n}\n\nx10.basic\n{\n}\n";
    let msg = parse_datagram(payload).expect("payload should parse");
    assert_eq!(msg.schema, "x10.basic");
}

#[test]
fn test_incremental_feed_matches_bulk_parse() {
    let payload = heartbeat_payload();

    let mut parser = DatagramParser::new();
    for line in payload.lines() {
        parser.feed_line(line);
    }
    assert!(parser.is_ready(), "line-fed parser should complete");

    let bulk = parse_datagram(&payload).expect("bulk parse should complete");
    assert_eq!(parser.into_message(), bulk);
}
