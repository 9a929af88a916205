//! Per-line log parsing: structured JSON first, fixed textual pattern second,
//! silent drop third. Logs are lossy input — continuation lines, stack-trace
//! fragments, and blanks are expected and never an error.

use std::collections::BTreeMap;

use regex::Regex;

use crate::source::SourceLines;
use crate::types::LogEvent;

/// Keys lifted out of structured records; everything else lands in raw_fields.
const KNOWN_KEYS: [&str; 4] = ["timestamp", "level", "service", "message"];

/// Line parser with a pre-compiled textual pattern:
/// `<timestamp> <LEVEL> [<service>] <message>`.
pub struct LineParser {
  pattern: Regex,
}

impl LineParser {
  pub fn new() -> Self {
    // Timestamp is digits/dashes/colons with internal spacing, level a bare
    // word, service bracket-delimited, message the remainder.
    let pattern = Regex::new(r"^(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})\s+(\w+)\s+\[([^\]]+)\]\s+(.+)")
      .expect("line pattern is a valid regex");
    Self { pattern }
  }

  /// Parse one raw line. `None` means the line carried nothing recoverable.
  pub fn parse_line(&self, line: &str) -> Option<LogEvent> {
    if let Some(event) = self.try_structured(line) {
      return Some(event);
    }
    self.try_pattern(line)
  }

  /// Attempt a whole-line JSON decode. Accepted only when the value is an
  /// object with a non-empty message; anything else falls through to the
  /// textual pattern.
  fn try_structured(&self, line: &str) -> Option<LogEvent> {
    let value: serde_json::Value = serde_json::from_str(line.trim()).ok()?;
    let map = value.as_object()?;

    let message = map.get("message").and_then(|v| v.as_str())?.to_string();
    if message.is_empty() {
      return None;
    }

    let timestamp = map.get("timestamp").map(stringify);
    let level = map.get("level").map(stringify).unwrap_or_default();
    let service = map
      .get("service")
      .map(stringify)
      .unwrap_or_else(|| "unknown".to_string());

    let raw_fields: BTreeMap<String, serde_json::Value> = map
      .iter()
      .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
      .map(|(k, v)| (k.clone(), v.clone()))
      .collect();

    Some(LogEvent {
      timestamp,
      level,
      service,
      message,
      raw_fields,
    })
  }

  fn try_pattern(&self, line: &str) -> Option<LogEvent> {
    let caps = self.pattern.captures(line)?;
    Some(LogEvent {
      timestamp: Some(caps[1].to_string()),
      level: caps[2].to_string(),
      service: caps[3].to_string(),
      message: caps[4].trim().to_string(),
      raw_fields: BTreeMap::new(),
    })
  }

  /// Parse all sources in ingestion order (source order, then line order).
  pub fn parse_sources(&self, sources: &[SourceLines]) -> Vec<LogEvent> {
    sources
      .iter()
      .flat_map(|s| s.lines.iter())
      .filter_map(|line| self.parse_line(line))
      .collect()
  }
}

impl Default for LineParser {
  fn default() -> Self {
    Self::new()
  }
}

/// Structured timestamps/levels/services may be any JSON value; strings are
/// taken verbatim, everything else keeps its JSON rendering.
fn stringify(value: &serde_json::Value) -> String {
  match value.as_str() {
    Some(s) => s.to_string(),
    None => value.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::source;

  #[test]
  fn parses_common_textual_format() {
    let parser = LineParser::new();
    let event = parser
      .parse_line("2025-11-14 10:02:45 ERROR [payment-service] Connection timeout")
      .unwrap();
    assert_eq!(event.timestamp.as_deref(), Some("2025-11-14 10:02:45"));
    assert_eq!(event.level, "ERROR");
    assert_eq!(event.service, "payment-service");
    assert_eq!(event.message, "Connection timeout");
    assert!(event.raw_fields.is_empty());
  }

  #[test]
  fn trims_message_whitespace() {
    let parser = LineParser::new();
    let event = parser
      .parse_line("2025-11-14 10:02:45 INFO [api]    spaced out   ")
      .unwrap();
    assert_eq!(event.message, "spaced out");
  }

  #[test]
  fn parses_structured_line_and_keeps_unknown_keys() {
    let parser = LineParser::new();
    let event = parser
      .parse_line(r#"{"timestamp":"2025-11-14T10:02:45Z","level":"ERROR","service":"db","message":"query failed","trace_id":"abc","attempt":2}"#)
      .unwrap();
    assert_eq!(event.timestamp.as_deref(), Some("2025-11-14T10:02:45Z"));
    assert_eq!(event.service, "db");
    assert_eq!(event.raw_fields.len(), 2);
    assert_eq!(event.raw_fields["attempt"], serde_json::json!(2));
  }

  #[test]
  fn structured_line_without_message_falls_through_and_drops() {
    let parser = LineParser::new();
    assert!(parser.parse_line(r#"{"level":"ERROR","service":"db"}"#).is_none());
    assert!(parser.parse_line(r#"{"message":""}"#).is_none());
  }

  #[test]
  fn structured_service_defaults_to_unknown() {
    let parser = LineParser::new();
    let event = parser.parse_line(r#"{"message":"orphan event"}"#).unwrap();
    assert_eq!(event.service, "unknown");
    assert_eq!(event.level, "");
    assert!(event.timestamp.is_none());
  }

  #[test]
  fn non_string_structured_fields_keep_json_rendering() {
    let parser = LineParser::new();
    let event = parser
      .parse_line(r#"{"timestamp":1731578565,"message":"epoch stamped"}"#)
      .unwrap();
    assert_eq!(event.timestamp.as_deref(), Some("1731578565"));
  }

  #[test]
  fn noise_lines_are_dropped() {
    let parser = LineParser::new();
    assert!(parser.parse_line("not a log line at all").is_none());
    assert!(parser.parse_line("").is_none());
    assert!(parser.parse_line("    at Object.<anonymous> (app.js:10:3)").is_none());
    assert!(parser.parse_line("[42] bracket first").is_none());
  }

  #[test]
  fn parse_sources_preserves_ingestion_order() {
    let parser = LineParser::new();
    let sources = vec![
      source::from_text(
        "app.log",
        "2025-01-01 10:00:00 ERROR [a] first\ngarbage\n2025-01-01 10:00:01 ERROR [a] second",
      ),
      source::from_text("db.log", "2025-01-01 10:00:00 ERROR [b] third"),
    ];
    let events = parser.parse_sources(&sources);
    let messages: Vec<_> = events.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
  }
}
