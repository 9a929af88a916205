//! Append-once event store: the time-sorted sequence every downstream
//! component reads. Built once per analysis run, read-only after.

use serde::Serialize;

use crate::types::{LogEvent, TimeRange};

/// Ordered sequence of parsed events, sorted ascending by timestamp in
/// lexical order. The sort is stable, so events sharing a whole-second
/// timestamp keep their ingestion order — which is what lets the correlator
/// treat "adjacent in sequence" as a proxy for "adjacent in time".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventStore {
  events: Vec<LogEvent>,
}

impl EventStore {
  pub fn build(mut events: Vec<LogEvent>) -> Self {
    // Vec::sort_by is stable; missing timestamps compare as "" and sort first.
    events.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
    Self { events }
  }

  pub fn events(&self) -> &[LogEvent] {
    &self.events
  }

  pub fn len(&self) -> usize {
    self.events.len()
  }

  pub fn is_empty(&self) -> bool {
    self.events.is_empty()
  }

  /// Error-grade events (ERROR/CRITICAL/FATAL), in store order.
  pub fn qualifying(&self) -> impl Iterator<Item = &LogEvent> {
    self.events.iter().filter(|e| e.is_qualifying())
  }

  /// `[first, last]` timestamps of the sorted store; `None` when empty.
  /// An endpoint whose event carries no timestamp renders as "unknown".
  pub fn time_range(&self) -> Option<TimeRange> {
    let first = self.events.first()?;
    let last = self.events.last()?;
    let endpoint = |e: &LogEvent| {
      e.timestamp
        .clone()
        .unwrap_or_else(|| "unknown".to_string())
    };
    Some(TimeRange {
      start: endpoint(first),
      end: endpoint(last),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::BTreeMap;

  fn event(ts: Option<&str>, level: &str, service: &str, message: &str) -> LogEvent {
    LogEvent {
      timestamp: ts.map(str::to_string),
      level: level.into(),
      service: service.into(),
      message: message.into(),
      raw_fields: BTreeMap::new(),
    }
  }

  #[test]
  fn sorts_lexically_by_timestamp() {
    let store = EventStore::build(vec![
      event(Some("2025-01-01 10:00:05"), "INFO", "a", "later"),
      event(Some("2025-01-01 10:00:00"), "INFO", "a", "earlier"),
    ]);
    assert_eq!(store.events()[0].message, "earlier");
    assert_eq!(store.events()[1].message, "later");
  }

  #[test]
  fn missing_timestamps_sort_first() {
    let store = EventStore::build(vec![
      event(Some("2025-01-01 10:00:00"), "INFO", "a", "stamped"),
      event(None, "INFO", "a", "unstamped"),
    ]);
    assert_eq!(store.events()[0].message, "unstamped");
  }

  #[test]
  fn equal_timestamps_keep_ingestion_order() {
    let store = EventStore::build(vec![
      event(Some("2025-01-01 10:00:00"), "INFO", "a", "one"),
      event(Some("2025-01-01 10:00:00"), "INFO", "b", "two"),
      event(Some("2025-01-01 10:00:00"), "INFO", "c", "three"),
    ]);
    let messages: Vec<_> = store.events().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["one", "two", "three"]);
  }

  #[test]
  fn qualifying_filters_by_exact_level() {
    let store = EventStore::build(vec![
      event(Some("2025-01-01 10:00:00"), "ERROR", "a", "e"),
      event(Some("2025-01-01 10:00:01"), "error", "a", "lowercase"),
      event(Some("2025-01-01 10:00:02"), "FATAL", "a", "f"),
      event(Some("2025-01-01 10:00:03"), "INFO", "a", "i"),
    ]);
    assert_eq!(store.qualifying().count(), 2);
  }

  #[test]
  fn time_range_uses_sorted_endpoints() {
    let store = EventStore::build(vec![
      event(Some("2025-01-01 10:00:05"), "INFO", "a", "later"),
      event(Some("2025-01-01 10:00:00"), "INFO", "a", "earlier"),
    ]);
    let range = store.time_range().unwrap();
    assert_eq!(range.start, "2025-01-01 10:00:00");
    assert_eq!(range.end, "2025-01-01 10:00:05");
  }

  #[test]
  fn empty_store_has_no_time_range() {
    assert!(EventStore::build(Vec::new()).time_range().is_none());
  }

  #[test]
  fn unstamped_endpoint_renders_unknown() {
    let store = EventStore::build(vec![
      event(None, "INFO", "a", "unstamped"),
      event(Some("2025-01-01 10:00:00"), "INFO", "a", "stamped"),
    ]);
    let range = store.time_range().unwrap();
    assert_eq!(range.start, "unknown");
    assert_eq!(range.end, "2025-01-01 10:00:00");
  }
}
