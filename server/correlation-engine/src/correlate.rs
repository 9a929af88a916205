//! Temporal correlation: tumbling-window clustering of error events, cascade
//! detection across services, and per-service dependency hints.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDateTime};

use crate::config::Config;
use crate::store::EventStore;
use crate::types::{CascadeSignal, DependencyHint, ErrorClassification, LogEvent, TemporalCluster};

/// Parse an event timestamp for window arithmetic. Accepts the textual
/// "YYYY-MM-DD HH:MM:SS" form and RFC 3339 from structured sources.
pub fn parse_event_time(ts: &str) -> Option<NaiveDateTime> {
  if let Ok(t) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S") {
    return Some(t);
  }
  DateTime::parse_from_rfc3339(ts).map(|t| t.naive_utc()).ok()
}

/// One in-progress run of error events inside a window.
struct Run<'a> {
  /// First parseable time seen in the run; the window is anchored here.
  anchor: Option<NaiveDateTime>,
  start_time: String,
  events: Vec<&'a LogEvent>,
}

impl<'a> Run<'a> {
  fn start(event: &'a LogEvent) -> Self {
    Self {
      anchor: event.timestamp.as_deref().and_then(parse_event_time),
      start_time: event
        .timestamp
        .clone()
        .unwrap_or_else(|| "unknown".to_string()),
      events: vec![event],
    }
  }

  fn push(&mut self, event: &'a LogEvent, time: Option<NaiveDateTime>) {
    if self.anchor.is_none() {
      self.anchor = time;
    }
    self.events.push(event);
  }

  fn into_cluster(self, min_events: usize) -> Option<TemporalCluster> {
    if self.events.len() <= min_events {
      return None;
    }
    let services: HashSet<&str> = self.events.iter().map(|e| e.service.as_str()).collect();
    Some(TemporalCluster {
      start_time: self.start_time,
      error_count: self.events.len(),
      services_affected: services.len(),
    })
  }
}

/// Partition time-ordered qualifying events into maximal runs where every
/// event lies within `cluster_window_secs` of the run's first event — a
/// tumbling window anchored at each run's start, not a sliding one. Runs
/// with more than `cluster_min_events` events are emitted as clusters.
///
/// An event whose timestamp cannot be parsed stays in the current run: it
/// cannot break a window it cannot measure.
pub fn find_clusters(store: &EventStore, config: &Config) -> Vec<TemporalCluster> {
  let mut clusters = Vec::new();
  let mut current: Option<Run> = None;

  for event in store.qualifying() {
    let time = event.timestamp.as_deref().and_then(parse_event_time);

    let outside = match &current {
      Some(run) => match (run.anchor, time) {
        (Some(anchor), Some(t)) => (t - anchor).num_seconds() > config.cluster_window_secs,
        _ => false,
      },
      None => false,
    };

    if outside {
      if let Some(closed) = current.take() {
        clusters.extend(closed.into_cluster(config.cluster_min_events));
      }
    }

    match current.as_mut() {
      Some(run) => run.push(event, time),
      None => current = Some(Run::start(event)),
    }
  }

  if let Some(run) = current {
    clusters.extend(run.into_cluster(config.cluster_min_events));
  }
  clusters
}

/// Coarse, order-insensitive cascade heuristic: enough distinct services
/// erroring in the analysis window suggests propagation, not isolation.
/// Breadth of impact only — no causal direction is claimed.
pub fn detect_cascades(store: &EventStore, config: &Config) -> Vec<CascadeSignal> {
  let services: HashSet<&str> = store.qualifying().map(|e| e.service.as_str()).collect();
  if services.len() >= config.cascade_min_services {
    vec![CascadeSignal {
      services_affected: services.len(),
      description: format!(
        "cascade failure suspected: errors span {} services in the analysis window",
        services.len()
      ),
    }]
  } else {
    Vec::new()
  }
}

/// Per-service error counts with a best-effort "probably the origin, not a
/// downstream victim" flag when a count clears the configured threshold.
pub fn dependency_hints(
  classification: &ErrorClassification,
  config: &Config,
) -> BTreeMap<String, DependencyHint> {
  classification
    .by_service
    .iter()
    .map(|(service, &count)| {
      (
        service.clone(),
        DependencyHint {
          error_count: count,
          likely_primary_cause: count > config.primary_cause_threshold,
        },
      )
    })
    .collect()
}
