//! Report assembly: pure aggregation of parser, classifier, and correlator
//! output into one CorrelationReport. No I/O, deterministic given its inputs.

use std::collections::BTreeMap;

use crate::store::EventStore;
use crate::types::{
  CascadeSignal, CorrelationReport, DependencyHint, ErrorClassification, EventsSummary,
  TemporalCluster,
};

/// Stable report id: hash of the summary-level inputs, in the same spirit as
/// a deploy or incident id. Equal analysis inputs yield equal ids.
fn report_id(summary: &EventsSummary, classification: &ErrorClassification) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(summary.total_events.to_le_bytes().as_slice());
  hasher.update(summary.error_events.to_le_bytes().as_slice());
  if let Some(range) = &summary.time_range {
    hasher.update(range.start.as_bytes());
    hasher.update(b"|");
    hasher.update(range.end.as_bytes());
  }
  for top in &classification.top_errors {
    hasher.update(b"|");
    hasher.update(top.message.as_bytes());
    hasher.update(top.count.to_le_bytes().as_slice());
  }
  let hex = hasher.finalize().to_hex();
  format!("cor-{}", &hex[..16])
}

/// Combine all component outputs into the terminal report.
///
/// An empty store still yields a complete, well-formed report with
/// `insufficient_data = true` — never a partial result, never an error.
pub fn build(
  store: &EventStore,
  classification: ErrorClassification,
  clusters: Vec<TemporalCluster>,
  cascade_signals: Vec<CascadeSignal>,
  dependency_hints: BTreeMap<String, DependencyHint>,
) -> CorrelationReport {
  let events_summary = EventsSummary {
    total_events: store.len(),
    error_events: classification.total_errors(),
    services_with_errors: classification.by_service.len(),
    time_range: store.time_range(),
    insufficient_data: store.is_empty(),
  };

  CorrelationReport {
    report_id: report_id(&events_summary, &classification),
    events_summary,
    classification,
    clusters,
    cascade_signals,
    dependency_hints,
  }
}
