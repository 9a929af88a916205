//! Boundary to the external narrative collaborator.
//!
//! The engine never issues a generation request itself; it only builds the
//! deterministic request text a caller embeds into one, and a plain-text
//! rendering for callers running without a hosted backend. Backend choice is
//! an explicit config value injected at construction, never detected from
//! ambient environment state.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::CorrelationReport;

/// Where the caller intends to send the analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeBackend {
  /// A hosted language-model service owned by the caller.
  External,
  /// No backend: render a plain-text summary locally.
  Mock,
}

/// Render the report for the configured backend.
pub fn render(report: &CorrelationReport, backend: NarrativeBackend) -> Result<String, EngineError> {
  match backend {
    NarrativeBackend::External => build_analysis_request(report),
    NarrativeBackend::Mock => mock_summary(report),
  }
}

/// Build the analysis request text the caller ships to its narrative backend.
/// Deterministic: same report, same bytes.
pub fn build_analysis_request(report: &CorrelationReport) -> Result<String, EngineError> {
  let summary = &report.events_summary;
  let time_range = summary
    .time_range
    .as_ref()
    .map(|r| format!("{} to {}", r.start, r.end))
    .unwrap_or_else(|| "unknown".to_string());

  let top_errors: Vec<String> = report
    .classification
    .top_errors
    .iter()
    .map(|t| format!("- {} ({}x)", t.message, t.count))
    .collect();

  let cascades: Vec<String> = report
    .cascade_signals
    .iter()
    .map(|c| format!("- {}", c.description))
    .collect();

  Ok(format!(
    "You are an expert SRE analyzing an incident. Provide a detailed \
incident analysis and remediation plan.\n\n\
## Log Summary\n\n\
Report id: {report_id}\n\
Total logs analyzed: {total}\n\
Error logs: {errors}\n\
Time range: {time_range}\n\n\
## Error Patterns\n\n\
### Errors by Service\n{by_service}\n\n\
### Errors by Type\n{by_category}\n\n\
### Top Errors\n{top_errors}\n\n\
## Correlations\n\n\
### Temporal Clusters\n{clusters}\n\n\
### Service Dependencies\n{dependencies}\n\n\
### Cascade Detection\n{cascades}\n\n\
## Required Analysis\n\n\
Provide an executive summary, root cause analysis, service impact chain, \
and remediation recommendations (immediate, short-term, long-term). \
Be specific and actionable.\n",
    report_id = report.report_id,
    total = summary.total_events,
    errors = summary.error_events,
    time_range = time_range,
    by_service = serde_json::to_string_pretty(&report.classification.by_service)?,
    by_category = serde_json::to_string_pretty(&report.classification.by_category)?,
    top_errors = top_errors.join("\n"),
    clusters = serde_json::to_string_pretty(&report.clusters)?,
    dependencies = serde_json::to_string_pretty(&report.dependency_hints)?,
    cascades = cascades.join("\n"),
  ))
}

/// Short deterministic rendering for runs with no backend at all.
fn mock_summary(report: &CorrelationReport) -> Result<String, EngineError> {
  let summary = &report.events_summary;
  if summary.insufficient_data {
    return Ok(format!(
      "# Incident Analysis ({})\n\nInsufficient data: no events survived ingestion.\n",
      report.report_id
    ));
  }

  let mut out = format!(
    "# Incident Analysis ({})\n\n{} events analyzed, {} error-grade across {} services.\n",
    report.report_id, summary.total_events, summary.error_events, summary.services_with_errors
  );
  if let Some(top) = report.classification.top_errors.first() {
    out.push_str(&format!("Most frequent error: {} ({}x).\n", top.message, top.count));
  }
  for cluster in &report.clusters {
    out.push_str(&format!(
      "Cluster at {}: {} errors across {} services.\n",
      cluster.start_time, cluster.error_count, cluster.services_affected
    ));
  }
  for signal in &report.cascade_signals {
    out.push_str(&format!("{}.\n", signal.description));
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{
    CategoryCounts, ErrorClassification, EventsSummary, TimeRange, TopError,
  };
  use std::collections::BTreeMap;

  fn fixture_report() -> CorrelationReport {
    CorrelationReport {
      report_id: "cor-0123456789abcdef".into(),
      events_summary: EventsSummary {
        total_events: 10,
        error_events: 4,
        services_with_errors: 2,
        time_range: Some(TimeRange {
          start: "2025-01-01 10:00:00".into(),
          end: "2025-01-01 10:05:00".into(),
        }),
        insufficient_data: false,
      },
      classification: ErrorClassification {
        by_category: CategoryCounts {
          database: 4,
          ..Default::default()
        },
        by_service: BTreeMap::from([("api".to_string(), 3), ("db".to_string(), 1)]),
        top_errors: vec![TopError {
          message: "query failed".into(),
          count: 4,
        }],
      },
      clusters: Vec::new(),
      cascade_signals: Vec::new(),
      dependency_hints: BTreeMap::new(),
    }
  }

  #[test]
  fn analysis_request_is_deterministic() {
    let report = fixture_report();
    let a = build_analysis_request(&report).unwrap();
    let b = build_analysis_request(&report).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn analysis_request_embeds_report_sections() {
    let text = build_analysis_request(&fixture_report()).unwrap();
    assert!(text.contains("Total logs analyzed: 10"));
    assert!(text.contains("2025-01-01 10:00:00 to 2025-01-01 10:05:00"));
    assert!(text.contains("- query failed (4x)"));
    assert!(text.contains("\"api\": 3"));
  }

  #[test]
  fn mock_render_mentions_headline_numbers() {
    let text = render(&fixture_report(), NarrativeBackend::Mock).unwrap();
    assert!(text.contains("10 events analyzed"));
    assert!(text.contains("query failed"));
  }

  #[test]
  fn mock_render_flags_insufficient_data() {
    let mut report = fixture_report();
    report.events_summary.insufficient_data = true;
    let text = render(&report, NarrativeBackend::Mock).unwrap();
    assert!(text.contains("Insufficient data"));
  }
}
