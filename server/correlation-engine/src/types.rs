//! Core types for the correlation engine (JSON contracts + internal models).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Levels that count as error-grade for classification and correlation.
/// Exact, case-sensitive match — the textual pattern captures the level
/// token verbatim, so a lower-case `error` never qualifies.
pub const QUALIFYING_LEVELS: [&str; 3] = ["ERROR", "CRITICAL", "FATAL"];

// ---------------------------------------------------------------------------
// Parsed events
// ---------------------------------------------------------------------------

/// One structured event recovered from a raw log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
  /// Sortable lexical timestamp ("YYYY-MM-DD HH:MM:SS" or whatever a
  /// structured source carried). Absent timestamps sort first.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<String>,
  pub level: String,
  pub service: String,
  pub message: String,
  /// Extra keys from structured input, preserved but not interpreted.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub raw_fields: BTreeMap<String, serde_json::Value>,
}

impl LogEvent {
  /// Key used for the store's lexical sort: missing timestamps sort as "".
  pub fn sort_key(&self) -> &str {
    self.timestamp.as_deref().unwrap_or("")
  }

  pub fn is_qualifying(&self) -> bool {
    QUALIFYING_LEVELS.contains(&self.level.as_str())
  }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Semantic failure categories, assigned by ordered keyword matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Database,
  Network,
  Timeout,
  Memory,
  Application,
}

/// Per-category event counts (weighted by distinct-message frequency).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
  pub database: u64,
  pub network: u64,
  pub timeout: u64,
  pub memory: u64,
  pub application: u64,
}

impl CategoryCounts {
  pub fn bump(&mut self, category: Category, by: u64) {
    match category {
      Category::Database => self.database += by,
      Category::Network => self.network += by,
      Category::Timeout => self.timeout += by,
      Category::Memory => self.memory += by,
      Category::Application => self.application += by,
    }
  }

  pub fn total(&self) -> u64 {
    self.database + self.network + self.timeout + self.memory + self.application
  }
}

/// One entry in the top-errors ranking. Two errors are "the same" iff their
/// message strings are byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopError {
  pub message: String,
  pub count: u64,
}

/// Per-run error aggregate produced by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorClassification {
  pub by_category: CategoryCounts,
  pub by_service: BTreeMap<String, u64>,
  /// Top-K distinct messages by count; ties keep first-seen order.
  pub top_errors: Vec<TopError>,
}

impl ErrorClassification {
  /// Total qualifying events across all services.
  pub fn total_errors(&self) -> u64 {
    self.by_service.values().sum()
  }
}

// ---------------------------------------------------------------------------
// Correlation findings
// ---------------------------------------------------------------------------

/// A maximal run of error events inside one tumbling window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalCluster {
  pub start_time: String,
  pub error_count: usize,
  pub services_affected: usize,
}

/// Heuristic flag: errors spread across enough services to suggest
/// propagation rather than an isolated fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeSignal {
  pub services_affected: usize,
  pub description: String,
}

/// Best-effort per-service origin hint inferred from error counts alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyHint {
  pub error_count: u64,
  pub likely_primary_cause: bool,
}

// ---------------------------------------------------------------------------
// Report (JSON contract — what we emit)
// ---------------------------------------------------------------------------

/// First/last timestamps of the sorted store. A missing endpoint renders as
/// "unknown" (events without timestamps can anchor either end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
  pub start: String,
  pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsSummary {
  pub total_events: usize,
  pub error_events: u64,
  pub services_with_errors: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub time_range: Option<TimeRange>,
  pub insufficient_data: bool,
}

/// The terminal artifact: immutable once built, consumed by the external
/// narrative collaborator and by callers directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationReport {
  /// Stable id derived from the report's deterministic inputs ("cor-<hex>").
  pub report_id: String,
  pub events_summary: EventsSummary,
  pub classification: ErrorClassification,
  pub clusters: Vec<TemporalCluster>,
  pub cascade_signals: Vec<CascadeSignal>,
  pub dependency_hints: BTreeMap<String, DependencyHint>,
}
