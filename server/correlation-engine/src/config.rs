//! Engine configuration with sane defaults.

use crate::narrative::NarrativeBackend;

/// Tunable thresholds for clustering, cascade detection, and ingestion.
#[derive(Debug, Clone)]
pub struct Config {
  /// Tumbling-window width in seconds, anchored at each run's first event.
  pub cluster_window_secs: i64,
  /// A run must contain strictly more events than this to become a cluster.
  pub cluster_min_events: usize,
  /// Distinct services needed across all errors to emit a cascade signal.
  pub cascade_min_services: usize,
  /// Error count above which a service is flagged as likely primary cause.
  /// A cheap proxy, not a causal claim.
  pub primary_cause_threshold: u64,
  /// How many distinct messages to keep in the top-errors ranking.
  pub top_errors_limit: usize,
  /// Per-source read timeout; a slow source is skipped, never fatal.
  pub source_timeout_secs: u64,
  /// Narrative backend the caller intends to feed; injected here explicitly
  /// rather than detected from the environment.
  pub narrative_backend: NarrativeBackend,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      cluster_window_secs: 120,
      cluster_min_events: 5,
      cascade_min_services: 3,
      primary_cause_threshold: 100,
      top_errors_limit: 10,
      source_timeout_secs: 10,
      narrative_backend: NarrativeBackend::Mock,
    }
  }
}
