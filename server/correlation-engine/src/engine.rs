//! Orchestration: one analysis run from named sources to CorrelationReport.

use std::path::PathBuf;

use tracing::debug;

use crate::classify;
use crate::config::Config;
use crate::correlate;
use crate::error::EngineError;
use crate::narrative;
use crate::parser::LineParser;
use crate::report;
use crate::source::{self, SourceLines};
use crate::store::EventStore;
use crate::types::CorrelationReport;

/// The correlation engine. Stateless across runs; each `analyze` call builds
/// a fresh event store and discards it once the report exists.
pub struct Engine {
  config: Config,
  parser: LineParser,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self {
      config,
      parser: LineParser::new(),
    }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Analyze file-backed sources. The only surfaced failure is supplying no
  /// sources at all; unreadable sources are logged and skipped, and a run in
  /// which nothing parsed still yields an insufficient-data report.
  pub async fn analyze(&self, sources: &[PathBuf]) -> Result<CorrelationReport, EngineError> {
    if sources.is_empty() {
      return Err(EngineError::NoSources);
    }
    let buffers = source::read_sources(sources, self.config.source_timeout_secs).await;
    Ok(self.analyze_buffers(&buffers))
  }

  /// Deterministic core: parse, sort, classify, correlate, assemble. Pure
  /// computation over already-collected lines — tests feed this directly.
  pub fn analyze_buffers(&self, sources: &[SourceLines]) -> CorrelationReport {
    let events = self.parser.parse_sources(sources);
    let store = EventStore::build(events);
    debug!(events = store.len(), "event store built");

    let classification = classify::classify(&store, &self.config);
    let clusters = correlate::find_clusters(&store, &self.config);
    let cascade_signals = correlate::detect_cascades(&store, &self.config);
    let dependency_hints = correlate::dependency_hints(&classification, &self.config);
    debug!(
      errors = classification.total_errors(),
      clusters = clusters.len(),
      cascades = cascade_signals.len(),
      "correlation finished"
    );

    report::build(&store, classification, clusters, cascade_signals, dependency_hints)
  }

  /// Render a report for the configured narrative backend.
  pub fn render_narrative(&self, report: &CorrelationReport) -> Result<String, EngineError> {
    narrative::render(report, self.config.narrative_backend)
  }
}
