//! Structured error types for the correlation engine.
//!
//! Per-line failures are not errors at all (noisy input is expected), and
//! per-source failures are recovered locally. Only configuration-level
//! conditions surface to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("no log sources supplied")]
  NoSources,

  #[error("source unavailable: {name}: {reason}")]
  Source { name: String, reason: String },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl EngineError {
  pub fn source_unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::Source {
      name: name.into(),
      reason: reason.into(),
    }
  }
}
