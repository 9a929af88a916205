//! Source readers: resolve named log sources to per-source line buffers.
//!
//! Sources are read as independent tasks (no ordering dependency between
//! them) and joined back in source order, so the later merge-and-sort sees a
//! deterministic ingestion sequence. Each read is bounded by a per-source
//! timeout; a failed or slow source is logged and skipped, never fatal.

use std::path::PathBuf;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::EngineError;

/// All lines recovered from one named source, in file order.
#[derive(Debug, Clone)]
pub struct SourceLines {
  pub name: String,
  pub lines: Vec<String>,
}

impl SourceLines {
  pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
    Self {
      name: name.into(),
      lines,
    }
  }
}

async fn read_one(path: PathBuf, timeout_secs: u64) -> Result<SourceLines, EngineError> {
  let name = path.display().to_string();
  let read = tokio::fs::read_to_string(&path);
  let text = match timeout(Duration::from_secs(timeout_secs), read).await {
    Ok(Ok(text)) => text,
    Ok(Err(e)) => return Err(EngineError::source_unavailable(&name, e.to_string())),
    Err(_) => {
      return Err(EngineError::source_unavailable(
        &name,
        format!("read timed out after {}s", timeout_secs),
      ))
    }
  };

  let lines = text.lines().map(str::to_string).collect();
  Ok(SourceLines::new(name, lines))
}

/// Read all sources concurrently, preserving source order in the result.
///
/// Unavailable sources are dropped from the output; the run continues with
/// whatever could be read.
pub async fn read_sources(paths: &[PathBuf], timeout_secs: u64) -> Vec<SourceLines> {
  let handles: Vec<_> = paths
    .iter()
    .map(|p| tokio::spawn(read_one(p.clone(), timeout_secs)))
    .collect();

  let mut sources = Vec::with_capacity(handles.len());
  for (handle, path) in handles.into_iter().zip(paths) {
    match handle.await {
      Ok(Ok(source)) => {
        debug!(source = %source.name, lines = source.lines.len(), "source read");
        sources.push(source);
      }
      Ok(Err(e)) => warn!(source = %path.display(), error = %e, "skipping source"),
      Err(e) => warn!(source = %path.display(), error = %e, "source task failed"),
    }
  }
  sources
}

/// Convenience for tests and in-memory callers: wrap raw text as one source.
pub fn from_text(name: impl Into<String>, text: &str) -> SourceLines {
  SourceLines::new(name, text.lines().map(str::to_string).collect())
}
