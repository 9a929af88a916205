//! Incident Log Correlation Engine — deterministic, rule-based.
//!
//! Ingests raw log lines from named sources (mixed JSON and plaintext),
//! builds a time-sorted event store, classifies errors into keyword-ranked
//! categories, detects temporal clusters and cascade-failure signals, and
//! emits one structured CorrelationReport for downstream narrative reporting.
//!
//! No AI, no DB, no network; file reads only, pure computation after ingest.

pub mod classify;
pub mod config;
pub mod correlate;
pub mod engine;
pub mod error;
pub mod narrative;
pub mod parser;
pub mod report;
pub mod source;
pub mod store;
pub mod types;

pub use config::Config;
pub use engine::Engine;
pub use error::EngineError;
pub use narrative::NarrativeBackend;
pub use store::EventStore;
pub use types::{CorrelationReport, LogEvent};
