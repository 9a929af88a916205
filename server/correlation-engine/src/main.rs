//! Binary entrypoint: analyze the given log files, write the report as JSON.
//!
//! Usage: correlation-engine <log-file>... [--narrative]
//!
//! The report JSON goes to stdout. With --narrative, the rendered narrative
//! text (per the configured backend) goes to stdout instead, and the report
//! JSON is suppressed. Unreadable sources are logged to stderr and skipped.

use std::path::PathBuf;
use std::process::ExitCode;

use correlation_engine::Engine;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let mut narrative = false;
  let mut sources: Vec<PathBuf> = Vec::new();
  for arg in std::env::args().skip(1) {
    match arg.as_str() {
      "--narrative" => narrative = true,
      _ => sources.push(PathBuf::from(arg)),
    }
  }

  if sources.is_empty() {
    eprintln!("usage: correlation-engine <log-file>... [--narrative]");
    return ExitCode::from(2);
  }

  let engine = Engine::with_defaults();
  let report = match engine.analyze(&sources).await {
    Ok(report) => report,
    Err(e) => {
      eprintln!("correlation-engine: {}", e);
      return ExitCode::from(2);
    }
  };

  let output = if narrative {
    engine.render_narrative(&report)
  } else {
    serde_json::to_string_pretty(&report).map_err(Into::into)
  };

  match output {
    Ok(text) => {
      println!("{}", text);
      ExitCode::SUCCESS
    }
    Err(e) => {
      eprintln!("correlation-engine: {}", e);
      ExitCode::FAILURE
    }
  }
}
