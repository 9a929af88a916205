//! Error classification: per-service counts, frequency-ranked distinct
//! messages, and ordered first-match keyword categories.

use std::collections::{BTreeMap, HashMap};

use crate::config::Config;
use crate::store::EventStore;
use crate::types::{Category, CategoryCounts, ErrorClassification, TopError};

/// Ordered category → keyword table. First category with a substring match
/// wins, so a message containing both "connection" and "timeout" files under
/// `database`. Evaluated against the lower-cased message.
const CATEGORY_KEYWORDS: [(Category, &[&str]); 4] = [
  (Category::Database, &["connection", "query", "sql", "postgres", "mysql"]),
  (Category::Network, &["network", "socket", "connection refused", "host"]),
  (Category::Timeout, &["timeout", "timed out", "deadline exceeded"]),
  (Category::Memory, &["memory", "oom", "heap", "allocation"]),
];

/// Assign one category to a distinct message; `application` is the fallback.
pub fn categorize(message: &str) -> Category {
  let lower = message.to_lowercase();
  for (category, keywords) in CATEGORY_KEYWORDS {
    if keywords.iter().any(|kw| lower.contains(kw)) {
      return category;
    }
  }
  Category::Application
}

/// Aggregate qualifying events into an ErrorClassification.
///
/// Category counts are weighted by distinct-message frequency (one category
/// per message, applied to its whole count), so they always sum to the total
/// number of qualifying events.
pub fn classify(store: &EventStore, config: &Config) -> ErrorClassification {
  let mut by_service: BTreeMap<String, u64> = BTreeMap::new();
  // Distinct messages in first-seen order, with counts looked up by index.
  let mut messages: Vec<TopError> = Vec::new();
  let mut index: HashMap<String, usize> = HashMap::new();

  for event in store.qualifying() {
    *by_service.entry(event.service.clone()).or_insert(0) += 1;

    match index.get(&event.message) {
      Some(&i) => messages[i].count += 1,
      None => {
        index.insert(event.message.clone(), messages.len());
        messages.push(TopError {
          message: event.message.clone(),
          count: 1,
        });
      }
    }
  }

  let mut by_category = CategoryCounts::default();
  for entry in &messages {
    by_category.bump(categorize(&entry.message), entry.count);
  }

  // Stable sort over insertion order: ties keep first-seen position.
  messages.sort_by(|a, b| b.count.cmp(&a.count));
  messages.truncate(config.top_errors_limit);

  ErrorClassification {
    by_category,
    by_service,
    top_errors: messages,
  }
}
