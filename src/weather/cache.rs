//! In-memory response cache keyed by request URL.

use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// A cached response body and when it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
  pub body: Value,
  pub fetched_at: Instant,
}

/// Time-windowed cache of provider responses.
///
/// Entries are fresh for exactly `ttl` after they were fetched. Writes prune
/// entries older than `ttl * evict_after_multiple` and then drop the
/// least-recently-written entries until at most `max_entries` remain.
#[derive(Debug)]
pub struct ResponseCache {
  entries: HashMap<String, CacheEntry>,
  ttl: Duration,
  max_entries: usize,
  evict_after: Duration,
}

impl ResponseCache {
  pub fn new(ttl: Duration, max_entries: usize, evict_after_multiple: u32) -> Self {
    Self {
      entries: HashMap::new(),
      ttl,
      max_entries: max_entries.max(1),
      evict_after: ttl.saturating_mul(evict_after_multiple.max(1)),
    }
  }

  fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
    now.saturating_duration_since(entry.fetched_at) < self.ttl
  }

  /// Return the cached body for `url` if it is still fresh.
  pub fn get_fresh(&self, url: &str, now: Instant) -> Option<Value> {
    self
      .entries
      .get(url)
      .filter(|entry| self.is_fresh(entry, now))
      .map(|entry| entry.body.clone())
  }

  /// Store a body for `url`, superseding any previous entry.
  pub fn insert(&mut self, url: &str, body: Value, now: Instant) {
    self.entries.insert(
      url.to_string(),
      CacheEntry {
        body,
        fetched_at: now,
      },
    );
    self.evict(now, url);
  }

  /// `written` is never dropped by the capacity pass, even when its
  /// timestamp ties with older entries.
  fn evict(&mut self, now: Instant, written: &str) {
    let evict_after = self.evict_after;
    self
      .entries
      .retain(|_, entry| now.saturating_duration_since(entry.fetched_at) <= evict_after);

    if self.entries.len() <= self.max_entries {
      return;
    }

    let mut by_age: Vec<(String, Instant)> = self
      .entries
      .iter()
      .filter(|(url, _)| url.as_str() != written)
      .map(|(url, entry)| (url.clone(), entry.fetched_at))
      .collect();
    by_age.sort_by_key(|(_, fetched_at)| *fetched_at);

    let excess = self.entries.len() - self.max_entries;
    for (url, _) in by_age.into_iter().take(excess) {
      self.entries.remove(&url);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn cache() -> ResponseCache {
    ResponseCache::new(Duration::from_secs(600), 3, 2)
  }

  #[test]
  fn test_fresh_within_window() {
    let mut cache = cache();
    let t0 = Instant::now();
    cache.insert("a", json!({"v": 1}), t0);

    assert_eq!(
      cache.get_fresh("a", t0 + Duration::from_secs(599)),
      Some(json!({"v": 1}))
    );
  }

  #[test]
  fn test_stale_at_exact_window() {
    let mut cache = cache();
    let t0 = Instant::now();
    cache.insert("a", json!(1), t0);

    assert_eq!(cache.get_fresh("a", t0 + Duration::from_secs(600)), None);
    // Stale entries are superseded, not removed, until they age out
    assert!(cache.entries.contains_key("a"));
  }

  #[test]
  fn test_insert_supersedes() {
    let mut cache = cache();
    let t0 = Instant::now();
    cache.insert("a", json!(1), t0);
    let t1 = t0 + Duration::from_secs(700);
    cache.insert("a", json!(2), t1);

    assert_eq!(cache.get_fresh("a", t1), Some(json!(2)));
    assert_eq!(cache.entries.len(), 1);
  }

  #[test]
  fn test_old_entries_evicted_on_write() {
    let mut cache = cache();
    let t0 = Instant::now();
    cache.insert("old", json!(1), t0);

    // evict_after = 2 * ttl
    cache.insert("new", json!(2), t0 + Duration::from_secs(1201));
    assert!(!cache.entries.contains_key("old"));
    assert!(cache.entries.contains_key("new"));
  }

  #[test]
  fn test_least_recently_written_evicted_over_capacity() {
    let mut cache = cache();
    let t0 = Instant::now();
    for (i, url) in ["a", "b", "c", "d"].iter().enumerate() {
      cache.insert(url, json!(i), t0 + Duration::from_secs(i as u64));
    }

    assert_eq!(cache.entries.len(), 3);
    assert!(!cache.entries.contains_key("a"));
    assert!(cache.entries.contains_key("d"));
  }

  #[test]
  fn test_capacity_keeps_latest_write_on_tied_timestamps() {
    let mut cache = ResponseCache::new(Duration::from_secs(600), 1, 2);
    let t0 = Instant::now();
    for url in ["a", "b", "c", "d", "e"] {
      cache.insert(url, json!(url), t0);
      assert_eq!(cache.entries.len(), 1);
      assert_eq!(cache.get_fresh(url, t0), Some(json!(url)));
    }
  }
}
