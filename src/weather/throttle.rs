//! Global minimum spacing between outgoing requests.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Enforces a minimum interval between any two dispatched requests,
/// regardless of which URL they target.
///
/// The wait and the timestamp update happen under one async lock, so two
/// concurrent callers can never both observe an expired interval.
#[derive(Debug)]
pub struct Throttle {
  min_interval: Duration,
  last_dispatch: Mutex<Option<Instant>>,
}

impl Throttle {
  pub fn new(min_interval: Duration) -> Self {
    Self {
      min_interval,
      last_dispatch: Mutex::new(None),
    }
  }

  /// Wait until a request may be dispatched, then record the dispatch.
  ///
  /// Returns the recorded dispatch time.
  pub async fn acquire(&self) -> Instant {
    let mut last = self.last_dispatch.lock().await;

    if let Some(previous) = *last {
      let ready_at = previous + self.min_interval;
      let now = Instant::now();
      if now < ready_at {
        debug!(wait_ms = (ready_at - now).as_millis() as u64, "throttling request");
        sleep_until(ready_at).await;
      }
    }

    let dispatched_at = Instant::now();
    *last = Some(dispatched_at);
    dispatched_at
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  #[tokio::test(start_paused = true)]
  async fn test_first_acquire_is_immediate() {
    let throttle = Throttle::new(Duration::from_secs(1));
    let start = Instant::now();
    let at = throttle.acquire().await;
    assert_eq!(at, start);
  }

  #[tokio::test(start_paused = true)]
  async fn test_second_acquire_waits_remaining_interval() {
    let throttle = Throttle::new(Duration::from_secs(1));
    let first = throttle.acquire().await;

    tokio::time::advance(Duration::from_millis(300)).await;
    let second = throttle.acquire().await;

    assert_eq!(second - first, Duration::from_secs(1));
  }

  #[tokio::test(start_paused = true)]
  async fn test_no_wait_after_interval_elapsed() {
    let throttle = Throttle::new(Duration::from_secs(1));
    let first = throttle.acquire().await;

    tokio::time::advance(Duration::from_secs(5)).await;
    let second = throttle.acquire().await;

    assert_eq!(second - first, Duration::from_secs(5));
  }

  #[tokio::test(start_paused = true)]
  async fn test_concurrent_acquires_are_spaced() {
    let throttle = Arc::new(Throttle::new(Duration::from_secs(1)));

    let handles: Vec<_> = (0..4)
      .map(|_| {
        let throttle = Arc::clone(&throttle);
        tokio::spawn(async move { throttle.acquire().await })
      })
      .collect();

    let mut times = Vec::new();
    for handle in handles {
      times.push(handle.await.unwrap());
    }
    times.sort();

    for pair in times.windows(2) {
      assert!(pair[1] - pair[0] >= Duration::from_secs(1));
    }
  }
}
