//! Ordering of concurrent lookups.

/// Tags lookups with increasing sequence numbers and decides which
/// completions may still be applied.
///
/// A completion is dropped once a later-numbered lookup has been applied, so
/// the visible result always comes from the newest lookup that has finished,
/// whatever order the network answers in.
#[derive(Debug, Default)]
pub struct LookupSequencer {
  issued: u64,
  applied: u64,
}

impl LookupSequencer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Issue the next sequence number.
  pub fn begin(&mut self) -> u64 {
    self.issued += 1;
    self.issued
  }

  /// Record a completion; returns false if it has been superseded.
  pub fn complete(&mut self, seq: u64) -> bool {
    if seq <= self.applied {
      return false;
    }
    self.applied = seq;
    true
  }

  /// Whether a lookup issued after the last applied one is still running.
  pub fn in_flight(&self) -> bool {
    self.issued > self.applied
  }
}
