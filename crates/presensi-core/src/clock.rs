//! Time sources.
//!
//! Every manager reads "now" through a [`Clock`] so auto-close behaviour can be
//! exercised deterministically. Production code injects [`SystemClock`].

use std::{
  fmt,
  sync::{Arc, Mutex, PoisonError},
};

use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send + Sync + fmt::Debug {
  /// The current instant in UTC.
  fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A settable clock shared between clones; moving one handle moves them all.
#[derive(Debug, Clone)]
pub struct ManualClock {
  now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
  pub fn new(at: DateTime<Utc>) -> Self {
    Self { now: Arc::new(Mutex::new(at)) }
  }

  pub fn set(&self, at: DateTime<Utc>) {
    *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
  }

  pub fn advance(&self, by: Duration) {
    let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
    *now += by;
  }
}

impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    *self.now.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn manual_clock_handles_share_time() {
    let start = Utc::now();
    let a = ManualClock::new(start);
    let b = a.clone();

    b.advance(Duration::minutes(3));
    assert_eq!(a.now(), start + Duration::minutes(3));

    a.set(start);
    assert_eq!(b.now(), start);
  }
}
