//! Transient notifications shown above the status bar.

use std::time::{Duration, Instant};

/// How long a notice stays up unless dismissed with `Esc`.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Info,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub level:  Level,
  pub text:   String,
  pub raised: Instant,
}

impl Notice {
  pub fn info(text: impl Into<String>) -> Self { Self::at(Level::Info, text, Instant::now()) }

  pub fn error(text: impl Into<String>) -> Self { Self::at(Level::Error, text, Instant::now()) }

  pub fn at(level: Level, text: impl Into<String>, raised: Instant) -> Self {
    Self { level, text: text.into(), raised }
  }

  pub fn is_expired(&self, now: Instant) -> bool {
    now.saturating_duration_since(self.raised) >= NOTICE_TTL
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expires_after_five_seconds() {
    let t0 = Instant::now();
    let n = Notice::at(Level::Error, "sensor offline", t0);
    assert!(!n.is_expired(t0));
    assert!(!n.is_expired(t0 + Duration::from_millis(4_999)));
    assert!(n.is_expired(t0 + Duration::from_secs(5)));
  }

  #[test]
  fn clock_going_backwards_does_not_expire() {
    let t0 = Instant::now() + Duration::from_secs(1);
    let n = Notice::at(Level::Info, "x", t0);
    assert!(!n.is_expired(t0 - Duration::from_secs(1)));
  }
}
