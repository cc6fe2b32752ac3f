//! Where the bearer token comes from.
//!
//! The client never reads ambient state. It asks an injected
//! [`TokenSource`] on every request, so a session change (login, logout) is
//! picked up by the next call.

/// Yields the bearer token to attach, if any.
pub trait TokenSource: Send + Sync {
  fn token(&self) -> Option<String>;
}

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl StaticToken {
  pub fn new(token: impl Into<String>) -> Self { Self(Some(token.into())) }

  pub fn none() -> Self { Self(None) }
}

impl TokenSource for StaticToken {
  fn token(&self) -> Option<String> { self.0.clone() }
}

impl<F> TokenSource for F
where
  F: Fn() -> Option<String> + Send + Sync,
{
  fn token(&self) -> Option<String> { self() }
}
