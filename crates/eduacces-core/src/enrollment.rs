//! Fingerprint enrollment and verification workflow.
//!
//! One [`Enrollment`] backs one enrollment/verification modal. It issues a
//! single gateway call per operation and folds the outcome into a four-state
//! status:
//!
//! ```text
//!   Idle ──enroll/verify──▶ Working ──ok──▶ Success ──reset──▶ Idle
//!                              └────err──▶ Error   ──reset──▶ Idle
//! ```
//!
//! `Success` and `Error` are terminal until [`Enrollment::reset`] is called.
//! Nothing is retried automatically and no timeout is applied.
//!
//! At most one gateway call is in flight per orchestrator. Resetting while
//! `Working` returns to `Idle` but keeps that call's slot until it resolves,
//! and its result is then dropped.

use std::{
  future::Future,
  sync::{Mutex, MutexGuard, PoisonError},
};

use strum::{AsRefStr, Display};

use crate::{
  Error,
  attendance::{AttendanceState, VerificationReply},
  id::PersonId,
};

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// The outbound side of the workflow: the backend that proxies the sensor.
///
/// All methods return `Send` futures so an [`Enrollment`] can be driven from
/// a spawned tokio task.
pub trait FingerprintGateway: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Capture and store a new template for `person` on the sensor.
  fn enroll(
    &self,
    person: PersonId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Ask the sensor to match a live scan and record an entry or exit.
  fn verify(
    &self,
    direction: AttendanceState,
  ) -> impl Future<Output = Result<VerificationReply, Self::Error>> + Send + '_;
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum EnrollStatus {
  #[default]
  Idle,
  Working,
  Success,
  Error,
}

/// Status plus the message shown alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
  pub status:  EnrollStatus,
  /// Error text while in [`EnrollStatus::Error`]; empty otherwise.
  pub message: String,
}

/// What a call to an operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Succeeded,
  Failed,
  /// The orchestrator was not idle, or an earlier call was still in flight;
  /// no gateway call was made.
  Ignored,
  /// The orchestrator was reset while the call was in flight. The result was
  /// dropped and `on_success` did not run.
  Superseded,
}

#[derive(Default)]
struct State {
  snapshot:   Snapshot,
  /// Bumped by every `begin` and `reset`; a call only settles if it still
  /// holds the current value.
  generation: u64,
  in_flight:  bool,
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

pub struct Enrollment<G> {
  gateway: G,
  state:   Mutex<State>,
}

impl<G: FingerprintGateway> Enrollment<G> {
  pub fn new(gateway: G) -> Self { Self { gateway, state: Mutex::new(State::default()) } }

  pub fn gateway(&self) -> &G { &self.gateway }

  pub fn snapshot(&self) -> Snapshot { self.lock().snapshot.clone() }

  pub fn status(&self) -> EnrollStatus { self.lock().snapshot.status }

  pub fn message(&self) -> String { self.lock().snapshot.message.clone() }

  /// Return to `Idle` and clear the message, whatever the current state.
  ///
  /// Resetting while `Working` does not cancel the in-flight call. Its
  /// result is discarded when it resolves, and no new operation starts
  /// before then.
  pub fn reset(&self) {
    let mut state = self.lock();
    state.generation += 1;
    state.snapshot.status = EnrollStatus::Idle;
    state.snapshot.message.clear();
  }

  /// Enroll a new fingerprint for `person`.
  ///
  /// `on_success` runs exactly once, after the status has become `Success`.
  pub async fn enroll<F>(&self, person: PersonId, on_success: F) -> Outcome
  where
    F: FnOnce(),
  {
    let Some(generation) = self.begin() else {
      tracing::debug!(%person, "enroll ignored: operation already in progress");
      return Outcome::Ignored;
    };
    tracing::info!(%person, "enrolling fingerprint");
    let result = self.gateway.enroll(person).await.map_err(|e| e.to_string());
    self.settle(generation, result, on_success)
  }

  /// Verify that the finger on the sensor belongs to `person` and record an
  /// entry.
  pub async fn verify_entrada<F>(&self, person: PersonId, on_success: F) -> Outcome
  where
    F: FnOnce(),
  {
    self.verify(AttendanceState::Entrada, person, on_success).await
  }

  /// Verify that the finger on the sensor belongs to `person` and record an
  /// exit.
  pub async fn verify_salida<F>(&self, person: PersonId, on_success: F) -> Outcome
  where
    F: FnOnce(),
  {
    self.verify(AttendanceState::Salida, person, on_success).await
  }

  /// Shared body of [`verify_entrada`](Self::verify_entrada) and
  /// [`verify_salida`](Self::verify_salida).
  ///
  /// A 2xx reply that matched a different person is still an error.
  pub async fn verify<F>(
    &self,
    direction: AttendanceState,
    person: PersonId,
    on_success: F,
  ) -> Outcome
  where
    F: FnOnce(),
  {
    let Some(generation) = self.begin() else {
      tracing::debug!(%person, %direction, "verify ignored: operation already in progress");
      return Outcome::Ignored;
    };
    tracing::info!(%person, %direction, "verifying fingerprint");
    let result = match self.gateway.verify(direction).await {
      Ok(reply) => check_identity(&reply, direction, person).map_err(|e| e.to_string()),
      Err(e) => Err(e.to_string()),
    };
    self.settle(generation, result, on_success)
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  fn lock(&self) -> MutexGuard<'_, State> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Move `Idle → Working` and claim the in-flight slot. Returns the
  /// generation the call must settle under, or `None` if not idle or a call
  /// is still outstanding.
  fn begin(&self) -> Option<u64> {
    let mut state = self.lock();
    if state.snapshot.status != EnrollStatus::Idle || state.in_flight {
      return None;
    }
    state.generation += 1;
    state.in_flight = true;
    state.snapshot.status = EnrollStatus::Working;
    state.snapshot.message.clear();
    Some(state.generation)
  }

  fn settle<F>(&self, generation: u64, result: Result<(), String>, on_success: F) -> Outcome
  where
    F: FnOnce(),
  {
    let mut state = self.lock();
    state.in_flight = false;
    if state.generation != generation {
      tracing::debug!(ok = result.is_ok(), "dropping result of a call that was reset");
      return Outcome::Superseded;
    }
    match result {
      Ok(()) => {
        state.snapshot.status = EnrollStatus::Success;
        state.snapshot.message.clear();
        drop(state);
        on_success();
        Outcome::Succeeded
      }
      Err(message) => {
        tracing::warn!(%message, "fingerprint operation failed");
        state.snapshot.status = EnrollStatus::Error;
        state.snapshot.message = message;
        Outcome::Failed
      }
    }
  }
}

/// Confirm the sensor matched `expected` for a `direction` verification.
pub fn check_identity(
  reply: &VerificationReply,
  direction: AttendanceState,
  expected: PersonId,
) -> crate::Result<()> {
  match reply.matched_person(direction) {
    Some(actual) if actual == expected => Ok(()),
    Some(actual) => Err(Error::IdentityMismatch { expected, actual }),
    None => Err(Error::MissingIdentity),
  }
}
