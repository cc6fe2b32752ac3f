//! Core types for the Eduacces dashboard.
//!
//! Holds the records transported between the dashboard and the Eduacces
//! backend, plus the fingerprint enrollment/verification orchestrator.
//! This crate knows nothing about HTTP; the client crate implements
//! [`enrollment::FingerprintGateway`] on top of it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod academic;
pub mod account;
pub mod assignment;
pub mod attendance;
pub mod enrollment;
pub mod error;
pub mod fingerprint;
pub mod id;
pub mod person;

mod decode;

pub use enrollment::{EnrollStatus, Enrollment, FingerprintGateway, Outcome, Snapshot};
pub use error::{Error, Result};
pub use id::{
  AssignmentId, AttendanceId, CareerId, FichaId, PersonId, SensorSlot, SubjectId, UserId,
};
