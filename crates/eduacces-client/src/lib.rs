//! Async HTTP client for the Eduacces REST backend.
//!
//! Every call is fire-once: no retries, no timeouts, no caching. Callers
//! re-fetch whole collections after a mutation instead of patching local
//! state.
//!
//! ```rust,ignore
//! let session = Arc::new(SessionStore::open(SessionStore::default_path()?)?);
//! let client = ApiClient::with_session(ApiConfig::default(), session)?;
//! let careers = client.careers().list().await?;
//! ```

mod attendance;
mod auth;
mod client;
mod endpoint;
mod fingerprint;

pub mod error;
pub mod session;
pub mod token;

pub use client::{ApiClient, ApiConfig, DEFAULT_BASE_URL};
pub use endpoint::{
  Ack, Careers, Collection, Editable, Endpoint, Fichas, Metrics, Persons, StudentAssignments,
  Subjects, TeacherAssignments, Users, WithMetrics,
};
pub use error::{Error, Result};
pub use session::SessionStore;
pub use token::{StaticToken, TokenSource};

#[cfg(test)]
mod mock;
#[cfg(test)]
mod tests;
