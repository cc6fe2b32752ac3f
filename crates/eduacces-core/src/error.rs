//! Error types for `eduacces-core`.

use thiserror::Error;

use crate::id::PersonId;

#[derive(Debug, Error)]
pub enum Error {
  /// The sensor matched someone other than the person the operator picked.
  #[error("fingerprint does not match the selected person")]
  IdentityMismatch {
    expected: PersonId,
    actual:   PersonId,
  },

  #[error("the sensor reply did not identify anyone")]
  MissingIdentity,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
