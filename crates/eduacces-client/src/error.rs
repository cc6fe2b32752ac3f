//! Error type for `eduacces-client`.
//!
//! `Display` is always the text shown to the operator. For
//! [`Error::Status`] that is exactly the message the server sent.

use std::path::PathBuf;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The request never produced a response (DNS, connect, reset, …).
  #[error("{context}: {source}")]
  Transport {
    context: String,
    source:  reqwest::Error,
  },

  /// The server answered with a non-2xx status.
  #[error("{message}")]
  Status {
    status:  StatusCode,
    message: String,
  },

  /// The body did not match the expected schema.
  #[error("{context}: unexpected response: {source}")]
  Decode {
    context: String,
    source:  serde_json::Error,
  },

  #[error("{context}: response is not JSON")]
  NotJson { context: String },

  /// A 2xx reply whose payload reported failure (`ok: false`).
  #[error("{0}")]
  Rejected(String),

  #[error("session file {}: {source}", path.display())]
  SessionIo {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("session file {}: {source}", path.display())]
  SessionFormat {
    path:   PathBuf,
    source: serde_json::Error,
  },
}

impl Error {
  /// HTTP status, when the server answered at all.
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Status { status, .. } => Some(*status),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Pull a human-readable message out of an error body.
///
/// Tries the JSON `message` field (a string, or a list of strings as produced
/// by validation pipes), then `error`, then a bare JSON string. Non-JSON
/// bodies are returned verbatim. Returns `None` when nothing useful is there.
pub(crate) fn server_message(body: &str) -> Option<String> {
  let body = body.trim();
  if body.is_empty() {
    return None;
  }
  let Ok(value) = serde_json::from_str::<Value>(body) else {
    return Some(body.to_owned());
  };
  let text = |v: Option<&Value>| -> Option<String> {
    match v? {
      Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
      Value::Array(items) => {
        let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
        (!parts.is_empty()).then(|| parts.join("; "))
      }
      _ => None,
    }
  };
  text(value.get("message"))
    .or_else(|| text(value.get("error")))
    .or_else(|| text(Some(&value)))
}
