//! Check-in, check-out and the attendance history.

use eduacces_core::attendance::{AttendanceRecord, VerificationReply};
use reqwest::Method;

use crate::{ApiClient, error::Result};

impl ApiClient {
  /// `POST /asistencia`: scan a finger and record an entry.
  pub async fn check_in(&self) -> Result<VerificationReply> {
    self.mark("POST /asistencia", "/asistencia", "could not record check-in").await
  }

  /// `POST /asistencia/salida`: scan a finger and record an exit.
  pub async fn check_out(&self) -> Result<VerificationReply> {
    self
      .mark("POST /asistencia/salida", "/asistencia/salida", "could not record check-out")
      .await
  }

  /// `GET /asistencia`
  pub async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>> {
    let what = "GET /asistencia";
    let resp = self.send(what, self.request(Method::GET, "/asistencia")).await?;
    Self::decode(what, resp).await
  }

  async fn mark(&self, what: &str, path: &str, fallback: &str) -> Result<VerificationReply> {
    let resp = self
      .send_or(what, self.request(Method::POST, path), Some(fallback))
      .await?;
    Self::require_json(what, &resp)?;
    Self::decode(what, resp).await
  }
}
