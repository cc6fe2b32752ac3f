//! Sensor template management, and the gateway the enrollment workflow
//! drives.

use eduacces_core::{
  FingerprintGateway, PersonId,
  attendance::{AttendanceState, VerificationReply},
  fingerprint::FingerprintMapping,
};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::{
  ApiClient,
  endpoint::Ack,
  error::{Error, Result},
};

const ENROLL_FAILED: &str = "could not enroll fingerprint (sensor / backend)";

#[derive(Serialize)]
struct PersonRef {
  id_persona: PersonId,
}

impl ApiClient {
  /// `POST /huellas/enroll`. Blocks server-side until the sensor has
  /// captured the finger.
  ///
  /// A 2xx reply still fails unless its `ok` field is truthy.
  pub async fn enroll_fingerprint(&self, person: PersonId) -> Result<Value> {
    let what = "POST /huellas/enroll";
    let req = self
      .request(Method::POST, "/huellas/enroll")
      .json(&PersonRef { id_persona: person });
    let resp = self.send_or(what, req, Some(ENROLL_FAILED)).await?;
    let bytes = resp
      .bytes()
      .await
      .map_err(|source| Error::Transport { context: what.to_owned(), source })?;
    // A 2xx body that is not JSON is read as `{}`, i.e. not ok.
    let reply: Value =
      serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Default::default()));

    if truthy(reply.get("ok")) {
      tracing::info!(%person, "fingerprint enrolled");
      Ok(reply)
    } else {
      let message = reply
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(ENROLL_FAILED);
      Err(Error::Rejected(message.to_owned()))
    }
  }

  /// `DELETE /huellas/delete` with the person in the body.
  pub async fn delete_fingerprint(&self, person: PersonId) -> Result<Ack> {
    let what = "DELETE /huellas/delete";
    let req = self
      .request(Method::DELETE, "/huellas/delete")
      .json(&PersonRef { id_persona: person });
    let resp = self.send(what, req).await?;
    Self::ack(what, resp).await
  }

  /// `GET /huella-map`: which sensor slot holds whose template.
  pub async fn fingerprint_map(&self) -> Result<Vec<FingerprintMapping>> {
    let what = "GET /huella-map";
    let resp = self.send(what, self.request(Method::GET, "/huella-map")).await?;
    Self::decode(what, resp).await
  }
}

fn truthy(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) => false,
    Some(Value::Bool(b)) => *b,
    Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
    Some(Value::String(s)) => !s.is_empty(),
    Some(Value::Array(_) | Value::Object(_)) => true,
  }
}

impl FingerprintGateway for ApiClient {
  type Error = Error;

  async fn enroll(&self, person: PersonId) -> Result<()> {
    self.enroll_fingerprint(person).await.map(|_| ())
  }

  async fn verify(&self, direction: AttendanceState) -> Result<VerificationReply> {
    match direction {
      AttendanceState::Entrada => self.check_in().await,
      AttendanceState::Salida => self.check_out().await,
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn ok_field_truthiness() {
    assert!(truthy(Some(&json!(true))));
    assert!(truthy(Some(&json!("true"))));
    assert!(truthy(Some(&json!(1))));
    assert!(!truthy(Some(&json!(false))));
    assert!(!truthy(Some(&json!(""))));
    assert!(!truthy(Some(&json!(0))));
    assert!(!truthy(None));
  }
}
