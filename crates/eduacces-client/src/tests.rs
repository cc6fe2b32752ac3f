//! Client behaviour against the in-process mock backend.

use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering},
};

use eduacces_core::{
  EnrollStatus, Enrollment, Outcome, PersonId,
  person::{NewPerson, PersonChanges, Role},
};
use reqwest::StatusCode;
use serde_json::json;

use crate::{
  ApiClient, ApiConfig, Error, SessionStore, StaticToken,
  mock::{self, Canned, MockServer},
};

fn client(server: &MockServer, token: StaticToken) -> ApiClient {
  ApiClient::new(ApiConfig { base_url: server.base_url.clone() }, Arc::new(token)).unwrap()
}

fn ana() -> NewPerson {
  NewPerson {
    document:   "1020304050".into(),
    first_name: "Ana".into(),
    last_name:  "Ruiz".into(),
    email:      "ana@sena.edu.co".into(),
    phone:      "3001234567".into(),
    role:       Role::Student,
  }
}

// ─── Collections ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn created_person_appears_in_listing() {
  let server = mock::spawn().await;
  let api = client(&server, StaticToken::none());

  api.persons().create(&ana()).await.unwrap();
  let persons = api.persons().list().await.unwrap();

  assert_eq!(persons.len(), 1);
  assert!(ana().matches(&persons[0]));
}

#[tokio::test]
async fn deleted_person_disappears_from_listing() {
  let server = mock::spawn().await;
  let api = client(&server, StaticToken::none());

  api.persons().create(&ana()).await.unwrap();
  let mut other = ana();
  other.document = "99".into();
  api.persons().create(&other).await.unwrap();

  let id = api.persons().list().await.unwrap()[0].id;
  let ack = api.persons().delete(id).await.unwrap();
  assert!(ack.0.is_null());

  let persons = api.persons().list().await.unwrap();
  assert_eq!(persons.len(), 1);
  assert!(persons.iter().all(|p| p.id != id));
}

#[tokio::test]
async fn updated_person_reads_back_by_id() {
  let server = mock::spawn().await;
  let api = client(&server, StaticToken::none());
  api.persons().create(&ana()).await.unwrap();

  let before = api.persons().get(PersonId(1)).await.unwrap();
  assert_eq!(before.email, "ana@sena.edu.co");

  let changes = PersonChanges {
    document:   before.document.clone(),
    first_name: before.first_name.clone(),
    last_name:  before.last_name.clone(),
    email:      "ana.ruiz@sena.edu.co".into(),
    phone:      before.phone.clone(),
  };
  api.persons().update(PersonId(1), &changes).await.unwrap();

  let after = api.persons().get(PersonId(1)).await.unwrap();
  assert_eq!(after.email, "ana.ruiz@sena.edu.co");
  assert_eq!(after.role, Role::Student);
}

#[tokio::test]
async fn getting_unknown_person_reports_status() {
  let server = mock::spawn().await;
  let api = client(&server, StaticToken::none());

  let err = api.persons().get(PersonId(5)).await.unwrap_err();
  assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn deleting_unknown_id_reports_status() {
  let server = mock::spawn().await;
  let api = client(&server, StaticToken::none());

  let err = api.persons().delete(PersonId(404)).await.unwrap_err();
  assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
  assert_eq!(err.to_string(), "DELETE /persona/404 failed with 404 Not Found");
}

#[tokio::test]
async fn empty_careers_list_decodes() {
  let server = mock::spawn().await;
  let api = client(&server, StaticToken::none());
  assert!(api.careers().list().await.unwrap().is_empty());

  let metrics = api.careers().metrics().await.unwrap();
  assert_eq!(metrics.entries().len(), 2);
}

#[tokio::test]
async fn ficha_numbers_decode_from_strings_and_numbers() {
  let server = mock::spawn().await;
  let api = client(&server, StaticToken::none());

  let fichas = api.fichas().list().await.unwrap();
  assert_eq!(fichas[0].number, 2_758_443);
  assert_eq!(fichas[1].number, 2_758_444);
}

// ─── Bearer token ────────────────────────────────────────────────────────────

#[tokio::test]
async fn bearer_token_reaches_the_server() {
  let server = mock::spawn().await;
  let api = client(&server, StaticToken::new("tok-abc"));

  api.careers().list().await.unwrap();
  assert_eq!(server.state.last_auth().as_deref(), Some("Bearer tok-abc"));
}

#[tokio::test]
async fn requests_declare_a_json_body() {
  let server = mock::spawn().await;
  let api = client(&server, StaticToken::none());

  api.persons().create(&ana()).await.unwrap();
  assert_eq!(server.state.last_content_type().as_deref(), Some("application/json"));
}

#[tokio::test]
async fn no_token_means_no_authorization_header() {
  let server = mock::spawn().await;
  let api = client(&server, StaticToken::none());

  api.careers().list().await.unwrap();
  assert_eq!(server.state.last_auth(), None);
}

#[tokio::test]
async fn closure_token_source_is_read_per_request() {
  let server = mock::spawn().await;
  let calls = Arc::new(AtomicUsize::new(0));
  let tokens = {
    let calls = calls.clone();
    move || Some(format!("t{}", calls.fetch_add(1, Ordering::SeqCst)))
  };
  let api = ApiClient::new(ApiConfig { base_url: server.base_url.clone() }, Arc::new(tokens))
    .unwrap();

  api.careers().list().await.unwrap();
  api.careers().list().await.unwrap();
  assert_eq!(server.state.last_auth().as_deref(), Some("Bearer t1"));
}

// ─── Fingerprints ────────────────────────────────────────────────────────────

#[tokio::test]
async fn enroll_ok_reply_succeeds_and_calls_back_once() {
  let server = mock::spawn().await;
  server.state.set_enroll(Canned::json(
    StatusCode::OK,
    json!({ "ok": true, "data": { "id_sensor": 7 } }),
  ));
  let flow = Enrollment::new(client(&server, StaticToken::none()));
  let hits = AtomicUsize::new(0);

  let outcome = flow
    .enroll(PersonId(42), || {
      hits.fetch_add(1, Ordering::SeqCst);
    })
    .await;

  assert_eq!(outcome, Outcome::Succeeded);
  assert_eq!(flow.status(), EnrollStatus::Success);
  assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn enroll_server_error_surfaces_its_message() {
  let server = mock::spawn().await;
  server.state.set_enroll(Canned::json(
    StatusCode::INTERNAL_SERVER_ERROR,
    json!({ "message": "sensor offline" }),
  ));
  let flow = Enrollment::new(client(&server, StaticToken::none()));

  assert_eq!(flow.enroll(PersonId(42), || {}).await, Outcome::Failed);
  assert_eq!(flow.status(), EnrollStatus::Error);
  assert_eq!(flow.message(), "sensor offline");
}

#[tokio::test]
async fn enroll_without_ok_is_rejected_with_default_message() {
  let server = mock::spawn().await;
  server.state.set_enroll(Canned::json(StatusCode::OK, json!({ "ok": false })));
  let api = client(&server, StaticToken::none());

  let err = api.enroll_fingerprint(PersonId(42)).await.unwrap_err();
  assert!(matches!(err, Error::Rejected(_)));
  assert_eq!(err.to_string(), "could not enroll fingerprint (sensor / backend)");
}

#[tokio::test]
async fn enroll_non_json_success_is_rejected() {
  let server = mock::spawn().await;
  server.state.set_enroll(Canned::text(StatusCode::OK, "done"));
  let api = client(&server, StaticToken::none());

  let err = api.enroll_fingerprint(PersonId(42)).await.unwrap_err();
  assert!(matches!(err, Error::Rejected(_)));
}

#[tokio::test]
async fn fingerprint_map_decodes_slots() {
  let server = mock::spawn().await;
  let api = client(&server, StaticToken::none());

  let map = api.fingerprint_map().await.unwrap();
  assert_eq!(map.len(), 1);
  assert_eq!(map[0].sensor_slot.label(), "#007");
  assert_eq!(map[0].person_id, PersonId(42));
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn verify_entrada_with_other_identity_is_an_error() {
  let server = mock::spawn().await;
  server.state.set_check_in(Canned::json(StatusCode::OK, json!({ "data": { "id_registro": 9 } })));
  let flow = Enrollment::new(client(&server, StaticToken::none()));
  let mut called = false;

  let outcome = flow.verify_entrada(PersonId(7), || called = true).await;

  assert_eq!(outcome, Outcome::Failed);
  assert!(!called);
  assert_eq!(flow.status(), EnrollStatus::Error);
  assert_eq!(flow.message(), "fingerprint does not match the selected person");
}

#[tokio::test]
async fn verify_entrada_reads_sensor_data_identity() {
  let server = mock::spawn().await;
  server.state.set_check_in(Canned::json(
    StatusCode::OK,
    json!({ "ok": "true", "sensorData": { "data": { "id_registro": 7, "confianza": 88 } } }),
  ));
  let flow = Enrollment::new(client(&server, StaticToken::none()));

  assert_eq!(flow.verify_entrada(PersonId(7), || {}).await, Outcome::Succeeded);
  assert_eq!(flow.status(), EnrollStatus::Success);
}

#[tokio::test]
async fn verify_salida_reads_stored_person() {
  let server = mock::spawn().await;
  server.state.set_check_out(Canned::json(StatusCode::OK, json!({ "data": { "id_persona": 7 } })));
  let flow = Enrollment::new(client(&server, StaticToken::none()));
  let mut called = false;

  let outcome = flow.verify_salida(PersonId(7), || called = true).await;

  assert_eq!(outcome, Outcome::Succeeded);
  assert!(called);
  assert_eq!(flow.status(), EnrollStatus::Success);
}

#[tokio::test]
async fn verify_salida_ignores_the_sensor_match() {
  let server = mock::spawn().await;
  server.state.set_check_out(Canned::json(
    StatusCode::OK,
    json!({ "sensorData": { "data": { "id_registro": 7 } }, "data": { "id_persona": 3 } }),
  ));
  let flow = Enrollment::new(client(&server, StaticToken::none()));
  let mut called = false;

  let outcome = flow.verify_salida(PersonId(7), || called = true).await;

  assert_eq!(outcome, Outcome::Failed);
  assert!(!called);
  assert_eq!(flow.status(), EnrollStatus::Error);
  assert_eq!(flow.message(), "fingerprint does not match the selected person");
}

#[tokio::test]
async fn check_in_rejects_non_json_reply() {
  let server = mock::spawn().await;
  server.state.set_check_in(Canned::text(StatusCode::OK, "ok"));
  let api = client(&server, StaticToken::none());

  let err = api.check_in().await.unwrap_err();
  assert!(matches!(err, Error::NotJson { .. }), "{err:?}");
}

#[tokio::test]
async fn check_in_failure_without_body_uses_default_message() {
  let server = mock::spawn().await;
  server.state.set_check_in(Canned::text(StatusCode::BAD_GATEWAY, ""));
  let api = client(&server, StaticToken::none());

  let err = api.check_in().await.unwrap_err();
  assert_eq!(err.to_string(), "could not record check-in");
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_stores_session_and_token_is_used() {
  let server = mock::spawn().await;
  let store = Arc::new(SessionStore::in_memory());
  let api =
    ApiClient::with_session(ApiConfig { base_url: server.base_url.clone() }, store.clone())
      .unwrap();

  let session = api.login("dir@sena.edu.co", "secret").await.unwrap();
  assert_eq!(session.token, "tok-123");
  assert_eq!(store.user().unwrap().role, Role::Director);

  api.careers().list().await.unwrap();
  assert_eq!(server.state.last_auth().as_deref(), Some("Bearer tok-123"));
}

#[tokio::test]
async fn bad_credentials_surface_server_message() {
  let server = mock::spawn().await;
  let store = Arc::new(SessionStore::in_memory());
  let api =
    ApiClient::with_session(ApiConfig { base_url: server.base_url.clone() }, store.clone())
      .unwrap();

  let err = api.login("dir@sena.edu.co", "nope").await.unwrap_err();
  assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
  assert_eq!(err.to_string(), "Credenciales inválidas");
  assert!(!store.is_authenticated());
}

#[tokio::test]
async fn logout_clears_session_even_when_server_fails() {
  let server = mock::spawn().await;
  server.state.fail_logout.store(true, Ordering::SeqCst);
  let dir = tempfile::tempdir().unwrap();
  let store = Arc::new(SessionStore::open(dir.path().join("session.json")).unwrap());
  let api =
    ApiClient::with_session(ApiConfig { base_url: server.base_url.clone() }, store.clone())
      .unwrap();
  api.login("dir@sena.edu.co", "secret").await.unwrap();

  api.logout().await.unwrap();

  assert_eq!(server.state.logouts.load(Ordering::SeqCst), 1);
  assert!(!store.is_authenticated());
  assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn logout_without_token_skips_the_server() {
  let server = mock::spawn().await;
  let store = Arc::new(SessionStore::in_memory());
  let api =
    ApiClient::with_session(ApiConfig { base_url: server.base_url.clone() }, store).unwrap();

  api.logout().await.unwrap();
  assert_eq!(server.state.logouts.load(Ordering::SeqCst), 0);
}
