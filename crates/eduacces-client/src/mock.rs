//! In-process stand-in for the Eduacces backend, bound to `127.0.0.1:0`.

use std::sync::{
  Arc, Mutex,
  atomic::{AtomicBool, AtomicI64, Ordering},
};

use axum::{
  Json, Router,
  extract::{Path, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
  routing::{get, post},
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};

/// A scripted reply for the sensor routes.
#[derive(Clone)]
pub struct Canned {
  pub status:       StatusCode,
  pub body:         String,
  pub content_type: &'static str,
}

impl Canned {
  pub fn json(status: StatusCode, body: Value) -> Self {
    Self { status, body: body.to_string(), content_type: "application/json" }
  }

  pub fn text(status: StatusCode, body: &str) -> Self {
    Self { status, body: body.to_owned(), content_type: "text/plain" }
  }
}

impl IntoResponse for Canned {
  fn into_response(self) -> Response {
    (self.status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
  }
}

pub struct MockState {
  pub persons:     Mutex<Vec<Value>>,
  next_id:         AtomicI64,
  /// `Authorization` header of every request, in arrival order.
  pub auth:        Mutex<Vec<Option<String>>>,
  /// `Content-Type` header of every request, in arrival order.
  pub content:     Mutex<Vec<Option<String>>>,
  pub enroll:      Mutex<Canned>,
  pub check_in:    Mutex<Canned>,
  pub check_out:   Mutex<Canned>,
  pub fail_logout: AtomicBool,
  pub logouts:     AtomicI64,
}

impl Default for MockState {
  fn default() -> Self {
    Self {
      persons:     Mutex::new(Vec::new()),
      next_id:     AtomicI64::new(1),
      auth:        Mutex::new(Vec::new()),
      content:     Mutex::new(Vec::new()),
      enroll:      Mutex::new(Canned::json(StatusCode::OK, json!({ "ok": true }))),
      check_in:    Mutex::new(Canned::json(StatusCode::OK, json!({}))),
      check_out:   Mutex::new(Canned::json(StatusCode::OK, json!({}))),
      fail_logout: AtomicBool::new(false),
      logouts:     AtomicI64::new(0),
    }
  }
}

impl MockState {
  pub fn set_enroll(&self, reply: Canned) { *self.enroll.lock().unwrap() = reply; }

  pub fn set_check_in(&self, reply: Canned) { *self.check_in.lock().unwrap() = reply; }

  pub fn set_check_out(&self, reply: Canned) { *self.check_out.lock().unwrap() = reply; }

  pub fn last_auth(&self) -> Option<String> { self.auth.lock().unwrap().last().cloned().flatten() }

  pub fn last_content_type(&self) -> Option<String> {
    self.content.lock().unwrap().last().cloned().flatten()
  }

  fn record(&self, headers: &HeaderMap) {
    let value = |name: header::HeaderName| {
      headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
    };
    self.auth.lock().unwrap().push(value(header::AUTHORIZATION));
    self.content.lock().unwrap().push(value(header::CONTENT_TYPE));
  }
}

pub struct MockServer {
  pub base_url: String,
  pub state:    Arc<MockState>,
  handle:       JoinHandle<()>,
}

impl Drop for MockServer {
  fn drop(&mut self) { self.handle.abort(); }
}

pub async fn spawn() -> MockServer {
  let state = Arc::new(MockState::default());
  let app = Router::new()
    .route("/persona", get(list_persons).post(create_person))
    .route("/persona/{id}", get(get_person).put(update_person).delete(delete_person))
    .route("/carreras", get(empty_list))
    .route("/carreras/metrics", get(career_metrics))
    .route("/fichas", get(fichas))
    .route("/huellas/enroll", post(enroll))
    .route("/huella-map", get(huella_map))
    .route("/asistencia", post(check_in).get(empty_list))
    .route("/asistencia/salida", post(check_out))
    .route("/auth/login", post(login))
    .route("/auth/logout", post(logout))
    .with_state(state.clone());

  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  let handle = tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  MockServer { base_url: format!("http://{addr}"), state, handle }
}

type Shared = State<Arc<MockState>>;

// ─── Handlers ─────────────────────────────────────────────────────────────────

async fn list_persons(State(s): Shared, headers: HeaderMap) -> Json<Value> {
  s.record(&headers);
  Json(Value::Array(s.persons.lock().unwrap().clone()))
}

async fn create_person(
  State(s): Shared,
  headers: HeaderMap,
  Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
  s.record(&headers);
  let id = s.next_id.fetch_add(1, Ordering::SeqCst);
  body["id_persona"] = json!(id);
  s.persons.lock().unwrap().push(body.clone());
  (StatusCode::CREATED, Json(body))
}

async fn get_person(State(s): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
  s.record(&headers);
  let persons = s.persons.lock().unwrap();
  match persons.iter().find(|p| p["id_persona"] == json!(id)) {
    Some(person) => Json(person.clone()).into_response(),
    None => StatusCode::NOT_FOUND.into_response(),
  }
}

async fn update_person(
  State(s): Shared,
  headers: HeaderMap,
  Path(id): Path<i64>,
  Json(body): Json<Value>,
) -> Response {
  s.record(&headers);
  let mut persons = s.persons.lock().unwrap();
  let Some(person) = persons.iter_mut().find(|p| p["id_persona"] == json!(id)) else {
    return StatusCode::NOT_FOUND.into_response();
  };
  if let Value::Object(changes) = body {
    for (key, value) in changes {
      person[key] = value;
    }
  }
  Json(json!({ "message": "Persona actualizada" })).into_response()
}

async fn delete_person(State(s): Shared, headers: HeaderMap, Path(id): Path<i64>) -> StatusCode {
  s.record(&headers);
  let mut persons = s.persons.lock().unwrap();
  let before = persons.len();
  persons.retain(|p| p["id_persona"] != json!(id));
  if persons.len() == before { StatusCode::NOT_FOUND } else { StatusCode::NO_CONTENT }
}

async fn empty_list(State(s): Shared, headers: HeaderMap) -> Json<Value> {
  s.record(&headers);
  Json(json!([]))
}

async fn career_metrics(State(s): Shared, headers: HeaderMap) -> Json<Value> {
  s.record(&headers);
  Json(json!({ "total": 3, "conFichas": 2 }))
}

async fn fichas(State(s): Shared, headers: HeaderMap) -> Json<Value> {
  s.record(&headers);
  Json(json!([
    { "id_ficha": 1, "numero_ficha": "2758443", "id_carrera": 2 },
    { "id_ficha": 2, "numero_ficha": 2758444, "carrera": { "nombre": "ADSO" } }
  ]))
}

async fn enroll(State(s): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Canned {
  s.record(&headers);
  assert!(body.get("id_persona").is_some_and(Value::is_i64), "enroll body: {body}");
  s.enroll.lock().unwrap().clone()
}

async fn huella_map(State(s): Shared, headers: HeaderMap) -> Json<Value> {
  s.record(&headers);
  Json(json!([{ "id_sensor": 7, "id_persona": 42, "nombre": "Ana Ruiz" }]))
}

async fn check_in(State(s): Shared, headers: HeaderMap) -> Canned {
  s.record(&headers);
  s.check_in.lock().unwrap().clone()
}

async fn check_out(State(s): Shared, headers: HeaderMap) -> Canned {
  s.record(&headers);
  s.check_out.lock().unwrap().clone()
}

async fn login(State(s): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
  s.record(&headers);
  if body["password"] != json!("secret") {
    return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Credenciales inválidas" })))
      .into_response();
  }
  Json(json!({
    "user": {
      "id_user": 1,
      "correo": body["correo"],
      "id_persona": 9,
      "rol": "directora",
      "nombre": "Marta"
    },
    "token": "tok-123"
  }))
  .into_response()
}

async fn logout(State(s): Shared, headers: HeaderMap) -> StatusCode {
  s.record(&headers);
  s.logouts.fetch_add(1, Ordering::SeqCst);
  if s.fail_logout.load(Ordering::SeqCst) {
    StatusCode::INTERNAL_SERVER_ERROR
  } else {
    StatusCode::NO_CONTENT
  }
}
