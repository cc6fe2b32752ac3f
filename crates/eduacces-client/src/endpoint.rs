//! Typed access to the CRUD collections.
//!
//! | Collection | Path | get/update | metrics |
//! |------------|------|------------|---------|
//! | [`Persons`] | `/persona` | yes | |
//! | [`Users`] | `/user` | yes | |
//! | [`Careers`] | `/carreras` | yes | yes |
//! | [`Fichas`] | `/fichas` | yes | yes |
//! | [`Subjects`] | `/materias` | yes | |
//! | [`TeacherAssignments`] | `/docente-ficha` | | yes |
//! | [`StudentAssignments`] | `/estudiante-ficha` | | yes |

use std::{collections::BTreeMap, fmt::Display, marker::PhantomData};

use eduacces_core::{
  AssignmentId, CareerId, FichaId, PersonId, SubjectId, UserId,
  academic::{Career, Ficha, FichaChanges, NewCareer, NewFicha, NewSubject, Subject},
  account::{NewUser, UserAccount, UserChanges},
  assignment::{NewStudentAssignment, NewTeacherAssignment, StudentAssignment, TeacherAssignment},
  person::{NewPerson, Person, PersonChanges},
};
use reqwest::Method;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{ApiClient, error::Result};

// ─── Traits ───────────────────────────────────────────────────────────────────

/// A collection supporting `GET`/`POST` on its path and `DELETE` on
/// `path/:id`.
pub trait Endpoint {
  const PATH: &'static str;
  type Record: DeserializeOwned;
  type Id: Display + Copy;
  type New: Serialize + Sync;
}

/// A collection that also supports `GET` and `PUT` on `path/:id`.
pub trait Editable: Endpoint {
  type Changes: Serialize + Sync;
}

/// A collection with a `GET path/metrics` summary.
pub trait WithMetrics: Endpoint {}

// ─── Wire helpers ─────────────────────────────────────────────────────────────

/// The raw JSON a mutation returned. Callers re-fetch the collection rather
/// than interpreting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ack(pub Value);

/// Free-form counters from a `/metrics` route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics(pub BTreeMap<String, Value>);

impl Metrics {
  /// Scalar entries rendered for display, in key order. Nested values are
  /// skipped.
  pub fn entries(&self) -> Vec<(String, String)> {
    self
      .0
      .iter()
      .filter_map(|(k, v)| {
        let shown = match v {
          Value::Number(n) => n.to_string(),
          Value::String(s) => s.clone(),
          Value::Bool(b) => b.to_string(),
          _ => return None,
        };
        Some((k.clone(), shown))
      })
      .collect()
  }
}

// ─── Collection handle ────────────────────────────────────────────────────────

/// Borrowed handle for one collection; obtained from [`ApiClient`].
pub struct Collection<'a, E> {
  client:   &'a ApiClient,
  endpoint: PhantomData<E>,
}

impl<'a, E: Endpoint> Collection<'a, E> {
  fn item_path(id: E::Id) -> String { format!("{}/{}", E::PATH, id) }

  /// `GET path`
  pub async fn list(&self) -> Result<Vec<E::Record>> {
    let what = format!("GET {}", E::PATH);
    let resp = self
      .client
      .send(&what, self.client.request(Method::GET, E::PATH))
      .await?;
    ApiClient::decode(&what, resp).await
  }

  /// `POST path`
  pub async fn create(&self, body: &E::New) -> Result<Ack> {
    let what = format!("POST {}", E::PATH);
    let req = self.client.request(Method::POST, E::PATH).json(body);
    let resp = self.client.send(&what, req).await?;
    ApiClient::ack(&what, resp).await
  }

  /// `DELETE path/:id`
  pub async fn delete(&self, id: E::Id) -> Result<Ack> {
    let path = Self::item_path(id);
    let what = format!("DELETE {path}");
    let resp = self
      .client
      .send(&what, self.client.request(Method::DELETE, &path))
      .await?;
    ApiClient::ack(&what, resp).await
  }
}

impl<E: Editable> Collection<'_, E> {
  /// `GET path/:id`
  pub async fn get(&self, id: E::Id) -> Result<E::Record> {
    let path = Self::item_path(id);
    let what = format!("GET {path}");
    let resp = self
      .client
      .send(&what, self.client.request(Method::GET, &path))
      .await?;
    ApiClient::decode(&what, resp).await
  }

  /// `PUT path/:id`
  pub async fn update(&self, id: E::Id, changes: &E::Changes) -> Result<Ack> {
    let path = Self::item_path(id);
    let what = format!("PUT {path}");
    let req = self.client.request(Method::PUT, &path).json(changes);
    let resp = self.client.send(&what, req).await?;
    ApiClient::ack(&what, resp).await
  }
}

impl<E: WithMetrics> Collection<'_, E> {
  /// `GET path/metrics`
  pub async fn metrics(&self) -> Result<Metrics> {
    let path = format!("{}/metrics", E::PATH);
    let what = format!("GET {path}");
    let resp = self
      .client
      .send(&what, self.client.request(Method::GET, &path))
      .await?;
    ApiClient::decode(&what, resp).await
  }
}

impl ApiClient {
  pub fn collection<E: Endpoint>(&self) -> Collection<'_, E> {
    Collection { client: self, endpoint: PhantomData }
  }

  pub fn persons(&self) -> Collection<'_, Persons> { self.collection() }

  pub fn users(&self) -> Collection<'_, Users> { self.collection() }

  pub fn careers(&self) -> Collection<'_, Careers> { self.collection() }

  pub fn fichas(&self) -> Collection<'_, Fichas> { self.collection() }

  pub fn subjects(&self) -> Collection<'_, Subjects> { self.collection() }

  pub fn teacher_assignments(&self) -> Collection<'_, TeacherAssignments> { self.collection() }

  pub fn student_assignments(&self) -> Collection<'_, StudentAssignments> { self.collection() }
}

// ─── Collections ──────────────────────────────────────────────────────────────

pub struct Persons;

impl Endpoint for Persons {
  const PATH: &'static str = "/persona";
  type Record = Person;
  type Id = PersonId;
  type New = NewPerson;
}

impl Editable for Persons {
  type Changes = PersonChanges;
}

pub struct Users;

impl Endpoint for Users {
  const PATH: &'static str = "/user";
  type Record = UserAccount;
  type Id = UserId;
  type New = NewUser;
}

impl Editable for Users {
  type Changes = UserChanges;
}

pub struct Careers;

impl Endpoint for Careers {
  const PATH: &'static str = "/carreras";
  type Record = Career;
  type Id = CareerId;
  type New = NewCareer;
}

impl Editable for Careers {
  type Changes = NewCareer;
}

impl WithMetrics for Careers {}

pub struct Fichas;

impl Endpoint for Fichas {
  const PATH: &'static str = "/fichas";
  type Record = Ficha;
  type Id = FichaId;
  type New = NewFicha;
}

impl Editable for Fichas {
  type Changes = FichaChanges;
}

impl WithMetrics for Fichas {}

pub struct Subjects;

impl Endpoint for Subjects {
  const PATH: &'static str = "/materias";
  type Record = Subject;
  type Id = SubjectId;
  type New = NewSubject;
}

impl Editable for Subjects {
  type Changes = NewSubject;
}

pub struct TeacherAssignments;

impl Endpoint for TeacherAssignments {
  const PATH: &'static str = "/docente-ficha";
  type Record = TeacherAssignment;
  type Id = AssignmentId;
  type New = NewTeacherAssignment;
}

impl WithMetrics for TeacherAssignments {}

pub struct StudentAssignments;

impl Endpoint for StudentAssignments {
  const PATH: &'static str = "/estudiante-ficha";
  type Record = StudentAssignment;
  type Id = AssignmentId;
  type New = NewStudentAssignment;
}

impl WithMetrics for StudentAssignments {}
