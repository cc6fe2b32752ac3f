//! People: students, teachers and directors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::PersonId;

// ─── Role ────────────────────────────────────────────────────────────────────

/// The role a person plays in the institution.
///
/// The backend treats this as a free-form string. The known values get their
/// own variants; anything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
  Teacher,
  Student,
  Director,
  Instructor,
  Other(String),
}

impl Role {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Teacher => "docente",
      Self::Student => "estudiante",
      Self::Director => "directora",
      Self::Instructor => "instructor",
      Self::Other(s) => s,
    }
  }

  /// Roles a newly registered person may be given from the dashboard.
  pub fn selectable() -> [Role; 3] { [Self::Student, Self::Teacher, Self::Director] }
}

impl From<String> for Role {
  fn from(raw: String) -> Self {
    match raw.trim().to_lowercase().as_str() {
      "docente" => Self::Teacher,
      "estudiante" => Self::Student,
      "directora" | "director" => Self::Director,
      "instructor" => Self::Instructor,
      _ => Self::Other(raw),
    }
  }
}

impl From<Role> for String {
  fn from(role: Role) -> Self {
    match role {
      Role::Other(s) => s,
      known => known.as_str().to_owned(),
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A person record as returned by `GET /persona`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  #[serde(rename = "id_persona")]
  pub id:         PersonId,
  #[serde(rename = "documento")]
  pub document:   String,
  #[serde(rename = "nombre")]
  pub first_name: String,
  #[serde(rename = "apellido")]
  pub last_name:  String,
  #[serde(rename = "correo")]
  pub email:      String,
  #[serde(rename = "telefono")]
  pub phone:      String,
  #[serde(rename = "rol")]
  pub role:       Role,
}

impl Person {
  pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }
}

/// Body of `POST /persona`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
  #[serde(rename = "documento")]
  pub document:   String,
  #[serde(rename = "nombre")]
  pub first_name: String,
  #[serde(rename = "apellido")]
  pub last_name:  String,
  #[serde(rename = "correo")]
  pub email:      String,
  #[serde(rename = "telefono")]
  pub phone:      String,
  #[serde(rename = "rol")]
  pub role:       Role,
}

impl NewPerson {
  /// Whether `person` carries exactly these fields, ignoring its id.
  pub fn matches(&self, person: &Person) -> bool {
    self.document == person.document
      && self.first_name == person.first_name
      && self.last_name == person.last_name
      && self.email == person.email
      && self.phone == person.phone
      && self.role == person.role
  }
}

/// Body of `PUT /persona/:id`. The role is fixed at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonChanges {
  #[serde(rename = "documento")]
  pub document:   String,
  #[serde(rename = "nombre")]
  pub first_name: String,
  #[serde(rename = "apellido")]
  pub last_name:  String,
  #[serde(rename = "correo")]
  pub email:      String,
  #[serde(rename = "telefono")]
  pub phone:      String,
}

/// The slice of a person embedded in assignment rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
  #[serde(rename = "documento", default)]
  pub document:   Option<String>,
  #[serde(rename = "nombre")]
  pub first_name: String,
  #[serde(rename = "apellido")]
  pub last_name:  String,
  #[serde(rename = "correo", default)]
  pub email:      Option<String>,
}

impl PersonSummary {
  pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }
}
