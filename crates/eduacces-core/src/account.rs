//! Login accounts and the authenticated session.

use serde::{Deserialize, Serialize};

use crate::{
  id::{PersonId, UserId},
  person::Role,
};

/// A login account as returned by `GET /user`.
///
/// Accounts are distinct from the [`Person`](crate::person::Person) profile
/// they belong to; `person_id` links the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
  #[serde(rename = "id_user")]
  pub id:         UserId,
  #[serde(rename = "correo")]
  pub email:      String,
  #[serde(rename = "id_persona")]
  pub person_id:  PersonId,
  #[serde(rename = "estado", default)]
  pub status:     Option<String>,
  #[serde(rename = "rol", default)]
  pub role:       Option<Role>,
  #[serde(rename = "nombre", default)]
  pub first_name: Option<String>,
  #[serde(rename = "apellido", default)]
  pub last_name:  Option<String>,
}

impl UserAccount {
  /// Display name if the backend joined the person in, else the email.
  pub fn display_name(&self) -> String {
    match (&self.first_name, &self.last_name) {
      (Some(first), Some(last)) => format!("{first} {last}"),
      (Some(first), None) => first.clone(),
      _ => self.email.clone(),
    }
  }
}

/// Body of `POST /user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
  #[serde(rename = "correo")]
  pub email:     String,
  pub password:  String,
  #[serde(rename = "id_persona")]
  pub person_id: PersonId,
}

/// Body of `PUT /user/:id`. Only the email is editable; the person link is
/// sent back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChanges {
  #[serde(rename = "correo")]
  pub email:     String,
  #[serde(rename = "id_persona")]
  pub person_id: PersonId,
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// The user embedded in a login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
  #[serde(rename = "id_user")]
  pub id:         UserId,
  #[serde(rename = "correo")]
  pub email:      String,
  #[serde(rename = "id_persona")]
  pub person_id:  PersonId,
  #[serde(rename = "rol")]
  pub role:       Role,
  #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
  pub first_name: Option<String>,
  #[serde(rename = "apellido", default, skip_serializing_if = "Option::is_none")]
  pub last_name:  Option<String>,
}

/// An authenticated user/token pair. This is also the shape of the
/// `POST /auth/login` reply and of the persisted session file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub user:  SessionUser,
  pub token: String,
}
