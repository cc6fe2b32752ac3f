//! Join records linking people to fichas (and subjects, for teachers).
//!
//! The backend embeds the joined rows, so the foreign keys themselves are
//! optional on read. Writes always carry them.

use serde::{Deserialize, Serialize};

use crate::{
  academic::{FichaSummary, SubjectSummary},
  id::{AssignmentId, FichaId, PersonId, SubjectId},
  person::PersonSummary,
};

/// A teacher teaching a subject to a ficha (`/docente-ficha`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherAssignment {
  #[serde(rename = "id_docente_materia_ficha")]
  pub id:         AssignmentId,
  #[serde(rename = "id_persona", default)]
  pub person_id:  Option<PersonId>,
  #[serde(rename = "id_materia", default)]
  pub subject_id: Option<SubjectId>,
  #[serde(rename = "id_ficha", default)]
  pub ficha_id:   Option<FichaId>,
  #[serde(rename = "persona", default)]
  pub person:     Option<PersonSummary>,
  #[serde(rename = "materia", default)]
  pub subject:    Option<SubjectSummary>,
  #[serde(default)]
  pub ficha:      Option<FichaSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeacherAssignment {
  #[serde(rename = "id_persona")]
  pub person_id:  PersonId,
  #[serde(rename = "id_materia")]
  pub subject_id: SubjectId,
  #[serde(rename = "id_ficha")]
  pub ficha_id:   FichaId,
}

/// A student enrolled in a ficha (`/estudiante-ficha`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAssignment {
  #[serde(rename = "id_estudiante_ficha")]
  pub id:        AssignmentId,
  #[serde(rename = "id_persona", default)]
  pub person_id: Option<PersonId>,
  #[serde(rename = "id_ficha", default)]
  pub ficha_id:  Option<FichaId>,
  #[serde(rename = "persona", default)]
  pub person:    Option<PersonSummary>,
  #[serde(default)]
  pub ficha:     Option<FichaSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudentAssignment {
  #[serde(rename = "id_persona")]
  pub person_id: PersonId,
  #[serde(rename = "id_ficha")]
  pub ficha_id:  FichaId,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_joined_teacher_assignment() {
    let raw = r#"{
      "id_docente_materia_ficha": 11,
      "ficha": { "numero_ficha": "2671234", "carrera": { "nombre": "ADSO", "descripcion": "x" } },
      "persona": { "documento": "1", "nombre": "Ana", "apellido": "Ruiz", "correo": "a@b.c" },
      "materia": { "nombre": "Bases de datos", "tipo": "técnica" }
    }"#;
    let a: TeacherAssignment = serde_json::from_str(raw).unwrap();
    assert_eq!(a.id, AssignmentId(11));
    assert_eq!(a.person.unwrap().full_name(), "Ana Ruiz");
    assert_eq!(a.ficha.unwrap().number, 2671234);
    assert!(a.person_id.is_none());
  }

  #[test]
  fn new_student_assignment_uses_backend_keys() {
    let body = NewStudentAssignment { person_id: PersonId(3), ficha_id: FichaId(8) };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json, serde_json::json!({ "id_persona": 3, "id_ficha": 8 }));
  }
}
