//! Academic structure: careers, fichas (cohorts) and subjects.

use serde::{Deserialize, Serialize};

use crate::{
  decode,
  id::{CareerId, FichaId, SubjectId},
};

// ─── Career ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
  #[serde(rename = "id_carrera")]
  pub id:          CareerId,
  #[serde(rename = "nombre")]
  pub name:        String,
  #[serde(rename = "descripcion")]
  pub description: String,
}

/// Body of both `POST /carreras` and `PUT /carreras/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCareer {
  #[serde(rename = "nombre")]
  pub name:        String,
  #[serde(rename = "descripcion")]
  pub description: String,
}

/// A career as embedded in ficha rows; the backend omits the id there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerSummary {
  #[serde(rename = "nombre")]
  pub name:        String,
  #[serde(rename = "descripcion", default)]
  pub description: Option<String>,
}

// ─── Ficha ───────────────────────────────────────────────────────────────────

/// A cohort / course offering grouping students and teachers under a career.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ficha {
  #[serde(rename = "id_ficha")]
  pub id:        FichaId,
  #[serde(rename = "numero_ficha", deserialize_with = "decode::ficha_number")]
  pub number:    u32,
  #[serde(rename = "id_carrera", default)]
  pub career_id: Option<CareerId>,
  #[serde(rename = "carrera", default)]
  pub career:    Option<CareerSummary>,
}

impl Ficha {
  /// Career name, preferring the embedded career over a lookup in `careers`.
  pub fn career_name<'a>(&'a self, careers: &'a [Career]) -> Option<&'a str> {
    if let Some(c) = &self.career {
      return Some(&c.name);
    }
    let id = self.career_id?;
    careers.iter().find(|c| c.id == id).map(|c| c.name.as_str())
  }
}

/// Body of `POST /fichas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFicha {
  #[serde(rename = "numero_ficha")]
  pub number:    u32,
  #[serde(rename = "id_carrera")]
  pub career_id: CareerId,
}

/// Body of `PUT /fichas/:id`. The career cannot be changed after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FichaChanges {
  #[serde(rename = "numero_ficha")]
  pub number: u32,
}

/// A ficha as embedded in assignment rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FichaSummary {
  #[serde(rename = "numero_ficha", deserialize_with = "decode::ficha_number")]
  pub number: u32,
  #[serde(rename = "carrera", default)]
  pub career: Option<CareerSummary>,
}

// ─── Subject ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  #[serde(rename = "id_materia")]
  pub id:   SubjectId,
  #[serde(rename = "nombre")]
  pub name: String,
  /// Free-form subject type, e.g. "técnica" or "transversal".
  #[serde(rename = "tipo")]
  pub kind: String,
}

/// Body of both `POST /materias` and `PUT /materias/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubject {
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "tipo")]
  pub kind: String,
}

/// A subject as embedded in teacher assignment rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSummary {
  #[serde(rename = "nombre")]
  pub name: String,
  #[serde(rename = "tipo", default)]
  pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn careers() -> Vec<Career> {
    vec![Career {
      id:          CareerId(1),
      name:        "ADSO".into(),
      description: "Análisis y desarrollo de software".into(),
    }]
  }

  #[test]
  fn ficha_resolves_career_from_list() {
    let f: Ficha =
      serde_json::from_str(r#"{ "id_ficha": 5, "numero_ficha": 2671234, "id_carrera": 1 }"#)
        .unwrap();
    assert_eq!(f.career_name(&careers()), Some("ADSO"));
  }

  #[test]
  fn ficha_prefers_embedded_career() {
    let f: Ficha = serde_json::from_str(
      r#"{ "id_ficha": 5, "numero_ficha": "2671234", "carrera": { "nombre": "Cocina" } }"#,
    )
    .unwrap();
    assert_eq!(f.number, 2671234);
    assert_eq!(f.career_name(&careers()), Some("Cocina"));
  }

  #[test]
  fn ficha_with_unknown_career_resolves_to_none() {
    let f: Ficha =
      serde_json::from_str(r#"{ "id_ficha": 5, "numero_ficha": 1, "id_carrera": 99 }"#).unwrap();
    assert_eq!(f.career_name(&careers()), None);
  }
}
