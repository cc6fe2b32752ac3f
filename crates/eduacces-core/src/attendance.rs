//! Attendance events and the sensor reply to a check-in/check-out.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  decode,
  id::{AttendanceId, PersonId},
};

/// Whether an attendance row (or a verification) is an entry or an exit.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AttendanceState {
  Entrada,
  Salida,
}

/// One row of `GET /asistencia`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  #[serde(rename = "id_asistencia")]
  pub id:        AttendanceId,
  #[serde(rename = "id_persona")]
  pub person_id: PersonId,
  #[serde(rename = "fecha", deserialize_with = "decode::flexible_date")]
  pub date:      NaiveDate,
  #[serde(rename = "hora_entrada", default)]
  pub check_in:  Option<NaiveTime>,
  #[serde(rename = "hora_salida", default)]
  pub check_out: Option<NaiveTime>,
  #[serde(rename = "estado")]
  pub state:     AttendanceState,
}

// ─── Verification reply ──────────────────────────────────────────────────────

/// Identity fields the sensor backend may report after a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchData {
  #[serde(default)]
  pub id_registro: Option<i64>,
  #[serde(default)]
  pub id_persona:  Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorEnvelope {
  #[serde(default)]
  pub data: Option<MatchData>,
}

/// Reply to `POST /asistencia` and `POST /asistencia/salida`.
///
/// Check-in replies nest the raw sensor result under `sensorData`; check-out
/// replies put the stored attendance row under `data`. Older backends put the
/// sensor result directly under `data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationReply {
  #[serde(default)]
  pub data:        Option<MatchData>,
  #[serde(rename = "sensorData", default)]
  pub sensor_data: Option<SensorEnvelope>,
  #[serde(default)]
  pub message:     Option<String>,
}

impl VerificationReply {
  /// The person a `direction` verification matched, if the reply names one.
  ///
  /// Entries report the sensor match: `sensorData.data.id_registro`, or
  /// `data.id_registro` from older backends. Exits report the stored row:
  /// `data.id_persona`.
  pub fn matched_person(&self, direction: AttendanceState) -> Option<PersonId> {
    let data = self.data.as_ref();
    let id = match direction {
      AttendanceState::Entrada => self
        .sensor_data
        .as_ref()
        .and_then(|s| s.data.as_ref())
        .and_then(|d| d.id_registro)
        .or_else(|| data.and_then(|d| d.id_registro)),
      AttendanceState::Salida => data.and_then(|d| d.id_persona),
    };
    id.map(PersonId)
  }
}
