//! Integer identifiers assigned by the backend.
//!
//! Every record kind gets its own newtype so a ficha id can never be passed
//! where a person id is expected. On the wire they are bare JSON numbers.

use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_type {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
    }

    impl From<i64> for $name {
      fn from(raw: i64) -> Self { Self(raw) }
    }

    impl FromStr for $name {
      type Err = ParseIntError;

      fn from_str(s: &str) -> Result<Self, Self::Err> { s.trim().parse().map(Self) }
    }
  };
}

id_type!(
  /// `id_persona`
  PersonId
);
id_type!(
  /// `id_user`
  UserId
);
id_type!(
  /// `id_carrera`
  CareerId
);
id_type!(
  /// `id_ficha`
  FichaId
);
id_type!(
  /// `id_materia`
  SubjectId
);
id_type!(
  /// `id_docente_materia_ficha` or `id_estudiante_ficha`, depending on the
  /// assignment kind.
  AssignmentId
);
id_type!(
  /// `id_asistencia`
  AttendanceId
);
id_type!(
  /// `id_sensor`: a template slot on the fingerprint reader.
  SensorSlot
);

impl SensorSlot {
  /// Zero-padded label as printed on the fingerprint management screen,
  /// e.g. `#007`.
  pub fn label(&self) -> String { format!("#{:03}", self.0) }
}
