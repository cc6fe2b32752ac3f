//! Fingerprint sensor slot mappings.

use serde::{Deserialize, Serialize};

use crate::id::{PersonId, SensorSlot};

/// Number of templates the fingerprint reader can hold.
pub const SENSOR_CAPACITY: usize = 127;

/// One occupied slot on the sensor, as returned by `GET /huella-map`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintMapping {
  #[serde(rename = "id_sensor")]
  pub sensor_slot: SensorSlot,
  #[serde(rename = "id_persona")]
  pub person_id:   PersonId,
  #[serde(rename = "nombre", default)]
  pub person_name: Option<String>,
}

/// Slot usage on the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorUsage {
  pub used:     usize,
  pub capacity: usize,
}

impl SensorUsage {
  pub fn of(mappings: &[FingerprintMapping]) -> Self {
    Self { used: mappings.len(), capacity: SENSOR_CAPACITY }
  }

  pub fn available(&self) -> usize { self.capacity.saturating_sub(self.used) }

  /// Percentage of slots in use, clamped to 100.
  pub fn percent(&self) -> f64 {
    if self.capacity == 0 {
      return 100.0;
    }
    (self.used as f64 / self.capacity as f64 * 100.0).min(100.0)
  }
}
