//! The fingerprint modal: one [`Enrollment`] per opening, driven from a
//! spawned task so the modal can show progress while the sensor waits.

use std::sync::Arc;

use eduacces_client::ApiClient;
use eduacces_core::{Enrollment, PersonId, attendance::AttendanceState};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorMode {
  Enroll,
  Verify(AttendanceState),
}

pub struct SensorModal {
  pub mode:        SensorMode,
  pub person:      PersonId,
  pub person_name: String,
  pub flow:        Arc<Enrollment<ApiClient>>,
}

impl SensorModal {
  pub fn new(api: ApiClient, mode: SensorMode, person: PersonId, person_name: String) -> Self {
    Self { mode, person, person_name, flow: Arc::new(Enrollment::new(api)) }
  }

  pub fn title(&self) -> &'static str {
    match self.mode {
      SensorMode::Enroll => " Enroll fingerprint ",
      SensorMode::Verify(AttendanceState::Entrada) => " Check-in ",
      SensorMode::Verify(AttendanceState::Salida) => " Check-out ",
    }
  }

  /// Run the operation in the background. Success is reported on `events`;
  /// failure lands in the orchestrator's snapshot.
  pub fn start(&self, events: UnboundedSender<AppEvent>) {
    let flow = self.flow.clone();
    let person = self.person;
    let mode = self.mode;
    tokio::spawn(async move {
      match mode {
        SensorMode::Enroll => {
          flow
            .enroll(person, move || {
              events.send(AppEvent::Enrolled(person)).ok();
            })
            .await
        }
        SensorMode::Verify(direction) => {
          flow
            .verify(direction, person, move || {
              events.send(AppEvent::Verified(direction)).ok();
            })
            .await
        }
      };
    });
  }
}
