//! Attendance: pick a person, verify their fingerprint to record an entry or
//! exit, and browse the history.

use chrono::NaiveTime;
use crossterm::event::{KeyCode, KeyEvent};
use eduacces_client::ApiClient;
use eduacces_core::{
  PersonId,
  attendance::{AttendanceRecord, AttendanceState},
  person::Person,
};

use super::{Reaction, users::person_choices};
use crate::{
  app::Modal,
  notice::Notice,
  picker::{Choice, Picker},
  sensor::{SensorMode, SensorModal},
  table::{Searchable, TableView},
};

pub const COLUMNS: &[(&str, u16)] = &[
  ("ID", 1),
  ("Person", 4),
  ("Date", 2),
  ("Check-in", 2),
  ("Check-out", 2),
  ("State", 2),
];
pub const EMPTY: &str = "No attendance recorded yet. Press p to pick a person, then i to check in.";

pub struct AttendanceRow {
  pub record: AttendanceRecord,
  pub person: String,
}

impl AttendanceRow {
  pub fn resolve(record: AttendanceRecord, persons: &[Person]) -> Self {
    let person = persons
      .iter()
      .find(|p| p.id == record.person_id)
      .map(Person::full_name)
      .unwrap_or_else(|| "unknown".into());
    Self { record, person }
  }

  pub fn cells(&self) -> Vec<String> {
    let r = &self.record;
    vec![
      r.id.to_string(),
      self.person.clone(),
      r.date.format("%Y-%m-%d").to_string(),
      hhmm(r.check_in),
      hhmm(r.check_out),
      r.state.to_string(),
    ]
  }
}

fn hhmm(t: Option<NaiveTime>) -> String {
  t.map(|t| t.format("%H:%M").to_string()).unwrap_or_else(|| "-".into())
}

impl Searchable for AttendanceRow {
  fn search_text(&self) -> String {
    format!("{} {} {}", self.person, self.record.date, self.record.state)
  }
}

pub struct AttendanceTab {
  pub table:    TableView<AttendanceRow>,
  persons:      Vec<Person>,
  /// The person the next check-in/out is for.
  pub selected: Option<(PersonId, String)>,
}

impl AttendanceTab {
  pub fn new(page_size: usize) -> Self {
    Self { table: TableView::new(page_size), persons: Vec::new(), selected: None }
  }

  pub async fn load(&mut self, api: &ApiClient) -> anyhow::Result<()> {
    let records = api.list_attendance().await?;
    self.persons = api.persons().list().await?;
    let rows = records.into_iter().map(|r| AttendanceRow::resolve(r, &self.persons)).collect();
    self.table.set_items(rows);
    Ok(())
  }

  pub async fn reload(&mut self, api: &ApiClient) -> Reaction {
    match self.load(api).await {
      Ok(()) => Reaction::Done,
      Err(e) => {
        tracing::warn!(error = %e, "loading attendance failed");
        Reaction::Notice(Notice::error(e.to_string()))
      }
    }
  }

  pub fn picker(&self) -> Picker { Picker::new("Select person", person_choices(&self.persons)) }

  /// Apply a choice from [`picker`](Self::picker).
  pub fn select(&mut self, choice: &Choice) {
    if let Ok(id) = choice.id.parse::<PersonId>() {
      let name = self
        .persons
        .iter()
        .find(|p| p.id == id)
        .map(Person::full_name)
        .unwrap_or_else(|| choice.label.clone());
      self.selected = Some((id, name));
    }
  }

  fn verify(&self, api: &ApiClient, direction: AttendanceState) -> Reaction {
    match &self.selected {
      Some((id, name)) => Reaction::Open(Modal::Sensor(SensorModal::new(
        api.clone(),
        SensorMode::Verify(direction),
        *id,
        name.clone(),
      ))),
      None => Reaction::Notice(Notice::error("select a person first")),
    }
  }

  pub async fn handle_key(&mut self, api: &ApiClient, key: KeyEvent) -> Reaction {
    if self.table.handle_key(key) {
      return Reaction::Done;
    }
    if self.table.searching {
      return Reaction::Ignored;
    }
    match key.code {
      KeyCode::Char('p') => Reaction::Open(Modal::Picker(self.picker())),
      KeyCode::Char('i') => self.verify(api, AttendanceState::Entrada),
      KeyCode::Char('o') => self.verify(api, AttendanceState::Salida),
      KeyCode::Char('r') => self.reload(api).await,
      _ => Reaction::Ignored,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use crossterm::event::KeyModifiers;
  use eduacces_client::{ApiConfig, StaticToken};
  use eduacces_core::person::Role;

  use super::*;

  fn api() -> ApiClient {
    ApiClient::new(ApiConfig::default(), Arc::new(StaticToken::none())).unwrap()
  }

  fn key(c: char) -> KeyEvent { KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE) }

  fn record(raw: &str) -> AttendanceRecord { serde_json::from_str(raw).unwrap() }

  #[test]
  fn rows_show_times_and_unknown_people() {
    let r = record(
      r#"{ "id_asistencia": 5, "id_persona": 9, "fecha": "2025-03-01",
           "hora_entrada": "07:58:12", "estado": "ENTRADA" }"#,
    );
    let row = AttendanceRow::resolve(r, &[]);
    assert_eq!(row.cells(), ["5", "unknown", "2025-03-01", "07:58", "-", "ENTRADA"]);
  }

  #[tokio::test]
  async fn check_in_without_person_is_refused() {
    let mut tab = AttendanceTab::new(10);
    let reaction = tab.handle_key(&api(), key('i')).await;
    match reaction {
      Reaction::Notice(n) => assert_eq!(n.text, "select a person first"),
      _ => panic!("expected a notice"),
    }
  }

  #[tokio::test]
  async fn picked_person_opens_verification() {
    let mut tab = AttendanceTab::new(10);
    tab.persons = vec![Person {
      id:         PersonId(7),
      document:   "77".into(),
      first_name: "Ana".into(),
      last_name:  "Ruiz".into(),
      email:      String::new(),
      phone:      String::new(),
      role:       Role::Student,
    }];
    tab.select(&Choice::new(7, "Ana Ruiz · 77"));
    assert_eq!(tab.selected, Some((PersonId(7), "Ana Ruiz".to_string())));

    let reaction = tab.handle_key(&api(), key('o')).await;
    match reaction {
      Reaction::Open(Modal::Sensor(m)) => {
        assert_eq!(m.mode, SensorMode::Verify(AttendanceState::Salida));
        assert_eq!(m.person, PersonId(7));
      }
      _ => panic!("expected the sensor modal"),
    }
  }
}
