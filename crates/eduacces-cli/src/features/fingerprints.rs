//! Sensor slots in use and the capacity left on the reader.

use eduacces_client::ApiClient;
use eduacces_core::{
  PersonId,
  fingerprint::{FingerprintMapping, SENSOR_CAPACITY, SensorUsage},
  person::Person,
};

use super::Feature;
use crate::table::{Searchable, TableView};

pub struct FingerprintRow {
  pub mapping: FingerprintMapping,
  pub person:  String,
}

impl FingerprintRow {
  fn resolve(mapping: FingerprintMapping, persons: &[Person]) -> Self {
    let person = mapping
      .person_name
      .clone()
      .or_else(|| persons.iter().find(|p| p.id == mapping.person_id).map(Person::full_name))
      .unwrap_or_else(|| "unknown".into());
    Self { mapping, person }
  }
}

impl Searchable for FingerprintRow {
  fn search_text(&self) -> String {
    format!("{} {} {}", self.mapping.sensor_slot.label(), self.person, self.mapping.person_id)
  }
}

pub struct FingerprintsTab {
  table:     TableView<FingerprintRow>,
  pub usage: SensorUsage,
}

impl FingerprintsTab {
  pub fn new(page_size: usize) -> Self {
    Self {
      table: TableView::new(page_size),
      usage: SensorUsage { used: 0, capacity: SENSOR_CAPACITY },
    }
  }
}

impl Feature for FingerprintsTab {
  type Record = FingerprintRow;

  const TITLE: &'static str = "Fingerprints";
  const EMPTY: &'static str =
    "No fingerprints stored on the sensor. Enroll one from the Persons tab with f.";
  const COLUMNS: &'static [(&'static str, u16)] = &[("Slot", 1), ("Person ID", 1), ("Person", 4)];

  fn table(&self) -> &TableView<FingerprintRow> { &self.table }

  fn table_mut(&mut self) -> &mut TableView<FingerprintRow> { &mut self.table }

  fn cells(r: &FingerprintRow) -> Vec<String> {
    vec![r.mapping.sensor_slot.label(), r.mapping.person_id.to_string(), r.person.clone()]
  }

  /// Templates are deleted by person, not by slot.
  fn key_of(r: &FingerprintRow) -> i64 { r.mapping.person_id.0 }

  fn describe(r: &FingerprintRow) -> String {
    format!("the fingerprint of {} (slot {})", r.person, r.mapping.sensor_slot.label())
  }

  async fn load(&mut self, api: &ApiClient) -> anyhow::Result<()> {
    let mappings = api.fingerprint_map().await?;
    let persons = api.persons().list().await?;
    self.usage = SensorUsage::of(&mappings);
    let rows = mappings.into_iter().map(|m| FingerprintRow::resolve(m, &persons)).collect();
    self.table.set_items(rows);
    Ok(())
  }

  async fn remove(&self, api: &ApiClient, id: i64) -> anyhow::Result<()> {
    api.delete_fingerprint(PersonId(id)).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use eduacces_core::SensorSlot;

  use super::*;

  #[test]
  fn rows_prefer_the_mapped_name() {
    let m = FingerprintMapping {
      sensor_slot: SensorSlot(7),
      person_id:   PersonId(42),
      person_name: Some("Ana Ruiz".into()),
    };
    let row = FingerprintRow::resolve(m, &[]);
    assert_eq!(FingerprintsTab::cells(&row), ["#007", "42", "Ana Ruiz"]);
    assert_eq!(FingerprintsTab::key_of(&row), 42);
  }
}
