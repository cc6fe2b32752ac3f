//! Fichas (training cohorts), each tied to a career.

use eduacces_client::ApiClient;
use eduacces_core::{
  CareerId, FichaId,
  academic::{Career, Ficha, FichaChanges, NewFicha},
};

use super::Feature;
use crate::{
  form::{Form, Values},
  picker::Choice,
  table::{Searchable, TableView},
};

pub const CAREER_NOT_FOUND: &str = "career not found";

/// A ficha with its career name resolved at load time.
pub struct FichaRow {
  pub ficha:  Ficha,
  pub career: Option<String>,
}

impl FichaRow {
  pub fn resolve(ficha: Ficha, careers: &[Career]) -> Self {
    let career = ficha.career_name(careers).map(str::to_owned);
    Self { ficha, career }
  }

  pub fn career_label(&self) -> &str { self.career.as_deref().unwrap_or(CAREER_NOT_FOUND) }
}

impl Searchable for FichaRow {
  fn search_text(&self) -> String { format!("{} {}", self.ficha.number, self.career_label()) }
}

pub struct FichasTab {
  table:   TableView<FichaRow>,
  careers: Vec<Career>,
}

impl FichasTab {
  pub fn new(page_size: usize) -> Self {
    Self { table: TableView::new(page_size), careers: Vec::new() }
  }
}

impl Feature for FichasTab {
  type Record = FichaRow;

  const TITLE: &'static str = "Fichas";
  const EMPTY: &'static str = "No fichas yet. Press n to open one.";
  const COLUMNS: &'static [(&'static str, u16)] = &[("ID", 1), ("Number", 3), ("Career", 6)];

  fn table(&self) -> &TableView<FichaRow> { &self.table }

  fn table_mut(&mut self) -> &mut TableView<FichaRow> { &mut self.table }

  fn cells(r: &FichaRow) -> Vec<String> {
    vec![r.ficha.id.to_string(), r.ficha.number.to_string(), r.career_label().to_owned()]
  }

  fn key_of(r: &FichaRow) -> i64 { r.ficha.id.0 }

  fn describe(r: &FichaRow) -> String { format!("ficha {}", r.ficha.number) }

  async fn load(&mut self, api: &ApiClient) -> anyhow::Result<()> {
    let fichas = api.fichas().list().await?;
    self.careers = api.careers().list().await?;
    let rows = fichas.into_iter().map(|f| FichaRow::resolve(f, &self.careers)).collect();
    self.table.set_items(rows);
    Ok(())
  }

  fn create_form(&self) -> Option<Form> {
    let careers = self.careers.iter().map(|c| Choice::new(c.id, &c.name)).collect();
    Some(
      Form::create("New ficha")
        .number("numero_ficha", "Number", None)
        .select("id_carrera", "Career", careers, None),
    )
  }

  fn edit_form(&self, r: &FichaRow) -> Option<Form> {
    Some(
      Form::edit(format!("Edit ficha {}", r.ficha.number), r.ficha.id.0).number(
        "numero_ficha",
        "Number",
        Some(r.ficha.number),
      ),
    )
  }

  async fn submit(
    &self,
    api: &ApiClient,
    editing: Option<i64>,
    v: Values,
  ) -> anyhow::Result<&'static str> {
    let number = v.parse::<u32>("numero_ficha").map_err(anyhow::Error::msg)?;
    match editing {
      None => {
        let career_id = v.parse::<CareerId>("id_carrera").map_err(anyhow::Error::msg)?;
        api.fichas().create(&NewFicha { number, career_id }).await?;
        Ok("ficha created")
      }
      Some(id) => {
        api.fichas().update(FichaId(id), &FichaChanges { number }).await?;
        Ok("ficha updated")
      }
    }
  }

  async fn remove(&self, api: &ApiClient, id: i64) -> anyhow::Result<()> {
    api.fichas().delete(FichaId(id)).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn adso() -> Career {
    Career { id: CareerId(2), name: "ADSO".into(), description: "Software".into() }
  }

  fn ficha(raw: &str) -> Ficha { serde_json::from_str(raw).unwrap() }

  #[test]
  fn career_is_resolved_from_loaded_careers() {
    let raw = r#"{ "id_ficha": 1, "numero_ficha": 2758443, "id_carrera": 2 }"#;
    let row = FichaRow::resolve(ficha(raw), &[adso()]);
    assert_eq!(row.career_label(), "ADSO");
    assert!(row.search_text().contains("2758443"));
  }

  #[test]
  fn unknown_career_is_labelled() {
    let raw = r#"{ "id_ficha": 1, "numero_ficha": "9", "id_carrera": 5 }"#;
    let row = FichaRow::resolve(ficha(raw), &[adso()]);
    assert_eq!(row.career_label(), CAREER_NOT_FOUND);
  }

  #[test]
  fn create_form_offers_loaded_careers() {
    let mut tab = FichasTab::new(10);
    tab.careers = vec![adso()];
    let form = tab.create_form().unwrap();
    assert_eq!(form.fields[1].choices(), [Choice::new(2, "ADSO")]);
  }
}
