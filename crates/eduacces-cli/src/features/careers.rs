use eduacces_client::ApiClient;
use eduacces_core::{
  CareerId,
  academic::{Career, NewCareer},
};

use super::Feature;
use crate::{
  form::{Form, Values},
  table::{Searchable, TableView},
};

impl Searchable for Career {
  fn search_text(&self) -> String { format!("{} {}", self.name, self.description) }
}

pub struct CareersTab {
  table: TableView<Career>,
}

impl CareersTab {
  pub fn new(page_size: usize) -> Self { Self { table: TableView::new(page_size) } }
}

impl Feature for CareersTab {
  type Record = Career;

  const TITLE: &'static str = "Careers";
  const EMPTY: &'static str = "No careers yet. Press n to create the first one.";
  const COLUMNS: &'static [(&'static str, u16)] = &[("ID", 1), ("Name", 4), ("Description", 8)];

  fn table(&self) -> &TableView<Career> { &self.table }

  fn table_mut(&mut self) -> &mut TableView<Career> { &mut self.table }

  fn cells(c: &Career) -> Vec<String> {
    vec![c.id.to_string(), c.name.clone(), c.description.clone()]
  }

  fn key_of(c: &Career) -> i64 { c.id.0 }

  fn describe(c: &Career) -> String { format!("career {}", c.name) }

  async fn load(&mut self, api: &ApiClient) -> anyhow::Result<()> {
    self.table.set_items(api.careers().list().await?);
    Ok(())
  }

  fn create_form(&self) -> Option<Form> {
    Some(
      Form::create("New career")
        .text("nombre", "Name", "")
        .text("descripcion", "Description", ""),
    )
  }

  fn edit_form(&self, c: &Career) -> Option<Form> {
    Some(
      Form::edit(format!("Edit {}", c.name), c.id.0)
        .text("nombre", "Name", &c.name)
        .text("descripcion", "Description", &c.description),
    )
  }

  async fn submit(
    &self,
    api: &ApiClient,
    editing: Option<i64>,
    v: Values,
  ) -> anyhow::Result<&'static str> {
    let body = NewCareer { name: v.text("nombre"), description: v.text("descripcion") };
    match editing {
      None => {
        api.careers().create(&body).await?;
        Ok("career created")
      }
      Some(id) => {
        api.careers().update(CareerId(id), &body).await?;
        Ok("career updated")
      }
    }
  }

  async fn remove(&self, api: &ApiClient, id: i64) -> anyhow::Result<()> {
    api.careers().delete(CareerId(id)).await?;
    Ok(())
  }
}
