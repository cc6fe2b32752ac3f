use eduacces_client::ApiClient;
use eduacces_core::{
  SubjectId,
  academic::{NewSubject, Subject},
};

use super::Feature;
use crate::{
  form::{Form, Values},
  table::{Searchable, TableView},
};

impl Searchable for Subject {
  fn search_text(&self) -> String { format!("{} {}", self.name, self.kind) }
}

pub struct SubjectsTab {
  table: TableView<Subject>,
}

impl SubjectsTab {
  pub fn new(page_size: usize) -> Self { Self { table: TableView::new(page_size) } }
}

impl Feature for SubjectsTab {
  type Record = Subject;

  const TITLE: &'static str = "Subjects";
  const EMPTY: &'static str = "No subjects yet. Press n to add one.";
  const COLUMNS: &'static [(&'static str, u16)] = &[("ID", 1), ("Name", 5), ("Type", 3)];

  fn table(&self) -> &TableView<Subject> { &self.table }

  fn table_mut(&mut self) -> &mut TableView<Subject> { &mut self.table }

  fn cells(s: &Subject) -> Vec<String> { vec![s.id.to_string(), s.name.clone(), s.kind.clone()] }

  fn key_of(s: &Subject) -> i64 { s.id.0 }

  fn describe(s: &Subject) -> String { format!("subject {}", s.name) }

  async fn load(&mut self, api: &ApiClient) -> anyhow::Result<()> {
    self.table.set_items(api.subjects().list().await?);
    Ok(())
  }

  fn create_form(&self) -> Option<Form> {
    Some(Form::create("New subject").text("nombre", "Name", "").text("tipo", "Type", ""))
  }

  fn edit_form(&self, s: &Subject) -> Option<Form> {
    Some(
      Form::edit(format!("Edit {}", s.name), s.id.0)
        .text("nombre", "Name", &s.name)
        .text("tipo", "Type", &s.kind),
    )
  }

  async fn submit(
    &self,
    api: &ApiClient,
    editing: Option<i64>,
    v: Values,
  ) -> anyhow::Result<&'static str> {
    let body = NewSubject { name: v.text("nombre"), kind: v.text("tipo") };
    match editing {
      None => {
        api.subjects().create(&body).await?;
        Ok("subject created")
      }
      Some(id) => {
        api.subjects().update(SubjectId(id), &body).await?;
        Ok("subject updated")
      }
    }
  }

  async fn remove(&self, api: &ApiClient, id: i64) -> anyhow::Result<()> {
    api.subjects().delete(SubjectId(id)).await?;
    Ok(())
  }
}
