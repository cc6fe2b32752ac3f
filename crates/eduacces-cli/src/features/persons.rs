//! Persons: the profiles every other record hangs off.

use eduacces_client::ApiClient;
use eduacces_core::{
  PersonId,
  person::{NewPerson, Person, PersonChanges, Role},
};

use super::Feature;
use crate::{
  form::{Form, Values},
  picker::Choice,
  table::{Searchable, TableView},
};

impl Searchable for Person {
  fn search_text(&self) -> String {
    format!(
      "{} {} {} {} {} {}",
      self.first_name, self.last_name, self.document, self.email, self.phone, self.role
    )
  }
}

pub struct PersonsTab {
  table: TableView<Person>,
}

impl PersonsTab {
  pub fn new(page_size: usize) -> Self { Self { table: TableView::new(page_size) } }
}

fn role_choices() -> Vec<Choice> {
  Role::selectable().iter().map(|r| Choice::new(r, r.as_str())).collect()
}

fn details(form: Form, p: Option<&Person>) -> Form {
  let get = |f: fn(&Person) -> &str| p.map(f).unwrap_or_default();
  form
    .text("documento", "Document", get(|p| &p.document))
    .text("nombre", "First name", get(|p| &p.first_name))
    .text("apellido", "Last name", get(|p| &p.last_name))
    .text("correo", "Email", get(|p| &p.email))
    .text("telefono", "Phone", get(|p| &p.phone))
}

impl Feature for PersonsTab {
  type Record = Person;

  const TITLE: &'static str = "Persons";
  const EMPTY: &'static str = "No persons registered yet. Press n to add one.";
  const COLUMNS: &'static [(&'static str, u16)] = &[
    ("ID", 1),
    ("Document", 2),
    ("Name", 4),
    ("Email", 4),
    ("Phone", 2),
    ("Role", 2),
  ];

  fn table(&self) -> &TableView<Person> { &self.table }

  fn table_mut(&mut self) -> &mut TableView<Person> { &mut self.table }

  fn cells(p: &Person) -> Vec<String> {
    vec![
      p.id.to_string(),
      p.document.clone(),
      p.full_name(),
      p.email.clone(),
      p.phone.clone(),
      p.role.to_string(),
    ]
  }

  fn key_of(p: &Person) -> i64 { p.id.0 }

  fn describe(p: &Person) -> String { p.full_name() }

  async fn load(&mut self, api: &ApiClient) -> anyhow::Result<()> {
    self.table.set_items(api.persons().list().await?);
    Ok(())
  }

  fn create_form(&self) -> Option<Form> {
    let form = details(Form::create("New person"), None);
    Some(form.select("rol", "Role", role_choices(), None))
  }

  fn edit_form(&self, p: &Person) -> Option<Form> {
    Some(details(Form::edit(format!("Edit {}", p.full_name()), p.id.0), Some(p)))
  }

  async fn submit(
    &self,
    api: &ApiClient,
    editing: Option<i64>,
    v: Values,
  ) -> anyhow::Result<&'static str> {
    match editing {
      None => {
        let body = NewPerson {
          document:   v.text("documento"),
          first_name: v.text("nombre"),
          last_name:  v.text("apellido"),
          email:      v.text("correo"),
          phone:      v.text("telefono"),
          role:       Role::from(v.text("rol")),
        };
        api.persons().create(&body).await?;
        Ok("person created")
      }
      Some(id) => {
        let changes = PersonChanges {
          document:   v.text("documento"),
          first_name: v.text("nombre"),
          last_name:  v.text("apellido"),
          email:      v.text("correo"),
          phone:      v.text("telefono"),
        };
        api.persons().update(PersonId(id), &changes).await?;
        Ok("person updated")
      }
    }
  }

  async fn remove(&self, api: &ApiClient, id: i64) -> anyhow::Result<()> {
    api.persons().delete(PersonId(id)).await?;
    Ok(())
  }
}
