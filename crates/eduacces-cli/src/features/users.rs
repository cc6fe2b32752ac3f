//! Login accounts.

use anyhow::Context;
use eduacces_client::ApiClient;
use eduacces_core::{
  PersonId, UserId,
  account::{NewUser, UserAccount, UserChanges},
  person::Person,
};

use super::{Feature, find};
use crate::{
  form::{Form, Values},
  picker::Choice,
  table::{Searchable, TableView},
};

impl Searchable for UserAccount {
  fn search_text(&self) -> String {
    let role = self.role.as_ref().map(|r| r.as_str()).unwrap_or_default();
    format!("{} {} {}", self.email, self.display_name(), role)
  }
}

pub struct UsersTab {
  table:   TableView<UserAccount>,
  persons: Vec<Person>,
}

impl UsersTab {
  pub fn new(page_size: usize) -> Self {
    Self { table: TableView::new(page_size), persons: Vec::new() }
  }
}

/// Choices for a person select, labelled with name and document.
pub fn person_choices<'a>(persons: impl IntoIterator<Item = &'a Person>) -> Vec<Choice> {
  persons
    .into_iter()
    .map(|p| Choice::new(p.id, format!("{} · {}", p.full_name(), p.document)))
    .collect()
}

/// Fill in names the backend did not join in.
fn attach_names(accounts: &mut [UserAccount], persons: &[Person]) {
  for account in accounts.iter_mut().filter(|a| a.first_name.is_none()) {
    if let Some(p) = persons.iter().find(|p| p.id == account.person_id) {
      account.first_name = Some(p.first_name.clone());
      account.last_name = Some(p.last_name.clone());
      account.role.get_or_insert_with(|| p.role.clone());
    }
  }
}

impl Feature for UsersTab {
  type Record = UserAccount;

  const TITLE: &'static str = "Users";
  const EMPTY: &'static str = "No user accounts yet. Press n to create one.";
  const COLUMNS: &'static [(&'static str, u16)] =
    &[("ID", 1), ("Email", 4), ("Name", 4), ("Role", 2), ("Status", 2)];

  fn table(&self) -> &TableView<UserAccount> { &self.table }

  fn table_mut(&mut self) -> &mut TableView<UserAccount> { &mut self.table }

  fn cells(u: &UserAccount) -> Vec<String> {
    vec![
      u.id.to_string(),
      u.email.clone(),
      u.display_name(),
      u.role.as_ref().map(ToString::to_string).unwrap_or_else(|| "-".into()),
      u.status.clone().unwrap_or_else(|| "-".into()),
    ]
  }

  fn key_of(u: &UserAccount) -> i64 { u.id.0 }

  fn describe(u: &UserAccount) -> String { format!("account {}", u.email) }

  async fn load(&mut self, api: &ApiClient) -> anyhow::Result<()> {
    let mut accounts = api.users().list().await?;
    self.persons = api.persons().list().await?;
    attach_names(&mut accounts, &self.persons);
    self.table.set_items(accounts);
    Ok(())
  }

  fn create_form(&self) -> Option<Form> {
    Some(
      Form::create("New user")
        .text("correo", "Email", "")
        .secret("password", "Password")
        .select("id_persona", "Person", person_choices(&self.persons), None),
    )
  }

  fn edit_form(&self, u: &UserAccount) -> Option<Form> {
    Some(Form::edit(format!("Edit {}", u.email), u.id.0).text("correo", "Email", &u.email))
  }

  async fn submit(
    &self,
    api: &ApiClient,
    editing: Option<i64>,
    v: Values,
  ) -> anyhow::Result<&'static str> {
    match editing {
      None => {
        let body = NewUser {
          email:     v.text("correo"),
          password:  v.text("password"),
          person_id: v.parse::<PersonId>("id_persona").map_err(anyhow::Error::msg)?,
        };
        api.users().create(&body).await?;
        Ok("user created")
      }
      Some(id) => {
        let current = find(self, id).context("the account no longer exists")?;
        let changes = UserChanges { email: v.text("correo"), person_id: current.person_id };
        api.users().update(UserId(id), &changes).await?;
        Ok("user updated")
      }
    }
  }

  async fn remove(&self, api: &ApiClient, id: i64) -> anyhow::Result<()> {
    api.users().delete(UserId(id)).await?;
    Ok(())
  }
}
