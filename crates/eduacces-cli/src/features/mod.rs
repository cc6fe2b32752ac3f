//! One module per dashboard tab.
//!
//! The CRUD tabs share a shape: load the whole collection, show it in a
//! [`TableView`], open a [`Form`] to create or edit, confirm before delete,
//! and re-fetch the whole collection after every mutation. [`Feature`]
//! captures the per-entity parts; the free functions here drive them.

pub mod assignments;
pub mod attendance;
pub mod careers;
pub mod fichas;
pub mod fingerprints;
pub mod overview;
pub mod persons;
pub mod subjects;
pub mod users;

use crossterm::event::{KeyCode, KeyEvent};
use eduacces_client::ApiClient;

use crate::{
  app::{Confirm, Modal},
  form::{Form, Values},
  notice::Notice,
  table::{Searchable, TableView},
};

/// What a key press on a tab asks the app to do.
pub enum Reaction {
  /// The tab does not use this key.
  Ignored,
  Done,
  Open(Modal),
  Notice(Notice),
}

pub trait Feature {
  type Record: Searchable;

  const TITLE: &'static str;
  /// Shown instead of the table when the collection is empty.
  const EMPTY: &'static str;
  /// Column headers and their relative widths.
  const COLUMNS: &'static [(&'static str, u16)];

  fn table(&self) -> &TableView<Self::Record>;

  fn table_mut(&mut self) -> &mut TableView<Self::Record>;

  fn cells(record: &Self::Record) -> Vec<String>;

  /// Raw id used for edit and delete.
  fn key_of(record: &Self::Record) -> i64;

  /// Short description used in the delete prompt.
  fn describe(record: &Self::Record) -> String;

  /// Fetch the collection, plus whatever lookups the tab needs.
  async fn load(&mut self, api: &ApiClient) -> anyhow::Result<()>;

  fn create_form(&self) -> Option<Form> { None }

  fn edit_form(&self, _record: &Self::Record) -> Option<Form> { None }

  /// Send a validated form. Returns the confirmation to show.
  async fn submit(
    &self,
    _api: &ApiClient,
    _editing: Option<i64>,
    _values: Values,
  ) -> anyhow::Result<&'static str> {
    anyhow::bail!("{} cannot be edited here", Self::TITLE)
  }

  async fn remove(&self, api: &ApiClient, id: i64) -> anyhow::Result<()>;
}

/// Keys shared by every CRUD tab.
pub async fn handle_key<F: Feature>(feature: &mut F, api: &ApiClient, key: KeyEvent) -> Reaction {
  if feature.table_mut().handle_key(key) {
    return Reaction::Done;
  }
  if feature.table().searching {
    return Reaction::Ignored;
  }

  match key.code {
    KeyCode::Char('r') => reload(feature, api).await,
    KeyCode::Char('n') => match feature.create_form() {
      Some(form) => Reaction::Open(Modal::Form(form)),
      None => Reaction::Ignored,
    },
    KeyCode::Char('e') => {
      match feature.table().selected().and_then(|r| feature.edit_form(r)) {
        Some(form) => Reaction::Open(Modal::Form(form)),
        None => Reaction::Ignored,
      }
    }
    KeyCode::Char('d') => match feature.table().selected() {
      Some(record) => Reaction::Open(Modal::Confirm(Confirm {
        prompt: format!("Delete {}?", F::describe(record)),
        id:     F::key_of(record),
      })),
      None => Reaction::Ignored,
    },
    _ => Reaction::Ignored,
  }
}

pub async fn reload<F: Feature>(feature: &mut F, api: &ApiClient) -> Reaction {
  match feature.load(api).await {
    Ok(()) => Reaction::Done,
    Err(e) => {
      tracing::warn!(tab = F::TITLE, error = %e, "load failed");
      Reaction::Notice(Notice::error(e.to_string()))
    }
  }
}

/// Load on first activation only.
pub async fn ensure_loaded<F: Feature>(feature: &mut F, api: &ApiClient) -> Reaction {
  if feature.table().is_loaded() {
    return Reaction::Done;
  }
  reload(feature, api).await
}

/// Submit a validated form, then re-fetch.
///
/// `Err` means the server refused and the form should stay open.
pub async fn submit<F: Feature>(
  feature: &mut F,
  api: &ApiClient,
  editing: Option<i64>,
  values: Values,
) -> Result<Notice, Notice> {
  let done = feature.submit(api, editing, values).await.map_err(|e| {
    tracing::warn!(tab = F::TITLE, error = %e, "save failed");
    Notice::error(e.to_string())
  })?;
  Ok(match feature.load(api).await {
    Ok(()) => Notice::info(done),
    Err(e) => Notice::error(e.to_string()),
  })
}

/// Delete, then re-fetch.
pub async fn remove<F: Feature>(feature: &mut F, api: &ApiClient, id: i64) -> Notice {
  if let Err(e) = feature.remove(api, id).await {
    tracing::warn!(tab = F::TITLE, id, error = %e, "delete failed");
    return Notice::error(e.to_string());
  }
  match feature.load(api).await {
    Ok(()) => Notice::info("deleted"),
    Err(e) => Notice::error(e.to_string()),
  }
}

/// Look up a record by raw id in a loaded table.
pub fn find<F: Feature>(feature: &F, id: i64) -> Option<&F::Record> {
  feature.table().items().iter().find(|r| F::key_of(r) == id)
}
