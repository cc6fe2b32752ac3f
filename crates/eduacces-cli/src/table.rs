//! In-memory table state: the loaded collection plus search, paging and
//! cursor. Everything here is computed from the loaded rows; nothing is sent
//! to the server.

use crossterm::event::{KeyCode, KeyEvent};

/// Text a row is searched by.
pub trait Searchable {
  fn search_text(&self) -> String;
}

pub struct TableView<R> {
  items:         Vec<R>,
  loaded:        bool,
  pub query:     String,
  pub searching: bool,
  page:          usize,
  /// Row index within the current page.
  cursor:        usize,
  page_size:     usize,
}

impl<R: Searchable> TableView<R> {
  pub fn new(page_size: usize) -> Self {
    Self {
      items: Vec::new(),
      loaded: false,
      query: String::new(),
      searching: false,
      page: 0,
      cursor: 0,
      page_size: page_size.max(1),
    }
  }

  /// Replace the collection with a fresh fetch.
  pub fn set_items(&mut self, items: Vec<R>) {
    self.items = items;
    self.loaded = true;
    self.clamp();
  }

  pub fn items(&self) -> &[R] { &self.items }

  pub fn is_loaded(&self) -> bool { self.loaded }

  pub fn page_size(&self) -> usize { self.page_size }

  /// Rows matching the search query (case-insensitive substring).
  pub fn filtered(&self) -> Vec<&R> {
    let needle = self.query.trim().to_lowercase();
    if needle.is_empty() {
      return self.items.iter().collect();
    }
    self
      .items
      .iter()
      .filter(|r| r.search_text().to_lowercase().contains(&needle))
      .collect()
  }

  pub fn page_count(&self) -> usize { self.filtered().len().div_ceil(self.page_size).max(1) }

  /// Zero-based current page.
  pub fn page(&self) -> usize { self.page }

  pub fn page_rows(&self) -> Vec<&R> {
    self
      .filtered()
      .into_iter()
      .skip(self.page * self.page_size)
      .take(self.page_size)
      .collect()
  }

  pub fn cursor(&self) -> usize { self.cursor }

  pub fn selected(&self) -> Option<&R> { self.page_rows().get(self.cursor).copied() }

  pub fn next_page(&mut self) {
    if self.page + 1 < self.page_count() {
      self.page += 1;
      self.cursor = 0;
    }
  }

  pub fn prev_page(&mut self) {
    if self.page > 0 {
      self.page -= 1;
      self.cursor = 0;
    }
  }

  pub fn down(&mut self) {
    let rows = self.page_rows().len();
    if self.cursor + 1 < rows {
      self.cursor += 1;
    } else if self.page + 1 < self.page_count() {
      self.next_page();
    }
  }

  pub fn up(&mut self) {
    if self.cursor > 0 {
      self.cursor -= 1;
    } else if self.page > 0 {
      self.prev_page();
      self.cursor = self.page_rows().len().saturating_sub(1);
    }
  }

  /// Navigation and search keys. Returns `false` for keys it does not use.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if self.searching {
      match key.code {
        KeyCode::Esc => {
          self.searching = false;
          self.query.clear();
        }
        KeyCode::Enter => self.searching = false,
        KeyCode::Backspace => {
          self.query.pop();
        }
        KeyCode::Char(c) => self.query.push(c),
        KeyCode::Up => self.up(),
        KeyCode::Down => self.down(),
        _ => return false,
      }
      self.reset_position_if_query_changed(key.code);
      return true;
    }

    match key.code {
      KeyCode::Char('/') => {
        self.searching = true;
        self.query.clear();
        self.reset_position();
      }
      KeyCode::Down | KeyCode::Char('j') => self.down(),
      KeyCode::Up | KeyCode::Char('k') => self.up(),
      KeyCode::PageDown => self.next_page(),
      KeyCode::PageUp => self.prev_page(),
      _ => return false,
    }
    true
  }

  fn reset_position_if_query_changed(&mut self, code: KeyCode) {
    if matches!(code, KeyCode::Char(_) | KeyCode::Backspace | KeyCode::Esc) {
      self.reset_position();
    }
  }

  fn reset_position(&mut self) {
    self.page = 0;
    self.cursor = 0;
  }

  fn clamp(&mut self) {
    let pages = self.page_count();
    if self.page >= pages {
      self.page = pages - 1;
    }
    let rows = self.page_rows().len();
    if self.cursor >= rows {
      self.cursor = rows.saturating_sub(1);
    }
  }
}
