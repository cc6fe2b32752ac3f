//! Fuzzy selection over a list of labelled choices.

use crossterm::event::{KeyCode, KeyEvent};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};

/// One selectable option. `id` is the raw value sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
  pub id:    String,
  pub label: String,
}

impl Choice {
  pub fn new(id: impl ToString, label: impl Into<String>) -> Self {
    Self { id: id.to_string(), label: label.into() }
  }
}

/// Indices of `choices` matching `query`, best match first. An empty query
/// keeps every choice in its original order.
pub fn rank(query: &str, choices: &[Choice]) -> Vec<usize> {
  let query = query.trim();
  if query.is_empty() {
    return (0..choices.len()).collect();
  }
  let matcher = SkimMatcherV2::default().ignore_case();
  let mut scored: Vec<(i64, usize)> = choices
    .iter()
    .enumerate()
    .filter_map(|(i, c)| matcher.fuzzy_match(&c.label, query).map(|score| (score, i)))
    .collect();
  scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
  scored.into_iter().map(|(_, i)| i).collect()
}

pub enum Picked {
  Pending,
  Chosen(Choice),
  Cancelled,
}

/// Modal list with a filter line, used to pick the person for attendance.
pub struct Picker {
  pub title:   String,
  pub choices: Vec<Choice>,
  pub query:   String,
  pub cursor:  usize,
}

impl Picker {
  pub fn new(title: impl Into<String>, choices: Vec<Choice>) -> Self {
    Self { title: title.into(), choices, query: String::new(), cursor: 0 }
  }

  pub fn matches(&self) -> Vec<&Choice> {
    rank(&self.query, &self.choices).into_iter().map(|i| &self.choices[i]).collect()
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> Picked {
    match key.code {
      KeyCode::Esc => return Picked::Cancelled,
      KeyCode::Enter => {
        return match self.matches().get(self.cursor) {
          Some(choice) => Picked::Chosen((*choice).clone()),
          None => Picked::Pending,
        };
      }
      KeyCode::Down => {
        if self.cursor + 1 < self.matches().len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
      KeyCode::Backspace => {
        self.query.pop();
        self.cursor = 0;
      }
      KeyCode::Char(c) => {
        self.query.push(c);
        self.cursor = 0;
      }
      _ => {}
    }
    Picked::Pending
  }
}
