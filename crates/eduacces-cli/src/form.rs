//! Modal create/edit forms and their client-side validation.

use std::{collections::HashMap, str::FromStr};

use crossterm::event::{KeyCode, KeyEvent};

use crate::picker::{Choice, rank};

// ─── Fields ───────────────────────────────────────────────────────────────────

pub enum FieldKind {
  Text,
  /// Rendered masked; not trimmed.
  Secret,
  /// A whole number greater than zero.
  Number,
  /// One of a fixed set. The input line fuzzy-filters the choices.
  Select(Vec<Choice>),
}

pub struct Field {
  pub key:    &'static str,
  pub label:  &'static str,
  pub kind:   FieldKind,
  pub input:  String,
  /// Index into the choices of a `Select`.
  pub choice: Option<usize>,
}

impl Field {
  pub fn choices(&self) -> &[Choice] {
    match &self.kind {
      FieldKind::Select(choices) => choices,
      _ => &[],
    }
  }

  pub fn chosen(&self) -> Option<&Choice> { self.choice.and_then(|i| self.choices().get(i)) }

  /// What the form shows on this field's line.
  pub fn display(&self) -> String {
    match &self.kind {
      FieldKind::Secret => "*".repeat(self.input.chars().count()),
      FieldKind::Select(_) => match (self.chosen(), self.input.is_empty()) {
        (Some(c), true) => c.label.clone(),
        (Some(c), false) => format!("{}  → {}", self.input, c.label),
        (None, _) => self.input.clone(),
      },
      _ => self.input.clone(),
    }
  }

  fn type_char(&mut self, c: char) {
    self.input.push(c);
    self.refilter();
  }

  fn backspace(&mut self) {
    self.input.pop();
    self.refilter();
  }

  fn refilter(&mut self) {
    if let FieldKind::Select(choices) = &self.kind {
      self.choice = rank(&self.input, choices).first().copied();
    }
  }

  /// Step through the choices that match the current filter.
  fn cycle(&mut self, forward: bool) {
    let FieldKind::Select(choices) = &self.kind else { return };
    let ranked = rank(&self.input, choices);
    if ranked.is_empty() {
      return;
    }
    let pos = self.choice.and_then(|c| ranked.iter().position(|i| *i == c));
    let next = match (pos, forward) {
      (None, _) => 0,
      (Some(p), true) => (p + 1) % ranked.len(),
      (Some(p), false) => (p + ranked.len() - 1) % ranked.len(),
    };
    self.choice = Some(ranked[next]);
  }
}

// ─── Form ─────────────────────────────────────────────────────────────────────

pub struct Form {
  pub title:   String,
  pub fields:  Vec<Field>,
  pub focus:   usize,
  /// Raw id of the record being edited; `None` when creating.
  pub editing: Option<i64>,
}

pub enum FormEvent {
  Pending,
  Submit,
  Cancel,
}

impl Form {
  pub fn create(title: impl Into<String>) -> Self {
    Self { title: title.into(), fields: Vec::new(), focus: 0, editing: None }
  }

  pub fn edit(title: impl Into<String>, id: i64) -> Self {
    Self { editing: Some(id), ..Self::create(title) }
  }

  pub fn text(self, key: &'static str, label: &'static str, value: &str) -> Self {
    self.field(key, label, FieldKind::Text, value)
  }

  pub fn secret(self, key: &'static str, label: &'static str) -> Self {
    self.field(key, label, FieldKind::Secret, "")
  }

  pub fn number(self, key: &'static str, label: &'static str, value: Option<u32>) -> Self {
    let value = value.map(|n| n.to_string()).unwrap_or_default();
    self.field(key, label, FieldKind::Number, &value)
  }

  /// A select field, pre-selecting the choice whose id is `current`.
  pub fn select(
    mut self,
    key: &'static str,
    label: &'static str,
    choices: Vec<Choice>,
    current: Option<&str>,
  ) -> Self {
    let choice = current.and_then(|id| choices.iter().position(|c| c.id == id));
    self.fields.push(Field {
      key,
      label,
      kind: FieldKind::Select(choices),
      input: String::new(),
      choice,
    });
    self
  }

  fn field(mut self, key: &'static str, label: &'static str, kind: FieldKind, value: &str) -> Self {
    self.fields.push(Field { key, label, kind, input: value.to_owned(), choice: None });
    self
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
    let count = self.fields.len();
    match key.code {
      KeyCode::Esc => return FormEvent::Cancel,
      KeyCode::Enter => return FormEvent::Submit,
      KeyCode::Tab | KeyCode::Down if count > 0 => self.focus = (self.focus + 1) % count,
      KeyCode::BackTab | KeyCode::Up if count > 0 => self.focus = (self.focus + count - 1) % count,
      code => {
        let Some(field) = self.fields.get_mut(self.focus) else {
          return FormEvent::Pending;
        };
        match code {
          KeyCode::Right => field.cycle(true),
          KeyCode::Left => field.cycle(false),
          KeyCode::Backspace => field.backspace(),
          KeyCode::Char(c) => field.type_char(c),
          _ => {}
        }
      }
    }
    FormEvent::Pending
  }

  /// Check every field; the first failure is returned as the message to
  /// show.
  pub fn validate(&self) -> Result<Values, String> {
    let mut values = HashMap::new();
    for field in &self.fields {
      let value = match &field.kind {
        FieldKind::Text => {
          let v = field.input.trim();
          if v.is_empty() {
            return Err(format!("{} is required", field.label));
          }
          v.to_owned()
        }
        FieldKind::Secret => {
          if field.input.is_empty() {
            return Err(format!("{} is required", field.label));
          }
          field.input.clone()
        }
        FieldKind::Number => {
          let v = field.input.trim();
          if v.is_empty() {
            return Err(format!("{} is required", field.label));
          }
          let n: u32 = v.parse().map_err(|_| format!("{} must be a number", field.label))?;
          if n == 0 {
            return Err(format!("{} must be greater than 0", field.label));
          }
          n.to_string()
        }
        FieldKind::Select(_) => match field.chosen() {
          Some(c) => c.id.clone(),
          None => return Err(format!("select a {}", field.label.to_lowercase())),
        },
      };
      values.insert(field.key, value);
    }
    Ok(Values(values))
  }
}

/// Validated form output, keyed by field key.
#[derive(Debug, Default)]
pub struct Values(HashMap<&'static str, String>);

impl Values {
  pub fn text(&self, key: &str) -> String { self.0.get(key).cloned().unwrap_or_default() }

  pub fn parse<T: FromStr>(&self, key: &str) -> Result<T, String> {
    let raw = self.0.get(key).ok_or_else(|| format!("missing field {key}"))?;
    raw.parse().map_err(|_| format!("invalid value for {key}: {raw}"))
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::KeyModifiers;

  use super::*;

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn type_str(form: &mut Form, s: &str) {
    for c in s.chars() {
      form.handle_key(key(KeyCode::Char(c)));
    }
  }

  fn ficha_form() -> Form {
    Form::create("New ficha").number("numero_ficha", "Number", None).select(
      "id_carrera",
      "Career",
      vec![Choice::new(1, "ADSO"), Choice::new(2, "Contabilidad")],
      None,
    )
  }

  #[test]
  fn required_fields_must_be_filled() {
    let form = Form::create("x").text("nombre", "Name", "  ");
    assert_eq!(form.validate().unwrap_err(), "Name is required");
  }

  #[test]
  fn number_must_be_positive() {
    let mut form = ficha_form();
    type_str(&mut form, "0");
    assert_eq!(form.validate().unwrap_err(), "Number must be greater than 0");

    form.fields[0].input = "12a".into();
    assert_eq!(form.validate().unwrap_err(), "Number must be a number");
  }

  #[test]
  fn select_needs_a_choice() {
    let mut form = ficha_form();
    type_str(&mut form, "2758443");
    assert_eq!(form.validate().unwrap_err(), "select a career");
  }

  #[test]
  fn typing_in_select_picks_best_match() {
    let mut form = ficha_form();
    type_str(&mut form, "2758443");
    form.handle_key(key(KeyCode::Tab));
    type_str(&mut form, "conta");

    let values = form.validate().unwrap();
    assert_eq!(values.parse::<u32>("numero_ficha").unwrap(), 2_758_443);
    assert_eq!(values.text("id_carrera"), "2");
  }

  #[test]
  fn arrows_cycle_choices() {
    let mut form = ficha_form();
    form.focus = 1;
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.fields[1].chosen().unwrap().label, "ADSO");
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.fields[1].chosen().unwrap().label, "Contabilidad");
    form.handle_key(key(KeyCode::Right));
    assert_eq!(form.fields[1].chosen().unwrap().label, "ADSO");
    form.handle_key(key(KeyCode::Left));
    assert_eq!(form.fields[1].chosen().unwrap().label, "Contabilidad");
  }

  #[test]
  fn edit_forms_preselect_current_value() {
    let form = Form::edit("Edit", 5).select(
      "rol",
      "Role",
      vec![Choice::new("estudiante", "estudiante"), Choice::new("docente", "docente")],
      Some("docente"),
    );
    assert_eq!(form.editing, Some(5));
    assert_eq!(form.validate().unwrap().text("rol"), "docente");
  }

  #[test]
  fn secrets_are_masked() {
    let mut form = Form::create("x").secret("password", "Password");
    type_str(&mut form, "s3cr3t");
    assert_eq!(form.fields[0].display(), "******");
    assert_eq!(form.validate().unwrap().text("password"), "s3cr3t");
  }
}
