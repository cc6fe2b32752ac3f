//! Modal overlays drawn on top of the active tab.

use eduacces_core::EnrollStatus;
use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::{
  app::{Confirm, Modal},
  form::{FieldKind, Form},
  picker::Picker,
  sensor::{SensorMode, SensorModal},
};

pub fn draw(f: &mut Frame, area: Rect, modal: &Modal) {
  match modal {
    Modal::Form(form) => draw_form(f, area, form),
    Modal::Confirm(confirm) => draw_confirm(f, area, confirm),
    Modal::Picker(picker) => draw_picker(f, area, picker),
    Modal::Sensor(sensor) => draw_sensor(f, area, sensor),
  }
}

/// A `width` x `height` rect centred in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
    .flex(Flex::Center)
    .areas(row);
  cell
}

/// Clear `area`, draw a titled border and return the inside.
fn frame(f: &mut Frame, area: Rect, title: &str, color: Color) -> Rect {
  let block = Block::default()
    .title(format!(" {} ", title.trim()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(color));
  let inner = block.inner(area);
  f.render_widget(Clear, area);
  f.render_widget(block, area);
  inner
}

// ─── Form ─────────────────────────────────────────────────────────────────────

fn draw_form(f: &mut Frame, area: Rect, form: &Form) {
  let height = form.fields.len() as u16 * 2 + 4;
  let inner = frame(f, centered(area, 64, height), &form.title, Color::Cyan);

  let mut lines = Vec::new();
  for (i, field) in form.fields.iter().enumerate() {
    let focused = i == form.focus;
    let label_style = if focused {
      Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    let mut value = field.display();
    match field.kind {
      FieldKind::Select(_) if value.is_empty() => value = "(type or ←→ to choose)".into(),
      FieldKind::Select(_) => {}
      _ if focused => value.push('█'),
      _ => {}
    }
    lines.push(Line::from(vec![
      Span::styled(format!("{:>14} ", field.label), label_style),
      Span::raw(value),
    ]));
    lines.push(Line::from(""));
  }
  lines.push(Line::from(Span::styled(
    "Enter save · Esc cancel",
    Style::default().fg(Color::DarkGray),
  )));
  f.render_widget(Paragraph::new(lines), inner);
}

// ─── Confirm ──────────────────────────────────────────────────────────────────

fn draw_confirm(f: &mut Frame, area: Rect, confirm: &Confirm) {
  let inner = frame(f, centered(area, 56, 6), "Confirm", Color::Red);
  let lines = vec![
    Line::from(confirm.prompt.clone()),
    Line::from(""),
    Line::from(vec![
      Span::styled("[y]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
      Span::raw(" delete   "),
      Span::styled("[n]", Style::default().add_modifier(Modifier::BOLD)),
      Span::raw(" cancel"),
    ]),
  ];
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

// ─── Picker ───────────────────────────────────────────────────────────────────

fn draw_picker(f: &mut Frame, area: Rect, picker: &Picker) {
  let inner = frame(f, centered(area, 60, 16), &picker.title, Color::Cyan);
  let [query_area, list_area] =
    Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);

  f.render_widget(
    Paragraph::new(Line::from(vec![
      Span::styled("> ", Style::default().fg(Color::Yellow)),
      Span::raw(picker.query.clone()),
      Span::styled("█", Style::default().fg(Color::Yellow)),
    ])),
    query_area,
  );

  let matches = picker.matches();
  if matches.is_empty() {
    super::table::hint(f, list_area, "No matches.");
    return;
  }
  // Keep the cursor on screen.
  let visible = list_area.height as usize;
  let skip = picker.cursor.saturating_sub(visible.saturating_sub(1));
  let items: Vec<ListItem> = matches
    .iter()
    .enumerate()
    .skip(skip)
    .take(visible)
    .map(|(i, choice)| {
      let style = if i == picker.cursor {
        Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      ListItem::new(Span::styled(choice.label.clone(), style))
    })
    .collect();
  f.render_widget(List::new(items), list_area);
}

// ─── Sensor ───────────────────────────────────────────────────────────────────

fn draw_sensor(f: &mut Frame, area: Rect, sensor: &SensorModal) {
  let inner = frame(f, centered(area, 60, 9), sensor.title(), Color::Magenta);
  let snapshot = sensor.flow.snapshot();

  let (status, color, hint) = match snapshot.status {
    EnrollStatus::Idle => ("Ready", Color::Gray, "Enter to start · Esc to close"),
    EnrollStatus::Working => match sensor.mode {
      SensorMode::Enroll => ("Place the finger on the sensor…", Color::Yellow, "Esc to close"),
      SensorMode::Verify(_) => ("Verifying fingerprint…", Color::Yellow, "Esc to close"),
    },
    EnrollStatus::Success => ("Done", Color::Green, "Enter or Esc to close"),
    EnrollStatus::Error => ("Failed", Color::Red, "Enter to retry · Esc to close"),
  };

  let mut lines = vec![
    Line::from(vec![
      Span::styled("Person: ", Style::default().fg(Color::Gray)),
      Span::styled(sensor.person_name.clone(), Style::default().add_modifier(Modifier::BOLD)),
      Span::styled(format!("  (id {})", sensor.person), Style::default().fg(Color::DarkGray)),
    ]),
    Line::from(""),
    Line::from(Span::styled(status, Style::default().fg(color).add_modifier(Modifier::BOLD))),
  ];
  if !snapshot.message.is_empty() {
    lines.push(Line::from(Span::styled(snapshot.message, Style::default().fg(color))));
  }
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

#[cfg(test)]
mod tests {
  use eduacces_core::PersonId;

  use super::super::tests::{app, render};
  use super::*;
  use crate::picker::Choice;

  #[test]
  fn idle_sensor_modal_invites_start() {
    let mut app = app();
    app.modal = Some(Modal::Sensor(SensorModal::new(
      app.api.clone(),
      SensorMode::Enroll,
      PersonId(12),
      "Ana Ruiz".into(),
    )));
    let screen = render(&app);
    assert!(screen.contains("Enroll fingerprint"));
    assert!(screen.contains("Ana Ruiz"));
    assert!(screen.contains("Enter to start"));
  }

  #[test]
  fn picker_lists_matches() {
    let mut app = app();
    let choices = vec![Choice::new(1, "Ana Ruiz · 11"), Choice::new(2, "Luis Mora · 22")];
    app.modal = Some(Modal::Picker(Picker::new("Select person", choices)));
    let screen = render(&app);
    assert!(screen.contains("Select person"));
    assert!(screen.contains("Luis Mora · 22"));
  }
}
