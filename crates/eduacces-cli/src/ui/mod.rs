//! TUI rendering: header, active tab, notice line, status bar and modals.

pub mod attendance;
pub mod fingerprints;
pub mod modal;
pub mod overview;
pub mod table;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Paragraph, Tabs},
};
use strum::IntoEnumIterator;

use crate::{
  app::{App, Modal, Tab},
  features::Feature,
  notice::Level,
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // notice
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_notice(f, rows[2], app);
  draw_status(f, rows[3], app);

  if let Some(modal) = &app.modal {
    modal::draw(f, area, modal);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let who = match &app.user {
    Some(user) => format!("{} ({}) ", user.email, user.role),
    None => "not logged in ".to_string(),
  };
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Min(0), Constraint::Length(who.chars().count() as u16)])
    .split(area);

  let titles = Tab::iter().enumerate().map(|(i, tab)| format!("{} {tab}", (i + 1) % 10));
  let tabs = Tabs::new(titles)
    .select(app.tab as usize)
    .style(Style::default().fg(Color::Gray).bg(Color::DarkGray))
    .highlight_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    .divider("|");
  f.render_widget(tabs, cols[0]);

  f.render_widget(
    Paragraph::new(who).style(Style::default().fg(Color::Gray).bg(Color::DarkGray)),
    cols[1],
  );
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  match app.tab {
    Tab::Overview => overview::draw(f, area, &app.overview),
    Tab::Persons => draw_feature(f, area, &app.persons),
    Tab::Users => draw_feature(f, area, &app.users),
    Tab::Careers => draw_feature(f, area, &app.careers),
    Tab::Fichas => draw_feature(f, area, &app.fichas),
    Tab::Subjects => draw_feature(f, area, &app.subjects),
    Tab::Teachers => draw_feature(f, area, &app.teachers),
    Tab::Students => draw_feature(f, area, &app.students),
    Tab::Attendance => attendance::draw(f, area, &app.attendance),
    Tab::Fingerprints => fingerprints::draw(f, area, &app.fingerprints),
  }
}

fn draw_feature<F: Feature>(f: &mut Frame, area: Rect, feature: &F) {
  table::draw(f, area, F::TITLE, F::EMPTY, F::COLUMNS, feature.table(), F::cells);
}

// ─── Notice + status ──────────────────────────────────────────────────────────

fn draw_notice(f: &mut Frame, area: Rect, app: &App) {
  let Some(notice) = &app.notice else { return };
  let style = match notice.level {
    Level::Info => Style::default().fg(Color::Green),
    Level::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
  };
  let line = Line::from(vec![
    Span::styled(format!(" {}", notice.text), style),
    Span::styled("  (Esc to dismiss)", Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(Paragraph::new(line), area);
}

fn searching(app: &App) -> bool {
  match app.tab {
    Tab::Overview => false,
    Tab::Persons => app.persons.table().searching,
    Tab::Users => app.users.table().searching,
    Tab::Careers => app.careers.table().searching,
    Tab::Fichas => app.fichas.table().searching,
    Tab::Subjects => app.subjects.table().searching,
    Tab::Teachers => app.teachers.table().searching,
    Tab::Students => app.students.table().searching,
    Tab::Attendance => app.attendance.table.searching,
    Tab::Fingerprints => app.fingerprints.table().searching,
  }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode, hints) = match (&app.modal, app.tab) {
    (Some(Modal::Form(_)), _) => ("FORM", "Tab next field  ←→ choose  Enter save  Esc cancel"),
    (Some(Modal::Confirm(_)), _) => ("CONFIRM", "y delete  n cancel"),
    (Some(Modal::Picker(_)), _) => ("PICK", "Type to filter  ↑↓ move  Enter choose  Esc cancel"),
    (Some(Modal::Sensor(_)), _) => ("SENSOR", "Enter start/retry/close  Esc close"),
    (None, _) if searching(app) => ("SEARCH", "Type to filter  Enter keep  Esc clear"),
    (None, Tab::Overview) => ("NORMAL", "r reload  Tab/1-0 switch tab  q quit"),
    (None, Tab::Persons) => {
      ("NORMAL", "n new  e edit  d delete  f enroll fingerprint  / search  r reload  q quit")
    }
    (None, Tab::Attendance) => {
      ("NORMAL", "p pick person  i check-in  o check-out  / search  r reload  q quit")
    }
    (None, Tab::Teachers | Tab::Students) => {
      ("NORMAL", "n new  d delete  / search  r reload  q quit")
    }
    (None, Tab::Fingerprints) => {
      ("NORMAL", "d delete  / search  PgUp/PgDn page  r reload  q quit")
    }
    (None, _) => {
      ("NORMAL", "n new  e edit  d delete  / search  PgUp/PgDn page  r reload  q quit")
    }
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode} "),
      Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {hints}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(Paragraph::new(line).style(Style::default().bg(Color::Black)), area);
}

#[cfg(test)]
pub(crate) mod tests {
  use std::sync::Arc;

  use eduacces_client::{ApiClient, ApiConfig, StaticToken};
  use ratatui::{Terminal, backend::TestBackend};

  use super::*;
  use crate::{app::Confirm, notice::Notice};

  pub(crate) fn app() -> App {
    let api = ApiClient::new(ApiConfig::default(), Arc::new(StaticToken::none())).unwrap();
    App::new(api, None, 10).0
  }

  /// Render `app` and return the screen as one string.
  pub(crate) fn render(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();
    terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
  }

  #[test]
  fn empty_collection_shows_its_prompt() {
    let mut app = app();
    app.tab = Tab::Careers;
    app.careers.table_mut().set_items(Vec::new());
    let screen = render(&app);
    assert!(screen.contains("No careers yet"), "{screen}");
    assert!(screen.contains("not logged in"));
  }

  #[test]
  fn error_notice_is_rendered() {
    let mut app = app();
    app.notice = Some(Notice::error("could not record check-in"));
    assert!(render(&app).contains("could not record check-in"));
  }

  #[test]
  fn confirm_modal_overlays_the_tab() {
    let mut app = app();
    app.tab = Tab::Subjects;
    app.subjects.table_mut().set_items(Vec::new());
    app.modal = Some(Modal::Confirm(Confirm { prompt: "Delete Math?".into(), id: 3 }));
    let screen = render(&app);
    assert!(screen.contains("Delete Math?"));
    assert!(screen.contains("CONFIRM"));
  }
}
