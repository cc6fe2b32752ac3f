//! Application state machine and event dispatcher.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use eduacces_client::ApiClient;
use eduacces_core::{EnrollStatus, PersonId, account::SessionUser, attendance::AttendanceState};
use strum::{Display, EnumIter, FromRepr, IntoEnumIterator};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
  features::{
    self, Feature, Reaction,
    assignments::{StudentAssignmentsTab, TeacherAssignmentsTab},
    attendance::AttendanceTab,
    careers::CareersTab,
    fichas::FichasTab,
    fingerprints::FingerprintsTab,
    overview::Overview,
    persons::PersonsTab,
    subjects::SubjectsTab,
    users::UsersTab,
  },
  form::{Form, FormEvent},
  notice::Notice,
  picker::{Picked, Picker},
  sensor::{SensorMode, SensorModal},
};

// ─── Tabs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, FromRepr)]
#[repr(usize)]
pub enum Tab {
  #[default]
  Overview,
  Persons,
  Users,
  Careers,
  Fichas,
  Subjects,
  Teachers,
  Students,
  Attendance,
  Fingerprints,
}

impl Tab {
  pub fn next(self) -> Self { Self::from_repr(self as usize + 1).unwrap_or(Self::Overview) }

  pub fn prev(self) -> Self {
    match self as usize {
      0 => Self::Fingerprints,
      n => Self::from_repr(n - 1).unwrap_or(Self::Overview),
    }
  }

  /// `1`..`9` then `0` for the tenth tab.
  pub fn from_digit(c: char) -> Option<Self> {
    let n = c.to_digit(10)? as usize;
    Self::iter().nth(if n == 0 { 9 } else { n - 1 })
  }
}

/// Run `$body` with `$f` bound to the CRUD tab behind `$tab`. Evaluates to
/// `None` for tabs that are not CRUD tables.
macro_rules! on_crud_tab {
  ($app:ident, $tab:expr, $f:ident => $body:expr) => {
    match $tab {
      Tab::Persons => {
        let $f = &mut $app.persons;
        Some($body)
      }
      Tab::Users => {
        let $f = &mut $app.users;
        Some($body)
      }
      Tab::Careers => {
        let $f = &mut $app.careers;
        Some($body)
      }
      Tab::Fichas => {
        let $f = &mut $app.fichas;
        Some($body)
      }
      Tab::Subjects => {
        let $f = &mut $app.subjects;
        Some($body)
      }
      Tab::Teachers => {
        let $f = &mut $app.teachers;
        Some($body)
      }
      Tab::Students => {
        let $f = &mut $app.students;
        Some($body)
      }
      Tab::Fingerprints => {
        let $f = &mut $app.fingerprints;
        Some($body)
      }
      Tab::Overview | Tab::Attendance => None,
    }
  };
}

// ─── Modals ───────────────────────────────────────────────────────────────────

/// Delete confirmation for the current tab.
pub struct Confirm {
  pub prompt: String,
  pub id:     i64,
}

pub enum Modal {
  Form(Form),
  Confirm(Confirm),
  Picker(Picker),
  Sensor(SensorModal),
}

/// Completions reported by background sensor tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
  Enrolled(PersonId),
  Verified(AttendanceState),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub tab:    Tab,
  pub api:    ApiClient,
  /// Who is logged in, for the header.
  pub user:   Option<SessionUser>,
  pub notice: Option<Notice>,
  pub modal:  Option<Modal>,

  pub overview:     Overview,
  pub persons:      PersonsTab,
  pub users:        UsersTab,
  pub careers:      CareersTab,
  pub fichas:       FichasTab,
  pub subjects:     SubjectsTab,
  pub teachers:     TeacherAssignmentsTab,
  pub students:     StudentAssignmentsTab,
  pub attendance:   AttendanceTab,
  pub fingerprints: FingerprintsTab,

  events: UnboundedSender<AppEvent>,
}

impl App {
  /// Build the app and the receiving end of its sensor event channel.
  pub fn new(
    api: ApiClient,
    user: Option<SessionUser>,
    page_size: usize,
  ) -> (Self, UnboundedReceiver<AppEvent>) {
    let (events, rx) = mpsc::unbounded_channel();
    let app = Self {
      tab: Tab::default(),
      api,
      user,
      notice: None,
      modal: None,
      overview: Overview::default(),
      persons: PersonsTab::new(page_size),
      users: UsersTab::new(page_size),
      careers: CareersTab::new(page_size),
      fichas: FichasTab::new(page_size),
      subjects: SubjectsTab::new(page_size),
      teachers: TeacherAssignmentsTab::new(page_size),
      students: StudentAssignmentsTab::new(page_size),
      attendance: AttendanceTab::new(page_size),
      fingerprints: FingerprintsTab::new(page_size),
      events,
    };
    (app, rx)
  }

  /// Drop the notice once it has been up long enough.
  pub fn tick(&mut self, now: Instant) {
    if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
      self.notice = None;
    }
  }

  fn react(&mut self, reaction: Reaction) {
    match reaction {
      Reaction::Ignored | Reaction::Done => {}
      Reaction::Open(modal) => self.modal = Some(modal),
      Reaction::Notice(notice) => self.notice = Some(notice),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Load the current tab on its first activation.
  pub async fn activate(&mut self) {
    let reaction = match self.tab {
      Tab::Overview => {
        if !self.overview.is_loaded() {
          self.overview.load(&self.api).await;
        }
        Reaction::Done
      }
      Tab::Attendance if !self.attendance.table.is_loaded() => {
        self.attendance.reload(&self.api).await
      }
      Tab::Attendance => Reaction::Done,
      tab => on_crud_tab!(self, tab, f => features::ensure_loaded(f, &self.api).await)
        .unwrap_or(Reaction::Done),
    };
    self.react(reaction);
  }

  async fn switch_to(&mut self, tab: Tab) {
    if tab != self.tab {
      self.tab = tab;
      self.activate().await;
    }
  }

  /// Apply a completion from a background sensor task.
  pub async fn on_event(&mut self, event: AppEvent) {
    tracing::info!(?event, "sensor operation completed");
    match event {
      AppEvent::Enrolled(person) => {
        let name = self
          .persons
          .table()
          .items()
          .iter()
          .find(|p| p.id == person)
          .map(|p| p.full_name())
          .unwrap_or_else(|| format!("person {person}"));
        self.notice = Some(Notice::info(format!("fingerprint enrolled for {name}")));
        if self.fingerprints.table().is_loaded() {
          let reaction = features::reload(&mut self.fingerprints, &self.api).await;
          self.react(reaction);
        }
      }
      AppEvent::Verified(direction) => {
        let reaction = self.attendance.reload(&self.api).await;
        self.notice = Some(Notice::info(match direction {
          AttendanceState::Entrada => "check-in recorded",
          AttendanceState::Salida => "check-out recorded",
        }));
        self.react(reaction);
      }
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.modal.is_some() {
      self.handle_modal_key(key).await;
      return Ok(true);
    }

    let reaction = self.handle_tab_key(key).await;
    if !matches!(reaction, Reaction::Ignored) {
      self.react(reaction);
      return Ok(true);
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Esc => self.notice = None,
      KeyCode::Tab => self.switch_to(self.tab.next()).await,
      KeyCode::BackTab => self.switch_to(self.tab.prev()).await,
      KeyCode::Char(c) => {
        if let Some(tab) = Tab::from_digit(c) {
          self.switch_to(tab).await;
        }
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_tab_key(&mut self, key: KeyEvent) -> Reaction {
    match self.tab {
      Tab::Overview => match key.code {
        KeyCode::Char('r') => {
          self.overview.load(&self.api).await;
          Reaction::Done
        }
        _ => Reaction::Ignored,
      },
      Tab::Attendance => self.attendance.handle_key(&self.api, key).await,
      Tab::Persons if key.code == KeyCode::Char('f') && !self.persons.table().searching => {
        self.enroll_selected()
      }
      tab => on_crud_tab!(self, tab, f => features::handle_key(f, &self.api, key).await)
        .unwrap_or(Reaction::Ignored),
    }
  }

  fn enroll_selected(&self) -> Reaction {
    match self.persons.table().selected() {
      Some(p) => Reaction::Open(Modal::Sensor(SensorModal::new(
        self.api.clone(),
        SensorMode::Enroll,
        p.id,
        p.full_name(),
      ))),
      None => Reaction::Notice(Notice::error("select a person first")),
    }
  }

  async fn handle_modal_key(&mut self, key: KeyEvent) {
    let Some(modal) = self.modal.as_mut() else { return };
    match modal {
      Modal::Form(form) => match form.handle_key(key) {
        FormEvent::Pending => {}
        FormEvent::Cancel => self.modal = None,
        FormEvent::Submit => self.submit_form().await,
      },
      Modal::Confirm(confirm) => match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
          let id = confirm.id;
          self.modal = None;
          let tab = self.tab;
          let notice = on_crud_tab!(self, tab, f => features::remove(f, &self.api, id).await);
          if let Some(notice) = notice {
            self.notice = Some(notice);
          }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.modal = None,
        _ => {}
      },
      Modal::Picker(picker) => match picker.handle_key(key) {
        Picked::Pending => {}
        Picked::Cancelled => self.modal = None,
        Picked::Chosen(choice) => {
          self.attendance.select(&choice);
          self.modal = None;
        }
      },
      Modal::Sensor(sensor) => match key.code {
        KeyCode::Enter => match sensor.flow.status() {
          EnrollStatus::Idle => sensor.start(self.events.clone()),
          EnrollStatus::Error => {
            sensor.flow.reset();
            sensor.start(self.events.clone());
          }
          EnrollStatus::Success => self.modal = None,
          EnrollStatus::Working => {}
        },
        KeyCode::Esc => self.modal = None,
        _ => {}
      },
    }
  }

  async fn submit_form(&mut self) {
    let Some(Modal::Form(form)) = &self.modal else { return };
    let values = match form.validate() {
      Ok(values) => values,
      Err(message) => {
        self.notice = Some(Notice::error(message));
        return;
      }
    };
    let editing = form.editing;
    let tab = self.tab;
    let result =
      on_crud_tab!(self, tab, f => features::submit(f, &self.api, editing, values).await);
    match result {
      Some(Ok(notice)) => {
        self.modal = None;
        self.notice = Some(notice);
      }
      Some(Err(notice)) => self.notice = Some(notice),
      None => self.modal = None,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{sync::Arc, time::Duration};

  use eduacces_client::{ApiConfig, StaticToken};

  use super::*;

  fn app() -> App {
    let api = ApiClient::new(ApiConfig::default(), Arc::new(StaticToken::none())).unwrap();
    App::new(api, None, 10).0
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  #[test]
  fn tabs_cycle_both_ways() {
    assert_eq!(Tab::Overview.next(), Tab::Persons);
    assert_eq!(Tab::Fingerprints.next(), Tab::Overview);
    assert_eq!(Tab::Overview.prev(), Tab::Fingerprints);
    assert_eq!(Tab::from_digit('3'), Some(Tab::Users));
    assert_eq!(Tab::from_digit('0'), Some(Tab::Fingerprints));
    assert_eq!(Tab::Teachers.to_string(), "Teachers");
  }

  #[test]
  fn expired_notice_is_cleared_on_tick() {
    let mut app = app();
    let raised = Instant::now();
    app.notice = Some(Notice::at(crate::notice::Level::Info, "saved", raised));
    app.tick(raised + Duration::from_secs(4));
    assert!(app.notice.is_some());
    app.tick(raised + Duration::from_secs(5));
    assert!(app.notice.is_none());
  }

  #[tokio::test]
  async fn esc_dismisses_notice_early() {
    let mut app = app();
    app.notice = Some(Notice::error("boom"));
    assert!(app.handle_key(key(KeyCode::Esc)).await.unwrap());
    assert!(app.notice.is_none());
  }

  #[tokio::test]
  async fn invalid_form_keeps_modal_and_sends_nothing() {
    let mut app = app();
    app.tab = Tab::Careers;
    app.careers.table_mut().set_items(Vec::new());

    app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
    assert!(matches!(app.modal, Some(Modal::Form(_))));

    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert!(matches!(app.modal, Some(Modal::Form(_))));
    assert_eq!(app.notice.as_ref().map(|n| n.text.as_str()), Some("Name is required"));
  }

  #[tokio::test]
  async fn enroll_needs_a_selected_person() {
    let mut app = app();
    app.tab = Tab::Persons;
    app.persons.table_mut().set_items(Vec::new());
    app.handle_key(key(KeyCode::Char('f'))).await.unwrap();
    assert!(app.modal.is_none());
    assert_eq!(app.notice.as_ref().map(|n| n.text.as_str()), Some("select a person first"));
  }

  #[tokio::test]
  async fn q_quits_but_not_while_searching() {
    let mut app = app();
    app.tab = Tab::Careers;
    app.careers.table_mut().set_items(Vec::new());
    app.handle_key(key(KeyCode::Char('/'))).await.unwrap();
    assert!(app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
    assert_eq!(app.careers.table().query, "q");

    app.handle_key(key(KeyCode::Esc)).await.unwrap();
    assert!(!app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
  }
}
