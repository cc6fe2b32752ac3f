//! Teacher → subject → ficha and student → ficha assignments.
//!
//! The backend sometimes joins the related records in and sometimes only
//! sends ids, so rows are resolved against lookups fetched alongside.

use eduacces_client::ApiClient;
use eduacces_core::{
  AssignmentId, FichaId, PersonId, SubjectId,
  academic::{Ficha, Subject},
  assignment::{NewStudentAssignment, NewTeacherAssignment, StudentAssignment, TeacherAssignment},
  person::{Person, Role},
};

use super::{Feature, users::person_choices};
use crate::{
  form::{Form, Values},
  picker::Choice,
  table::{Searchable, TableView},
};

const UNKNOWN: &str = "unknown";

fn person_name(id: Option<PersonId>, persons: &[Person]) -> Option<String> {
  let id = id?;
  persons.iter().find(|p| p.id == id).map(Person::full_name)
}

fn ficha_number(id: Option<FichaId>, fichas: &[Ficha]) -> Option<String> {
  let id = id?;
  fichas.iter().find(|f| f.id == id).map(|f| f.number.to_string())
}

fn ficha_choices(fichas: &[Ficha]) -> Vec<Choice> {
  fichas
    .iter()
    .map(|f| match &f.career {
      Some(c) => Choice::new(f.id, format!("{} · {}", f.number, c.name)),
      None => Choice::new(f.id, f.number.to_string()),
    })
    .collect()
}

fn with_role(persons: &[Person], role: Role) -> impl Iterator<Item = &Person> {
  persons.iter().filter(move |p| p.role == role)
}

// ─── Teachers ─────────────────────────────────────────────────────────────────

pub struct TeacherRow {
  pub id:      AssignmentId,
  pub teacher: String,
  pub subject: String,
  pub ficha:   String,
}

impl TeacherRow {
  fn resolve(
    a: TeacherAssignment,
    persons: &[Person],
    subjects: &[Subject],
    fichas: &[Ficha],
  ) -> Self {
    let teacher = a
      .person
      .as_ref()
      .map(|p| p.full_name())
      .or_else(|| person_name(a.person_id, persons))
      .unwrap_or_else(|| UNKNOWN.into());
    let subject = a
      .subject
      .as_ref()
      .map(|s| s.name.clone())
      .or_else(|| {
        let id = a.subject_id?;
        subjects.iter().find(|s| s.id == id).map(|s| s.name.clone())
      })
      .unwrap_or_else(|| UNKNOWN.into());
    let ficha = a
      .ficha
      .as_ref()
      .map(|f| f.number.to_string())
      .or_else(|| ficha_number(a.ficha_id, fichas))
      .unwrap_or_else(|| "-".into());
    Self { id: a.id, teacher, subject, ficha }
  }
}

impl Searchable for TeacherRow {
  fn search_text(&self) -> String { format!("{} {} {}", self.teacher, self.subject, self.ficha) }
}

pub struct TeacherAssignmentsTab {
  table:    TableView<TeacherRow>,
  persons:  Vec<Person>,
  subjects: Vec<Subject>,
  fichas:   Vec<Ficha>,
}

impl TeacherAssignmentsTab {
  pub fn new(page_size: usize) -> Self {
    Self {
      table:    TableView::new(page_size),
      persons:  Vec::new(),
      subjects: Vec::new(),
      fichas:   Vec::new(),
    }
  }
}

impl Feature for TeacherAssignmentsTab {
  type Record = TeacherRow;

  const TITLE: &'static str = "Teachers";
  const EMPTY: &'static str = "No teacher has been assigned yet. Press n to assign one.";
  const COLUMNS: &'static [(&'static str, u16)] =
    &[("ID", 1), ("Teacher", 4), ("Subject", 4), ("Ficha", 2)];

  fn table(&self) -> &TableView<TeacherRow> { &self.table }

  fn table_mut(&mut self) -> &mut TableView<TeacherRow> { &mut self.table }

  fn cells(r: &TeacherRow) -> Vec<String> {
    vec![r.id.to_string(), r.teacher.clone(), r.subject.clone(), r.ficha.clone()]
  }

  fn key_of(r: &TeacherRow) -> i64 { r.id.0 }

  fn describe(r: &TeacherRow) -> String {
    format!("assignment of {} to {} ({})", r.teacher, r.subject, r.ficha)
  }

  async fn load(&mut self, api: &ApiClient) -> anyhow::Result<()> {
    let assignments = api.teacher_assignments().list().await?;
    self.persons = api.persons().list().await?;
    self.subjects = api.subjects().list().await?;
    self.fichas = api.fichas().list().await?;
    let rows = assignments
      .into_iter()
      .map(|a| TeacherRow::resolve(a, &self.persons, &self.subjects, &self.fichas))
      .collect();
    self.table.set_items(rows);
    Ok(())
  }

  fn create_form(&self) -> Option<Form> {
    let subjects = self.subjects.iter().map(|s| Choice::new(s.id, &s.name)).collect();
    Some(
      Form::create("Assign teacher")
        .select(
          "id_persona",
          "Teacher",
          person_choices(with_role(&self.persons, Role::Teacher)),
          None,
        )
        .select("id_materia", "Subject", subjects, None)
        .select("id_ficha", "Ficha", ficha_choices(&self.fichas), None),
    )
  }

  async fn submit(
    &self,
    api: &ApiClient,
    _editing: Option<i64>,
    v: Values,
  ) -> anyhow::Result<&'static str> {
    let body = NewTeacherAssignment {
      person_id:  v.parse::<PersonId>("id_persona").map_err(anyhow::Error::msg)?,
      subject_id: v.parse::<SubjectId>("id_materia").map_err(anyhow::Error::msg)?,
      ficha_id:   v.parse::<FichaId>("id_ficha").map_err(anyhow::Error::msg)?,
    };
    api.teacher_assignments().create(&body).await?;
    Ok("teacher assigned")
  }

  async fn remove(&self, api: &ApiClient, id: i64) -> anyhow::Result<()> {
    api.teacher_assignments().delete(AssignmentId(id)).await?;
    Ok(())
  }
}

// ─── Students ─────────────────────────────────────────────────────────────────

pub struct StudentRow {
  pub id:       AssignmentId,
  pub student:  String,
  pub document: String,
  pub ficha:    String,
}

impl StudentRow {
  fn resolve(a: StudentAssignment, persons: &[Person], fichas: &[Ficha]) -> Self {
    let known = a.person_id.and_then(|id| persons.iter().find(|p| p.id == id));
    let student = a
      .person
      .as_ref()
      .map(|p| p.full_name())
      .or_else(|| known.map(Person::full_name))
      .unwrap_or_else(|| UNKNOWN.into());
    let document = a
      .person
      .as_ref()
      .and_then(|p| p.document.clone())
      .or_else(|| known.map(|p| p.document.clone()))
      .unwrap_or_else(|| "-".into());
    let ficha = a
      .ficha
      .as_ref()
      .map(|f| f.number.to_string())
      .or_else(|| ficha_number(a.ficha_id, fichas))
      .unwrap_or_else(|| "-".into());
    Self { id: a.id, student, document, ficha }
  }
}

impl Searchable for StudentRow {
  fn search_text(&self) -> String { format!("{} {} {}", self.student, self.document, self.ficha) }
}

pub struct StudentAssignmentsTab {
  table:   TableView<StudentRow>,
  persons: Vec<Person>,
  fichas:  Vec<Ficha>,
}

impl StudentAssignmentsTab {
  pub fn new(page_size: usize) -> Self {
    Self { table: TableView::new(page_size), persons: Vec::new(), fichas: Vec::new() }
  }
}

impl Feature for StudentAssignmentsTab {
  type Record = StudentRow;

  const TITLE: &'static str = "Students";
  const EMPTY: &'static str = "No student has been enrolled in a ficha yet. Press n to add one.";
  const COLUMNS: &'static [(&'static str, u16)] =
    &[("ID", 1), ("Student", 4), ("Document", 3), ("Ficha", 2)];

  fn table(&self) -> &TableView<StudentRow> { &self.table }

  fn table_mut(&mut self) -> &mut TableView<StudentRow> { &mut self.table }

  fn cells(r: &StudentRow) -> Vec<String> {
    vec![r.id.to_string(), r.student.clone(), r.document.clone(), r.ficha.clone()]
  }

  fn key_of(r: &StudentRow) -> i64 { r.id.0 }

  fn describe(r: &StudentRow) -> String { format!("{} from ficha {}", r.student, r.ficha) }

  async fn load(&mut self, api: &ApiClient) -> anyhow::Result<()> {
    let assignments = api.student_assignments().list().await?;
    self.persons = api.persons().list().await?;
    self.fichas = api.fichas().list().await?;
    let rows = assignments
      .into_iter()
      .map(|a| StudentRow::resolve(a, &self.persons, &self.fichas))
      .collect();
    self.table.set_items(rows);
    Ok(())
  }

  fn create_form(&self) -> Option<Form> {
    Some(
      Form::create("Assign student")
        .select(
          "id_persona",
          "Student",
          person_choices(with_role(&self.persons, Role::Student)),
          None,
        )
        .select("id_ficha", "Ficha", ficha_choices(&self.fichas), None),
    )
  }

  async fn submit(
    &self,
    api: &ApiClient,
    _editing: Option<i64>,
    v: Values,
  ) -> anyhow::Result<&'static str> {
    let body = NewStudentAssignment {
      person_id: v.parse::<PersonId>("id_persona").map_err(anyhow::Error::msg)?,
      ficha_id:  v.parse::<FichaId>("id_ficha").map_err(anyhow::Error::msg)?,
    };
    api.student_assignments().create(&body).await?;
    Ok("student assigned")
  }

  async fn remove(&self, api: &ApiClient, id: i64) -> anyhow::Result<()> {
    api.student_assignments().delete(AssignmentId(id)).await?;
    Ok(())
  }
}
