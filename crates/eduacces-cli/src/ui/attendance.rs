//! Attendance tab: the selected person above the history table.

use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use crate::features::attendance::{self, AttendanceRow, AttendanceTab};

pub fn draw(f: &mut Frame, area: Rect, tab: &AttendanceTab) {
  let [who_area, table_area] =
    Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

  let who = match &tab.selected {
    Some((id, name)) => Line::from(vec![
      Span::styled(" Selected: ", Style::default().fg(Color::Gray)),
      Span::styled(name.clone(), Style::default().add_modifier(Modifier::BOLD)),
      Span::styled(
        format!(" (id {id})  i check-in · o check-out"),
        Style::default().fg(Color::DarkGray),
      ),
    ]),
    None => Line::from(Span::styled(
      " No person selected. Press p to pick one.",
      Style::default().fg(Color::Yellow),
    )),
  };
  f.render_widget(Paragraph::new(who), who_area);

  super::table::draw(
    f,
    table_area,
    "Attendance",
    attendance::EMPTY,
    attendance::COLUMNS,
    &tab.table,
    AttendanceRow::cells,
  );
}
