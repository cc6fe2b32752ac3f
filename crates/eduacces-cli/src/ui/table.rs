//! Paged, searchable table shared by every list tab.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
};

use crate::table::TableView;

/// Render `view` into `area`, or its empty-state prompt when there is
/// nothing to show.
pub fn draw<R: crate::table::Searchable>(
  f: &mut Frame,
  area: Rect,
  title: &str,
  empty: &str,
  columns: &[(&str, u16)],
  view: &TableView<R>,
  cells: impl Fn(&R) -> Vec<String>,
) {
  let filtered = view.filtered().len();
  let total = view.items().len();
  let title = if view.searching || !view.query.is_empty() {
    format!(" {title} ({filtered}/{total}) ")
  } else {
    format!(" {title} ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if !view.is_loaded() {
    hint(f, inner, "Not loaded. Press r to retry.");
    return;
  }
  if total == 0 {
    hint(f, inner, empty);
    return;
  }

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
    .split(inner);

  draw_search(f, rows[0], view);

  if filtered == 0 {
    hint(f, rows[1], "Nothing matches the search.");
  } else {
    let header = Row::new(columns.iter().map(|(name, _)| *name))
      .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let body = view.page_rows().into_iter().enumerate().map(|(i, record)| {
      let row = Row::new(cells(record));
      if i == view.cursor() {
        row.style(Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD))
      } else {
        row
      }
    });
    let widths = columns.iter().map(|(_, w)| Constraint::Fill(*w));
    f.render_widget(Table::new(body, widths).header(header).column_spacing(2), rows[1]);
  }

  let footer = format!(
    "page {}/{} · {filtered} rows · PgUp/PgDn",
    view.page() + 1,
    view.page_count()
  );
  f.render_widget(
    Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
    rows[2],
  );
}

fn draw_search(f: &mut Frame, area: Rect, view: &TableView<impl Sized>) {
  let line = if view.searching {
    Line::from(vec![
      Span::styled("/", Style::default().fg(Color::Yellow)),
      Span::raw(view.query.clone()),
      Span::styled("█", Style::default().fg(Color::Yellow)),
    ])
  } else if !view.query.is_empty() {
    Line::from(Span::styled(
      format!("filter: {}", view.query),
      Style::default().fg(Color::Yellow),
    ))
  } else {
    Line::from(Span::styled("/ to search", Style::default().fg(Color::DarkGray)))
  };
  f.render_widget(Paragraph::new(line), area);
}

pub(super) fn hint(f: &mut Frame, area: Rect, text: &str) {
  f.render_widget(
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray)).wrap(Wrap { trim: true }),
    area,
  );
}
