//! Fingerprints tab: capacity gauge above the slot table.

use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Style},
  widgets::{Block, Borders, Gauge},
};

use crate::features::{Feature, fingerprints::FingerprintsTab};

pub fn draw(f: &mut Frame, area: Rect, tab: &FingerprintsTab) {
  let [gauge_area, table_area] =
    Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

  let usage = tab.usage;
  let percent = usage.percent();
  let color = match percent {
    p if p >= 90.0 => Color::Red,
    p if p >= 70.0 => Color::Yellow,
    _ => Color::Green,
  };
  let gauge = Gauge::default()
    .block(
      Block::default()
        .title(" Sensor capacity ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray)),
    )
    .gauge_style(Style::default().fg(color))
    .ratio(percent / 100.0)
    .label(format!(
      "{}/{} used · {} available · {percent:.1}%",
      usage.used,
      usage.capacity,
      usage.available()
    ));
  f.render_widget(gauge, gauge_area);

  super::table::draw(
    f,
    table_area,
    FingerprintsTab::TITLE,
    FingerprintsTab::EMPTY,
    FingerprintsTab::COLUMNS,
    tab.table(),
    FingerprintsTab::cells,
  );
}
