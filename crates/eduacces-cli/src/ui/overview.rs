//! Overview tab: one metrics card per route, laid out two by two.

use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::features::overview::{Card, Overview};

pub fn draw(f: &mut Frame, area: Rect, overview: &Overview) {
  let [top, bottom] = Layout::vertical([Constraint::Fill(1); 2]).areas(area);
  let [a, b] = Layout::horizontal([Constraint::Fill(1); 2]).areas(top);
  let [c, d] = Layout::horizontal([Constraint::Fill(1); 2]).areas(bottom);
  for (card, area) in overview.cards.iter().zip([a, b, c, d]) {
    draw_card(f, area, card);
  }
}

fn draw_card(f: &mut Frame, area: Rect, card: &Card) {
  let failed = matches!(card.state, Some(Err(_)));
  let block = Block::default()
    .title(format!(" {} ", card.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if failed { Color::Red } else { Color::DarkGray }));

  let lines = match &card.state {
    None => vec![Line::from(Span::styled("loading…", Style::default().fg(Color::DarkGray)))],
    Some(Err(message)) => vec![Line::from(Span::styled(
      message.clone(),
      Style::default().fg(Color::Red),
    ))],
    Some(Ok(metrics)) => {
      let entries = metrics.entries();
      if entries.is_empty() {
        vec![Line::from(Span::styled("no metrics", Style::default().fg(Color::DarkGray)))]
      } else {
        entries
          .into_iter()
          .map(|(key, value)| {
            Line::from(vec![
              Span::styled(format!("{key}: "), Style::default().fg(Color::Gray)),
              Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
            ])
          })
          .collect()
      }
    }
  };
  f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}
