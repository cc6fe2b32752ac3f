//! Landing tab: the metrics routes, one card each.

use eduacces_client::{ApiClient, Metrics};

pub struct Card {
  pub title: &'static str,
  /// `None` until first loaded. A failure stays on its own card.
  pub state: Option<Result<Metrics, String>>,
}

pub struct Overview {
  pub cards: [Card; 4],
}

impl Default for Overview {
  fn default() -> Self {
    let card = |title| Card { title, state: None };
    Self {
      cards: [
        card("Careers"),
        card("Fichas"),
        card("Teacher assignments"),
        card("Student assignments"),
      ],
    }
  }
}

impl Overview {
  pub fn is_loaded(&self) -> bool { self.cards.iter().all(|c| c.state.is_some()) }

  /// Refresh every card. Each card records its own outcome.
  pub async fn load(&mut self, api: &ApiClient) {
    let results = [
      api.careers().metrics().await,
      api.fichas().metrics().await,
      api.teacher_assignments().metrics().await,
      api.student_assignments().metrics().await,
    ];
    for (card, result) in self.cards.iter_mut().zip(results) {
      if let Err(e) = &result {
        tracing::warn!(card = card.title, error = %e, "metrics unavailable");
      }
      card.state = Some(result.map_err(|e| e.to_string()));
    }
  }
}
