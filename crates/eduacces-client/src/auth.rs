//! Login and logout against the session store.

use eduacces_core::account::Session;
use reqwest::Method;
use serde::Serialize;

use crate::{ApiClient, error::Result};

#[derive(Serialize)]
struct Credentials<'a> {
  correo:   &'a str,
  password: &'a str,
}

impl ApiClient {
  /// `POST /auth/login`. On success the session is saved to the client's
  /// [`SessionStore`](crate::SessionStore), if it has one.
  pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
    let what = "POST /auth/login";
    let req = self
      .request(Method::POST, "/auth/login")
      .json(&Credentials { correo: email, password });
    let resp = self.send_or(what, req, Some("invalid email or password")).await?;
    let session: Session = Self::decode(what, resp).await?;
    if let Some(store) = self.session() {
      store.save(session.clone())?;
    }
    tracing::info!(email = %session.user.email, role = %session.user.role, "logged in");
    Ok(session)
  }

  /// `POST /auth/logout`, then forget the session.
  ///
  /// The server call is skipped without a token, and its failure is only
  /// logged. The local session is cleared either way.
  pub async fn logout(&self) -> Result<()> {
    if self.token().is_some() {
      let what = "POST /auth/logout";
      if let Err(e) = self.send(what, self.request(Method::POST, "/auth/logout")).await {
        tracing::warn!(error = %e, "logout request failed; clearing session anyway");
      }
    }
    if let Some(store) = self.session() {
      store.clear()?;
    }
    tracing::info!("logged out");
    Ok(())
  }
}
