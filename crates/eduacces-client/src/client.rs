//! Request plumbing shared by every endpoint.

use std::sync::Arc;

use reqwest::{
  Client, Method, RequestBuilder, Response,
  header::{CONTENT_TYPE, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
  endpoint::Ack,
  error::{Error, Result, server_message},
  session::SessionStore,
  token::TokenSource,
};

/// Where the Eduacces backend listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Connection settings for the Eduacces API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

impl Default for ApiConfig {
  fn default() -> Self { Self { base_url: DEFAULT_BASE_URL.to_string() } }
}

/// Async HTTP client for the Eduacces JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:  Client,
  config:  ApiConfig,
  tokens:  Arc<dyn TokenSource>,
  session: Option<Arc<SessionStore>>,
}

impl ApiClient {
  /// Build a client that reads its bearer token from `tokens`.
  ///
  /// `login`/`logout` only work with [`ApiClient::with_session`]; a bare
  /// token source has nowhere to store a new session.
  pub fn new(config: ApiConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
    let client = Client::builder().build().map_err(|source| Error::Transport {
      context: "building HTTP client".into(),
      source,
    })?;
    Ok(Self { client, config, tokens, session: None })
  }

  /// Build a client whose token comes from, and whose login/logout write
  /// to, `session`.
  pub fn with_session(config: ApiConfig, session: Arc<SessionStore>) -> Result<Self> {
    let mut client = Self::new(config, session.clone())?;
    client.session = Some(session);
    Ok(client)
  }

  pub fn config(&self) -> &ApiConfig { &self.config }

  pub fn session(&self) -> Option<&Arc<SessionStore>> { self.session.as_ref() }

  pub(crate) fn token(&self) -> Option<String> { self.tokens.token() }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Start a request with the JSON content type and, when a token is
  /// available, the bearer header.
  pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
    let req = self
      .client
      .request(method, self.url(path))
      .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    match self.tokens.token() {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  /// Send `req`, turning transport failures and non-2xx statuses into
  /// [`Error`]s. `what` names the call in logs and default messages.
  pub(crate) async fn send(&self, what: &str, req: RequestBuilder) -> Result<Response> {
    self.send_or(what, req, None).await
  }

  /// Like [`send`](Self::send) but with a custom message for error bodies
  /// that carry none.
  pub(crate) async fn send_or(
    &self,
    what: &str,
    req: RequestBuilder,
    fallback: Option<&str>,
  ) -> Result<Response> {
    tracing::debug!(request = what, "sending");
    let resp = req.send().await.map_err(|source| {
      tracing::warn!(request = what, error = %source, "transport failure");
      Error::Transport { context: what.to_owned(), source }
    })?;

    let status = resp.status();
    if status.is_success() {
      tracing::debug!(request = what, %status, "ok");
      return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = server_message(&body).unwrap_or_else(|| match fallback {
      Some(text) => text.to_owned(),
      None => format!("{what} failed with {status}"),
    });
    tracing::warn!(request = what, %status, %message, "request rejected");
    Err(Error::Status { status, message })
  }

  /// Decode a successful response body into `T`.
  pub(crate) async fn decode<T: DeserializeOwned>(what: &str, resp: Response) -> Result<T> {
    let bytes = resp
      .bytes()
      .await
      .map_err(|source| Error::Transport { context: what.to_owned(), source })?;
    serde_json::from_slice(&bytes).map_err(|source| {
      tracing::warn!(request = what, error = %source, "response did not match schema");
      Error::Decode { context: what.to_owned(), source }
    })
  }

  /// Read a mutation acknowledgement. An empty body (e.g. `204`) is fine.
  pub(crate) async fn ack(what: &str, resp: Response) -> Result<Ack> {
    let bytes = resp
      .bytes()
      .await
      .map_err(|source| Error::Transport { context: what.to_owned(), source })?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(Ack(Value::Null));
    }
    serde_json::from_slice(&bytes)
      .map(Ack)
      .map_err(|source| Error::Decode { context: what.to_owned(), source })
  }

  /// Fail with [`Error::NotJson`] unless the response declares a JSON body.
  pub(crate) fn require_json(what: &str, resp: &Response) -> Result<()> {
    let is_json = resp
      .headers()
      .get(CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .is_some_and(|ct| ct.contains("application/json"));
    if is_json {
      Ok(())
    } else {
      Err(Error::NotJson { context: what.to_owned() })
    }
  }
}
