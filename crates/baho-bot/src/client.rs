//! HTTP client for the admin server's vote API.

use std::time::Duration;

use baho_core::{staff::StaffId, vote::VoteKind};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("vote API returned {0}")]
  Status(StatusCode),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Deserialize)]
struct Ack {
  ok: bool,
}

/// Forwards votes to `GET {api_base}/vote/<id>/<kind>`.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct VoteClient {
  client:   Client,
  api_base: String,
}

impl VoteClient {
  pub fn new(api_base: &str, timeout: Duration) -> Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, api_base: api_base.trim_end_matches('/').to_string() })
  }

  fn url(&self, staff_id: StaffId, kind: VoteKind) -> String {
    format!("{}/vote/{staff_id}/{kind}", self.api_base)
  }

  /// Send one vote. `Ok(false)` means the server refused it. No retries.
  pub async fn vote(&self, staff_id: StaffId, kind: VoteKind) -> Result<bool> {
    let resp = self.client.get(self.url(staff_id, kind)).send().await?;
    if !resp.status().is_success() {
      return Err(Error::Status(resp.status()));
    }
    let ack: Ack = resp.json().await?;
    Ok(ack.ok)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
  };

  use super::*;

  async fn client_for(server: &MockServer) -> VoteClient {
    VoteClient::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
  }

  #[tokio::test]
  async fn accepted_vote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/vote/5/like"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
      .expect(1)
      .mount(&server)
      .await;

    assert!(client_for(&server).await.vote(5, VoteKind::Like).await.unwrap());
  }

  #[tokio::test]
  async fn refused_vote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/vote/5/dislike"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": false })))
      .mount(&server)
      .await;

    assert!(!client_for(&server).await.vote(5, VoteKind::Dislike).await.unwrap());
  }

  #[tokio::test]
  async fn server_error_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let err = client_for(&server).await.vote(1, VoteKind::Neutral).await.unwrap_err();
    assert!(matches!(err, Error::Status(StatusCode::INTERNAL_SERVER_ERROR)), "{err}");
  }

  #[tokio::test]
  async fn unreachable_server_is_an_http_error() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    drop(server);

    let err = client.vote(1, VoteKind::Like).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)), "{err}");
  }
}
