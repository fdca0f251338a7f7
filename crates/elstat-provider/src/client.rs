//! Async HTTP client for the provider's per-game endpoints.

use std::{fmt, future::Future, time::Duration};

use reqwest::{Client, StatusCode, header};
use serde_json::Value;

use crate::{FetchError, Result};

// ─── Endpoint ────────────────────────────────────────────────────────────────

/// A per-game provider endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
  /// Team and player box score totals.
  Boxscore,
  /// One row per scoring action.
  Points,
}

impl Endpoint {
  /// Path segment appended to the provider base URL.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Boxscore => "Boxscore",
      Self::Points => "Points",
    }
  }
}

impl fmt::Display for Endpoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── GameFeed ────────────────────────────────────────────────────────────────

/// Source of per-game JSON documents.
///
/// [`ProviderClient`] is the HTTP implementation; the ingestion pipeline only
/// depends on this trait.
pub trait GameFeed: Send + Sync {
  fn fetch<'a>(
    &'a self,
    endpoint: Endpoint,
    game_code: i64,
    season_code: &'a str,
  ) -> impl Future<Output = Result<Value, FetchError>> + Send + 'a;
}

// ─── Settings ────────────────────────────────────────────────────────────────

/// Connection and retry settings for [`ProviderClient`].
#[derive(Debug, Clone)]
pub struct ProviderSettings {
  pub base_url:     String,
  /// Applies to each attempt separately.
  pub timeout:      Duration,
  /// Total attempts per fetch, including the first.
  pub max_attempts: u32,
  /// Sleep before retry `n` is `backoff * n`.
  pub backoff:      Duration,
  pub user_agent:   String,
}

impl Default for ProviderSettings {
  fn default() -> Self {
    Self {
      base_url:     "https://live.euroleague.net/api".into(),
      timeout:      Duration::from_secs(30),
      max_attempts: 3,
      backoff:      Duration::from_millis(1000),
      user_agent:   concat!("elstat/", env!("CARGO_PKG_VERSION")).into(),
    }
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Result of one HTTP attempt that did not yield a payload.
enum AttemptError {
  /// Answered definitively; do not retry.
  Terminal(FetchError),
  /// Worth another attempt; carries the reason for logging.
  Retry(String),
}

/// HTTP client for the provider.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ProviderClient {
  client:   Client,
  settings: ProviderSettings,
}

impl ProviderClient {
  pub fn new(settings: ProviderSettings) -> Result<Self> {
    let client = Client::builder()
      .timeout(settings.timeout)
      .user_agent(settings.user_agent.clone())
      .build()?;
    Ok(Self { client, settings })
  }

  pub fn settings(&self) -> &ProviderSettings { &self.settings }

  fn url(&self, endpoint: Endpoint) -> String {
    format!(
      "{}/{}",
      self.settings.base_url.trim_end_matches('/'),
      endpoint.as_str()
    )
  }

  /// `GET {base}/{endpoint}?gamecode=<n>&seasoncode=<code>`, once.
  async fn attempt(
    &self,
    url: &str,
    game_code: i64,
    season_code: &str,
  ) -> Result<Value, AttemptError> {
    let resp = self
      .client
      .get(url)
      .header(header::ACCEPT, "application/json")
      .query(&[
        ("gamecode", game_code.to_string()),
        ("seasoncode", season_code.to_owned()),
      ])
      .send()
      .await
      .map_err(|e| AttemptError::Retry(e.to_string()))?;

    match resp.status() {
      StatusCode::NOT_FOUND => return Err(AttemptError::Terminal(FetchError::NotFound)),
      StatusCode::NOT_ACCEPTABLE => {
        return Err(AttemptError::Terminal(FetchError::Inaccessible));
      }
      status if !status.is_success() => {
        return Err(AttemptError::Retry(format!("HTTP {status}")));
      }
      _ => {}
    }

    resp
      .json()
      .await
      .map_err(|e| AttemptError::Retry(format!("invalid JSON body: {e}")))
  }
}

impl GameFeed for ProviderClient {
  async fn fetch(
    &self,
    endpoint: Endpoint,
    game_code: i64,
    season_code: &str,
  ) -> Result<Value, FetchError> {
    let url = self.url(endpoint);
    let max_attempts = self.settings.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
      match self.attempt(&url, game_code, season_code).await {
        Ok(payload) => return Ok(payload),
        Err(AttemptError::Terminal(outcome)) => return Err(outcome),
        Err(AttemptError::Retry(message)) => {
          tracing::warn!(
            %endpoint,
            game_code,
            season_code,
            "attempt {attempt}/{max_attempts} failed: {message}"
          );
          last_error = message;
          if attempt < max_attempts {
            tokio::time::sleep(self.settings.backoff * attempt).await;
          }
        }
      }
    }

    Err(FetchError::Transient { attempts: max_attempts, message: last_error })
  }
}
