//! Error types for `elstat-provider`.

use thiserror::Error;

/// Why a fetch produced no payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  /// HTTP 404: the gamecode/season slot does not exist.
  #[error("game not found (404)")]
  NotFound,

  /// HTTP 406: the endpoint refuses this slot.
  #[error("endpoint not accessible (406)")]
  Inaccessible,

  /// Network error, timeout, unparseable body or any other non-2xx status,
  /// still failing after every attempt.
  #[error("transient failure after {attempts} attempt(s): {message}")]
  Transient { attempts: u32, message: String },
}

impl FetchError {
  /// `true` for outcomes that were answered definitively and never retried.
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::NotFound | Self::Inaccessible)
  }
}

/// Errors constructing a [`crate::ProviderClient`].
#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
