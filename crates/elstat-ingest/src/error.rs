//! Error type for the ingestion pipeline.

use elstat_core::store::StoreError;
use elstat_provider::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
  /// An explicitly requested season is not registered.
  #[error("season not found: {0}")]
  SeasonNotFound(String),

  /// No season was requested and none are registered.
  #[error("no seasons have been registered")]
  NoSeasons,

  #[error("malformed payload: {0}")]
  MalformedPayload(String),

  #[error("fetch failed: {0}")]
  Fetch(#[from] FetchError),

  /// The store rejected a write because the row already exists.
  #[error("duplicate row: {0}")]
  Duplicate(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IngestError {
  /// Classify a backend error, separating unique-constraint races from real
  /// failures.
  pub fn store<E: StoreError>(err: E) -> Self {
    if err.is_constraint_violation() {
      Self::Duplicate(Box::new(err))
    } else {
      Self::Store(Box::new(err))
    }
  }

  /// `true` when another writer already stored the row this one tried to.
  pub fn is_duplicate(&self) -> bool { matches!(self, Self::Duplicate(_)) }

  /// Errors that abort a whole run rather than a single game or season.
  pub fn is_fatal(&self) -> bool {
    matches!(self, Self::SeasonNotFound(_) | Self::NoSeasons)
  }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
