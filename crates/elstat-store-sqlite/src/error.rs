//! Error type for `elstat-store-sqlite`.

use elstat_core::store::StoreError;
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] elstat_core::Error),

  /// A UNIQUE or PRIMARY KEY constraint rejected the write.
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      ref failure,
      ref message,
    )) = err
      && matches!(
        failure.extended_code,
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
      )
    {
      return Error::ConstraintViolation(
        message.clone().unwrap_or_else(|| failure.to_string()),
      );
    }
    Error::Database(err)
  }
}

impl StoreError for Error {
  fn is_constraint_violation(&self) -> bool {
    matches!(self, Self::ConstraintViolation(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
