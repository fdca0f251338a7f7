//! Error types for `elstat-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown game status: {0:?}")]
  UnknownGameStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
