//! Error types for `diario-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid day key: {0:?}")]
  InvalidDayKey(String),

  #[error("invalid time format: {0:?}")]
  InvalidTimeFormat(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// The backend rejected a write. The in-memory journal already holds the
  /// change; only the persisted copy is stale.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
