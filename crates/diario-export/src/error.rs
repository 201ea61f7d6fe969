//! Error types for the diario-export codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The input is not JSON at all.
  #[error("could not read snapshot: {0}")]
  Parse(#[source] serde_json::Error),

  /// The input is JSON but not a snapshot: not an object, or `metadata` /
  /// `notes` missing or ill-typed.
  #[error("snapshot does not have the expected format: {0}")]
  Format(String),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
