//! The `KeyValueStore` trait: the string-keyed, string-valued storage a
//! journal is persisted into.
//!
//! Backends (e.g. `diario-store-sqlite`, [`crate::memory::MemoryStore`])
//! implement this; [`crate::journal::DayRecordStore`] depends only on the
//! abstraction.

use std::future::Future;

/// Abstraction over a local key-value store.
///
/// A missing key and an empty mapping mean the same thing to callers, so
/// backends report absence as `Ok(None)` rather than an error.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait KeyValueStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`, if any.
  fn get_item<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  /// Store `value` under `key`, replacing any previous value.
  fn set_item<'a>(
    &'a self,
    key: &'a str,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Store several entries as one unit: either every entry is written or
  /// none is.
  fn set_items(
    &self,
    entries: Vec<(String, String)>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete `key`. Deleting a missing key is not an error.
  fn remove_item<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
