//! [`MemoryStore`] — a process-local [`KeyValueStore`].
//!
//! Nothing survives the process. Useful for tests and for running a journal
//! without touching disk.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{Mutex, MutexGuard, PoisonError},
};

use crate::store::KeyValueStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
  items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Seed a store with raw entries, bypassing any serialization.
  pub fn with_items<I, K, V>(items: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let items = items
      .into_iter()
      .map(|(k, v)| (k.into(), v.into()))
      .collect();
    Self { items: Mutex::new(items) }
  }

  /// Raw value under `key`, without going through the async trait.
  pub fn raw(&self, key: &str) -> Option<String> {
    self.lock().get(key).cloned()
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
    // Every critical section is a single map operation, so a poisoned map
    // is still consistent.
    self.items.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl KeyValueStore for MemoryStore {
  type Error = Infallible;

  async fn get_item(&self, key: &str) -> Result<Option<String>, Infallible> {
    Ok(self.raw(key))
  }

  async fn set_item(&self, key: &str, value: String) -> Result<(), Infallible> {
    self.lock().insert(key.to_owned(), value);
    Ok(())
  }

  async fn set_items(
    &self,
    entries: Vec<(String, String)>,
  ) -> Result<(), Infallible> {
    self.lock().extend(entries);
    Ok(())
  }

  async fn remove_item(&self, key: &str) -> Result<(), Infallible> {
    self.lock().remove(key);
    Ok(())
  }
}
