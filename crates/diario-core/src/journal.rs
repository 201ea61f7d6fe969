//! [`DayRecordStore`] — the authoritative in-memory journal and its
//! persisted mirror.
//!
//! Reads never touch the backend. Every mutation updates memory first and
//! then writes the affected map through the [`KeyValueStore`]; a failed
//! write leaves memory ahead of the backend and is reported as
//! [`Error::Storage`].

use std::{
  collections::{BTreeMap, BTreeSet},
  fmt::Write as _,
};

use chrono::{Local, NaiveTime};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
  Error, Result,
  day::DayKey,
  entry::{DayMetadata, MetadataMap, Mood, NoteMap, StatusChange, StatusCheck},
  store::KeyValueStore,
};

/// Backend key holding the serialized [`MetadataMap`].
pub const METADATA_KEY: &str = "diary-metadata";

/// Backend key holding the serialized [`NoteMap`].
pub const NOTES_KEY: &str = "diary-notes";

/// Clock format used for status-check times unless overridden.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// Appended to a backend key to name where a payload with undecodable
/// entries is copied before those entries are dropped.
pub const DISCARDED_SUFFIX: &str = ".discarded";

// ─── Store ───────────────────────────────────────────────────────────────────

/// Owns the metadata and notes maps for one journal.
///
/// A day that appears in neither map is an empty day; records are created
/// lazily by the first mutation that targets them.
pub struct DayRecordStore<S> {
  backend:     S,
  metadata:    MetadataMap,
  notes:       NoteMap,
  time_format: String,
}

impl<S: KeyValueStore> DayRecordStore<S> {
  /// An empty journal over `backend`. Nothing is read until
  /// [`load_persisted`](Self::load_persisted).
  pub fn new(backend: S) -> Self {
    Self {
      backend,
      metadata: MetadataMap::new(),
      notes: NoteMap::new(),
      time_format: DEFAULT_TIME_FORMAT.to_owned(),
    }
  }

  /// Construct and load whatever `backend` already holds.
  pub async fn open(backend: S) -> Self {
    let mut store = Self::new(backend);
    store.load_persisted().await;
    store
  }

  /// Use `format` (strftime syntax) for status-check times.
  ///
  /// Only time-of-day specifiers are accepted; date fields such as `%Y`
  /// cannot be rendered from a clock time.
  pub fn with_time_format(mut self, format: impl Into<String>) -> Result<Self> {
    let format = format.into();
    format_time(NaiveTime::default(), &format)?;
    self.time_format = format;
    Ok(self)
  }

  pub fn backend(&self) -> &S { &self.backend }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The metadata for `day`, or the empty record if none exists.
  pub fn get(&self, day: DayKey) -> DayMetadata {
    self.metadata.get(&day).cloned().unwrap_or_default()
  }

  /// The free text for `day`; empty if none was written.
  pub fn note(&self, day: DayKey) -> &str {
    self.notes.get(&day).map(String::as_str).unwrap_or_default()
  }

  pub fn metadata(&self) -> &MetadataMap { &self.metadata }

  pub fn notes(&self) -> &NoteMap { &self.notes }

  /// Every day present in either map, in chronological order.
  pub fn days(&self) -> BTreeSet<DayKey> {
    self.metadata.keys().chain(self.notes.keys()).copied().collect()
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Set (or clear, with `None`) the mood for `day`.
  pub async fn set_mood(&mut self, day: DayKey, mood: Option<Mood>) -> Result<()> {
    self.metadata.entry(day).or_default().mood = mood;
    self.persist_metadata().await
  }

  /// Append a check-in stamped with the current local time.
  ///
  /// Returns `Ok(false)` without changing anything when `status` is `None`.
  pub async fn append_status_check(
    &mut self,
    day: DayKey,
    status: Option<StatusChange>,
    note: &str,
  ) -> Result<bool> {
    let now = Local::now().time();
    self.append_status_check_at(day, status, note, now).await
  }

  /// Append a check-in stamped with `time`.
  ///
  /// A blank `note` is stored as no note. Returns `Ok(false)` without
  /// changing anything when `status` is `None`.
  pub async fn append_status_check_at(
    &mut self,
    day: DayKey,
    status: Option<StatusChange>,
    note: &str,
    time: NaiveTime,
  ) -> Result<bool> {
    let Some(status) = status else {
      debug!(%day, "ignoring status check without a direction");
      return Ok(false);
    };

    let check = StatusCheck {
      time: format_time(time, &self.time_format)?,
      status,
      note: (!note.trim().is_empty()).then(|| note.to_owned()),
    };
    self.metadata.entry(day).or_default().status_checks.push(check);
    self.persist_metadata().await?;
    Ok(true)
  }

  /// Replace the free text for `day`.
  pub async fn set_note(&mut self, day: DayKey, text: impl Into<String>) -> Result<()> {
    self.notes.insert(day, text.into());
    self.persist_notes().await
  }

  /// Replace both maps wholesale. Used by snapshot import.
  ///
  /// Both maps are swapped together in memory and written to the backend in
  /// a single [`KeyValueStore::set_items`] call.
  pub async fn replace_all(&mut self, metadata: MetadataMap, notes: NoteMap) -> Result<()> {
    let entries = vec![
      (METADATA_KEY.to_owned(), serde_json::to_string(&metadata)?),
      (NOTES_KEY.to_owned(), serde_json::to_string(&notes)?),
    ];
    self.metadata = metadata;
    self.notes = notes;

    debug!(days = self.metadata.len(), notes = self.notes.len(), "replacing journal");
    self.backend.set_items(entries).await.map_err(|e| {
      warn!(error = %e, "failed to persist imported journal");
      Error::Storage(Box::new(e))
    })
  }

  /// Forget every day and delete both persisted maps.
  pub async fn clear(&mut self) -> Result<()> {
    self.metadata.clear();
    self.notes.clear();
    debug!("clearing journal");
    for key in [METADATA_KEY, NOTES_KEY] {
      self.backend.remove_item(key).await.map_err(|e| {
        warn!(key, error = %e, "failed to clear persisted journal");
        Error::Storage(Box::new(e))
      })?;
    }
    Ok(())
  }

  // ── Persistence ───────────────────────────────────────────────────────────

  /// Reload both maps from the backend.
  ///
  /// Each map is loaded on its own: a missing, unreadable or malformed
  /// payload leaves that map empty and does not affect the other one.
  /// Within a well-formed payload, entries that do not decode are skipped;
  /// the original payload is first copied to `<key>.discarded` so the next
  /// write cannot lose them for good.
  pub async fn load_persisted(&mut self) {
    self.metadata = load_map(&self.backend, METADATA_KEY).await;
    self.notes = load_map(&self.backend, NOTES_KEY).await;
    debug!(days = self.metadata.len(), notes = self.notes.len(), "journal loaded");
  }

  /// Write both maps to the backend.
  pub async fn persist(&self) -> Result<()> {
    self.persist_metadata().await?;
    self.persist_notes().await
  }

  async fn persist_metadata(&self) -> Result<()> {
    self.write(METADATA_KEY, &self.metadata).await
  }

  async fn persist_notes(&self) -> Result<()> {
    self.write(NOTES_KEY, &self.notes).await
  }

  async fn write<T: Serialize + Sync>(&self, key: &str, map: &T) -> Result<()> {
    let payload = serde_json::to_string(map)?;
    debug!(key, bytes = payload.len(), "persisting");
    self.backend.set_item(key, payload).await.map_err(|e| {
      warn!(key, error = %e, "failed to persist journal");
      Error::Storage(Box::new(e))
    })
  }
}

/// Render `time` with `format`, failing instead of panicking on specifiers
/// a clock time cannot fill.
fn format_time(time: NaiveTime, format: &str) -> Result<String> {
  let mut out = String::new();
  write!(out, "{}", time.format(format))
    .map_err(|_| Error::InvalidTimeFormat(format.to_owned()))?;
  Ok(out)
}

async fn load_map<S, V>(backend: &S, key: &str) -> BTreeMap<DayKey, V>
where
  S: KeyValueStore,
  V: DeserializeOwned,
{
  let raw = match backend.get_item(key).await {
    Ok(Some(raw)) => raw,
    Ok(None) => return BTreeMap::new(),
    Err(e) => {
      warn!(key, error = %e, "failed to read persisted data");
      return BTreeMap::new();
    }
  };

  let entries: BTreeMap<String, Value> = match serde_json::from_str(&raw) {
    Ok(entries) => entries,
    Err(e) => {
      warn!(key, error = %e, "discarding malformed persisted data");
      return BTreeMap::new();
    }
  };

  let mut map = BTreeMap::new();
  let mut skipped = 0usize;
  for (day, value) in entries {
    match decode_entry::<V>(&day, value) {
      Ok((day, value)) => {
        map.insert(day, value);
      }
      Err(e) => {
        warn!(key, day = %day, error = %e, "skipping undecodable persisted entry");
        skipped += 1;
      }
    }
  }

  if skipped > 0 {
    let backup = format!("{key}{DISCARDED_SUFFIX}");
    if let Err(e) = backend.set_item(&backup, raw).await {
      warn!(key = %backup, error = %e, "failed to keep a copy of skipped entries");
    }
  }
  map
}

fn decode_entry<V: DeserializeOwned>(day: &str, value: Value) -> Result<(DayKey, V)> {
  Ok((day.parse()?, serde_json::from_value(value)?))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
