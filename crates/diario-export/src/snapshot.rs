//! JSON snapshot export and import.
//!
//! A snapshot is `{ "metadata": {..}, "notes": {..}, "exportDate": "..",
//! "version": "1.0" }`, where both maps use exactly the persisted wire form.

use chrono::{DateTime, SecondsFormat, Utc};
use diario_core::{
  DayRecordStore, MetadataMap, NoteMap, store::KeyValueStore,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Format version written into every export.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub(crate) fn iso_timestamp(at: DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ─── Export ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
  metadata:    &'a MetadataMap,
  notes:       &'a NoteMap,
  export_date: String,
  version:     &'static str,
}

pub(crate) fn export_json(
  metadata: &MetadataMap,
  notes: &NoteMap,
  exported_at: DateTime<Utc>,
) -> Result<String> {
  let snapshot = SnapshotRef {
    metadata,
    notes,
    export_date: iso_timestamp(exported_at),
    version: SNAPSHOT_VERSION,
  };
  Ok(serde_json::to_string_pretty(&snapshot)?)
}

// ─── Import ──────────────────────────────────────────────────────────────────

/// A validated snapshot that has not been applied yet.
///
/// Applying it overwrites the whole journal, so callers are expected to ask
/// for confirmation first: [`commit`](Self::commit) to proceed, or drop the
/// value to decline. Nothing is mutated until `commit`.
#[derive(Debug, Clone)]
pub struct PendingImport {
  metadata:    MetadataMap,
  notes:       NoteMap,
  export_date: Option<String>,
  version:     Option<String>,
}

impl PendingImport {
  pub fn metadata(&self) -> &MetadataMap { &self.metadata }

  pub fn notes(&self) -> &NoteMap { &self.notes }

  /// The `exportDate` recorded in the file, if any.
  pub fn export_date(&self) -> Option<&str> { self.export_date.as_deref() }

  /// The `version` recorded in the file, if any.
  pub fn version(&self) -> Option<&str> { self.version.as_deref() }

  /// Number of distinct days the snapshot covers.
  pub fn day_count(&self) -> usize {
    let mut days: Vec<_> =
      self.metadata.keys().chain(self.notes.keys()).collect();
    days.sort();
    days.dedup();
    days.len()
  }

  /// Replace the journal's contents with this snapshot.
  pub async fn commit<S: KeyValueStore>(
    self,
    journal: &mut DayRecordStore<S>,
  ) -> diario_core::Result<()> {
    journal.replace_all(self.metadata, self.notes).await
  }
}

pub(crate) fn prepare_import(input: &str) -> Result<PendingImport> {
  let value: Value = serde_json::from_str(input).map_err(Error::Parse)?;
  let Value::Object(mut object) = value else {
    return Err(Error::Format("expected a JSON object".into()));
  };

  let metadata: MetadataMap = take_field(&mut object, "metadata")?;
  let notes: NoteMap = take_field(&mut object, "notes")?;
  let export_date = take_string(&mut object, "exportDate");
  let version = take_string(&mut object, "version");

  match version.as_deref() {
    Some(SNAPSHOT_VERSION) => {}
    Some(other) => warn!(version = other, "importing snapshot with unknown version"),
    None => warn!("importing snapshot without a version"),
  }
  debug!(days = metadata.len(), notes = notes.len(), "snapshot validated");

  Ok(PendingImport { metadata, notes, export_date, version })
}

/// Remove and decode a required field. `null` counts as missing.
fn take_field<T: DeserializeOwned>(
  object: &mut Map<String, Value>,
  name: &str,
) -> Result<T> {
  match object.remove(name) {
    None | Some(Value::Null) => Err(Error::Format(format!("missing `{name}`"))),
    Some(value) => serde_json::from_value(value)
      .map_err(|e| Error::Format(format!("invalid `{name}`: {e}"))),
  }
}

fn take_string(object: &mut Map<String, Value>, name: &str) -> Option<String> {
  match object.remove(name) {
    Some(Value::String(s)) => Some(s),
    _ => None,
  }
}
