//! Export and import codec for Diario journals.
//!
//! Two external representations:
//!
//! - a JSON **snapshot**, lossless and re-importable;
//! - a plain-text rendering for humans, write-only.
//!
//! Pure and synchronous apart from [`PendingImport::commit`]; no storage
//! dependencies beyond the [`diario_core`] traits.
//!
//! # Quick start
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use diario_core::{DayRecordStore, memory::MemoryStore};
//!
//! let mut journal = DayRecordStore::open(MemoryStore::new()).await;
//! let json = diario_export::export_json(&journal, chrono::Utc::now())?;
//!
//! let pending = diario_export::prepare_import(&json)?;
//! // ...ask the user before overwriting...
//! pending.commit(&mut journal).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
mod snapshot;
mod text;

use chrono::{DateTime, Utc};
use diario_core::{DayKey, DayRecordStore, store::KeyValueStore};

pub use error::{Error, Result};
pub use snapshot::{PendingImport, SNAPSHOT_VERSION};

/// MIME type of a JSON snapshot.
pub const JSON_MIME: &str = "application/json";

/// MIME type of a plain-text export.
pub const TEXT_MIME: &str = "text/plain";

// ─── Public API
// ───────────────────────────────────────────────────────────────

/// Serialize the whole journal as a pretty-printed JSON snapshot stamped
/// with `exported_at`.
pub fn export_json<S: KeyValueStore>(
  journal: &DayRecordStore<S>,
  exported_at: DateTime<Utc>,
) -> Result<String> {
  snapshot::export_json(journal.metadata(), journal.notes(), exported_at)
}

/// Parse and validate a JSON snapshot without touching any journal.
///
/// Fails with [`Error::Parse`] when `input` is not JSON and with
/// [`Error::Format`] when it is JSON but lacks usable `metadata` and
/// `notes` fields.
pub fn prepare_import(input: &str) -> Result<PendingImport> {
  snapshot::prepare_import(input)
}

/// Render the journal as human-readable text stamped with `exported_at`.
///
/// Days come out in chronological order: every day with metadata, plus
/// every day that only has a non-empty note.
pub fn export_text<S: KeyValueStore>(
  journal: &DayRecordStore<S>,
  exported_at: DateTime<Utc>,
) -> String {
  text::export_text(journal.metadata(), journal.notes(), exported_at)
}

/// Default file name for a snapshot taken on `day`.
pub fn json_filename(day: DayKey) -> String { format!("diario-export-{day}.json") }

/// Default file name for a text export taken on `day`.
pub fn text_filename(day: DayKey) -> String { format!("diario-{day}.txt") }

// ─── Round-trip tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod roundtrip_tests {
  use chrono::{NaiveTime, TimeZone};
  use diario_core::{Mood, StatusChange, memory::MemoryStore};

  use super::*;

  fn day(s: &str) -> DayKey { s.parse().unwrap() }

  fn at(h: u32, m: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, 0).unwrap() }

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() }

  async fn populated() -> DayRecordStore<MemoryStore> {
    let mut journal = DayRecordStore::open(MemoryStore::new()).await;
    let d = day("2024-01-05");
    journal.set_mood(d, Some(Mood::Good)).await.unwrap();
    journal
      .append_status_check_at(d, Some(StatusChange::Better), "slept well 😴", at(9, 0))
      .await
      .unwrap();
    journal
      .append_status_check_at(d, Some(StatusChange::Worse), "", at(17, 45))
      .await
      .unwrap();
    journal
      .set_note(d, "Línea uno.\nLínea dos — con acentos y emoji 🎉")
      .await
      .unwrap();
    journal.set_note(day("2024-01-06"), "").await.unwrap();
    journal.set_mood(day("2023-12-31"), Some(Mood::Terrible)).await.unwrap();
    journal
  }

  async fn import_into(json: &str) -> DayRecordStore<MemoryStore> {
    let mut target = DayRecordStore::open(MemoryStore::new()).await;
    prepare_import(json).unwrap().commit(&mut target).await.unwrap();
    target
  }

  #[tokio::test]
  async fn snapshot_round_trip_is_lossless() {
    let source = populated().await;
    let json = export_json(&source, now()).unwrap();

    let target = import_into(&json).await;
    assert_eq!(target.metadata(), source.metadata());
    assert_eq!(target.notes(), source.notes());
  }

  #[tokio::test]
  async fn empty_journal_round_trips() {
    let source = DayRecordStore::open(MemoryStore::new()).await;
    let json = export_json(&source, now()).unwrap();

    let mut target = populated().await;
    prepare_import(&json).unwrap().commit(&mut target).await.unwrap();
    assert!(target.metadata().is_empty());
    assert!(target.notes().is_empty());
  }

  #[tokio::test]
  async fn importing_twice_equals_importing_once() {
    let json = export_json(&populated().await, now()).unwrap();

    let once = import_into(&json).await;
    let mut twice = import_into(&json).await;
    prepare_import(&json).unwrap().commit(&mut twice).await.unwrap();

    assert_eq!(once.metadata(), twice.metadata());
    assert_eq!(once.notes(), twice.notes());
  }

  #[tokio::test]
  async fn rejected_import_leaves_journal_untouched() {
    let mut journal = populated().await;
    let before = (journal.metadata().clone(), journal.notes().clone());

    let result = prepare_import(r#"{"metadata": {}, "exportDate": "x", "version": "1.0"}"#);
    assert!(matches!(result, Err(Error::Format(_))));
    assert_eq!((journal.metadata().clone(), journal.notes().clone()), before);

    // A validated import that is never committed is a declined import.
    let declined = prepare_import(&export_json(
      &DayRecordStore::open(MemoryStore::new()).await,
      now(),
    )
    .unwrap())
    .unwrap();
    drop(declined);
    assert_eq!((journal.metadata().clone(), journal.notes().clone()), before);

    journal.set_note(day("2024-01-05"), "still writable").await.unwrap();
  }

  #[tokio::test]
  async fn import_accepts_legacy_files() {
    let legacy = r#"{
      "metadata": {
        "2024-03-02": {
          "mood": "bien",
          "statusChecks": [{ "time": "08:05", "status": "igual", "note": "" }],
          "energy": null,
          "tags": []
        }
      },
      "notes": { "2024-03-02": "Hola" },
      "exportDate": "2024-03-03T10:00:00.000Z",
      "version": "1.0"
    }"#;
    let target = import_into(legacy).await;
    let meta = target.get(day("2024-03-02"));
    assert_eq!(meta.mood, Some(Mood::Good));
    assert_eq!(meta.status_checks[0].status, StatusChange::Same);
    assert_eq!(target.note(day("2024-03-02")), "Hola");
  }

  #[tokio::test]
  async fn text_export_of_populated_journal() {
    let journal = populated().await;
    let text = export_text(&journal, now());
    let lines: Vec<_> = text.lines().collect();

    let first = lines.iter().position(|l| *l == "# 2023-12-31").unwrap();
    let second = lines.iter().position(|l| *l == "# 2024-01-05").unwrap();
    assert!(first < second);
    assert!(lines.contains(&"mood: terrible"));
    assert!(lines.contains(&"~ 09:00 better | slept well 😴"));
    assert!(lines.contains(&"~ 17:45 worse"));
    assert!(lines.contains(&"> Línea uno."));
    assert!(!text.contains("2024-01-06"));
  }

  #[test]
  fn file_names() {
    assert_eq!(json_filename(day("2024-06-01")), "diario-export-2024-06-01.json");
    assert_eq!(text_filename(day("2024-06-01")), "diario-2024-06-01.txt");
  }
}
