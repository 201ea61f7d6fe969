//! Per-day record types.
//!
//! The wire form of every type here is the persisted form: the same JSON is
//! written to the backend and embedded in export snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::day::DayKey;

/// Every day's metadata, keyed and ordered by day.
pub type MetadataMap = BTreeMap<DayKey, DayMetadata>;

/// Every day's free-text entry, keyed and ordered by day.
pub type NoteMap = BTreeMap<DayKey, String>;

// ─── Mood ────────────────────────────────────────────────────────────────────

/// A single feeling rating for a whole day.
///
/// Older journals stored Spanish values; those are still accepted on input.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mood {
  #[serde(alias = "excelente")]
  #[strum(to_string = "excellent", serialize = "excelente")]
  Excellent,
  #[serde(alias = "bien")]
  #[strum(to_string = "good", serialize = "bien")]
  Good,
  Neutral,
  #[serde(alias = "mal")]
  #[strum(to_string = "bad", serialize = "mal")]
  Bad,
  Terrible,
}

// ─── Status checks ───────────────────────────────────────────────────────────

/// Direction of a check-in relative to the previous one.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StatusChange {
  #[serde(alias = "mejor")]
  #[strum(to_string = "better", serialize = "mejor")]
  Better,
  #[serde(alias = "igual")]
  #[strum(to_string = "same", serialize = "igual")]
  Same,
  #[serde(alias = "peor")]
  #[strum(to_string = "worse", serialize = "peor")]
  Worse,
}

/// One check-in logged during a day. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
  /// Short clock time, e.g. `"09:00"`.
  pub time:   String,
  pub status: StatusChange,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note:   Option<String>,
}

impl StatusCheck {
  /// The note, if it carries any visible text.
  pub fn note_text(&self) -> Option<&str> {
    self.note.as_deref().filter(|n| !n.trim().is_empty())
  }
}

// ─── DayMetadata ─────────────────────────────────────────────────────────────

/// Everything recorded about a day except its free text.
///
/// `Default` is the empty day: no mood, no check-ins, no energy, no tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DayMetadata {
  pub mood:          Option<Mood>,
  /// Chronological, append-only.
  pub status_checks: Vec<StatusCheck>,
  /// Reserved; nothing writes it yet.
  pub energy:        Option<f64>,
  /// Reserved; nothing writes it yet.
  pub tags:          Vec<String>,
}

impl DayMetadata {
  pub fn is_empty(&self) -> bool {
    self.mood.is_none()
      && self.status_checks.is_empty()
      && self.energy.is_none()
      && self.tags.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn default_day_is_empty() {
    let day = DayMetadata::default();
    assert!(day.is_empty());
    assert_eq!(day.mood, None);
    assert!(day.status_checks.is_empty());
    assert_eq!(day.energy, None);
    assert!(day.tags.is_empty());
  }

  #[test]
  fn wire_form_uses_camel_case_and_nulls() {
    let day = DayMetadata {
      mood: Some(Mood::Good),
      status_checks: vec![StatusCheck {
        time:   "09:00".into(),
        status: StatusChange::Better,
        note:   None,
      }],
      ..Default::default()
    };
    let value = serde_json::to_value(&day).unwrap();
    assert_eq!(
      value,
      json!({
        "mood": "good",
        "statusChecks": [{ "time": "09:00", "status": "better" }],
        "energy": null,
        "tags": [],
      })
    );
  }

  #[test]
  fn missing_fields_default() {
    let day: DayMetadata = serde_json::from_str(r#"{"mood":"bad"}"#).unwrap();
    assert_eq!(day.mood, Some(Mood::Bad));
    assert!(day.status_checks.is_empty());
  }

  #[test]
  fn legacy_spanish_values_are_accepted() {
    let day: DayMetadata = serde_json::from_value(json!({
      "mood": "excelente",
      "statusChecks": [
        { "time": "10:15", "status": "mejor", "note": "" },
        { "time": "18:40", "status": "peor", "note": "cansado" },
      ],
      "energy": null,
      "tags": [],
    }))
    .unwrap();
    assert_eq!(day.mood, Some(Mood::Excellent));
    assert_eq!(day.status_checks[0].status, StatusChange::Better);
    assert_eq!(day.status_checks[0].note_text(), None);
    assert_eq!(day.status_checks[1].note_text(), Some("cansado"));
  }

  #[test]
  fn string_conversions() {
    assert_eq!(Mood::Excellent.to_string(), "excellent");
    assert_eq!("GOOD".parse::<Mood>().unwrap(), Mood::Good);
    assert_eq!("mal".parse::<Mood>().unwrap(), Mood::Bad);
    assert!("meh".parse::<Mood>().is_err());
    assert_eq!("igual".parse::<StatusChange>().unwrap(), StatusChange::Same);
    assert_eq!(StatusChange::Worse.as_ref(), "worse");
  }
}
