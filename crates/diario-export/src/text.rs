//! Plain-text journal rendering.
//!
//! Write-only: meant for reading and backup, there is no parser. Notes are
//! emitted verbatim, so a multi-line note spans several output lines.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use diario_core::{DayKey, DayMetadata, MetadataMap, NoteMap, StatusCheck};

use crate::snapshot::{SNAPSHOT_VERSION, iso_timestamp};

/// Stands in for an absent value.
const PLACEHOLDER: &str = "-";

pub(crate) fn export_text(
  metadata: &MetadataMap,
  notes: &NoteMap,
  exported_at: DateTime<Utc>,
) -> String {
  let mut lines = vec![
    format!("@v={SNAPSHOT_VERSION}"),
    format!("@export={}", iso_timestamp(exported_at)),
    String::new(),
  ];

  let empty = DayMetadata::default();
  for day in rendered_days(metadata, notes) {
    let meta = metadata.get(&day).unwrap_or(&empty);

    lines.push(format!("# {day}"));
    lines.push(format!("mood: {}", or_placeholder(meta.mood)));
    lines.push(format!("energy: {}", or_placeholder(meta.energy)));
    lines.push(format!("tags: {}", tags_line(&meta.tags)));
    lines.push(String::new());

    if let Some(note) = notes.get(&day).filter(|n| !n.is_empty()) {
      lines.push(format!("> {note}"));
      lines.push(String::new());
    }

    if !meta.status_checks.is_empty() {
      lines.extend(meta.status_checks.iter().map(check_line));
      lines.push(String::new());
    }
  }

  lines.join("\n")
}

/// Every day with metadata, plus every day whose note has text.
fn rendered_days(metadata: &MetadataMap, notes: &NoteMap) -> BTreeSet<DayKey> {
  let with_text = notes
    .iter()
    .filter(|(_, note)| !note.is_empty())
    .map(|(day, _)| day);
  metadata.keys().chain(with_text).copied().collect()
}

fn or_placeholder<T: ToString>(value: Option<T>) -> String {
  value.map_or_else(|| PLACEHOLDER.to_owned(), |v| v.to_string())
}

fn tags_line(tags: &[String]) -> String {
  if tags.is_empty() {
    PLACEHOLDER.to_owned()
  } else {
    tags.join(", ")
  }
}

fn check_line(check: &StatusCheck) -> String {
  match check.note_text() {
    Some(note) => format!("~ {} {} | {note}", check.time, check.status),
    None => format!("~ {} {}", check.time, check.status),
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use diario_core::{Mood, StatusChange};

  use super::*;

  fn day(s: &str) -> DayKey { s.parse().unwrap() }

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap() }

  fn sample() -> (MetadataMap, NoteMap) {
    let mut metadata = MetadataMap::new();
    metadata.insert(day("2024-01-05"), DayMetadata {
      mood: Some(Mood::Good),
      status_checks: vec![StatusCheck {
        time:   "09:00".into(),
        status: StatusChange::Better,
        note:   Some("slept well".into()),
      }],
      ..Default::default()
    });
    let mut notes = NoteMap::new();
    notes.insert(day("2024-01-05"), "Today was good.".into());
    (metadata, notes)
  }

  #[test]
  fn renders_a_full_day() {
    let (metadata, notes) = sample();
    let text = export_text(&metadata, &notes, now());
    let expected = [
      "@v=1.0",
      "@export=2024-06-01T08:30:00.000Z",
      "",
      "# 2024-01-05",
      "mood: good",
      "energy: -",
      "tags: -",
      "",
      "> Today was good.",
      "",
      "~ 09:00 better | slept well",
      "",
    ]
    .join("\n");
    assert_eq!(text, expected);
  }

  #[test]
  fn empty_journal_is_header_only() {
    let text = export_text(&MetadataMap::new(), &NoteMap::new(), now());
    assert_eq!(text, "@v=1.0\n@export=2024-06-01T08:30:00.000Z\n");
  }

  #[test]
  fn days_are_sorted_chronologically() {
    let mut metadata = MetadataMap::new();
    for d in ["2024-02-01", "2023-12-31", "2024-01-15"] {
      metadata.insert(day(d), DayMetadata::default());
    }
    let text = export_text(&metadata, &NoteMap::new(), now());
    let dates: Vec<_> = text.lines().filter(|l| l.starts_with("# ")).collect();
    assert_eq!(dates, ["# 2023-12-31", "# 2024-01-15", "# 2024-02-01"]);
  }

  #[test]
  fn check_without_note_has_no_separator() {
    let mut metadata = MetadataMap::new();
    metadata.insert(day("2024-01-05"), DayMetadata {
      status_checks: vec![
        StatusCheck {
          time:   "10:00".into(),
          status: StatusChange::Same,
          note:   None,
        },
        StatusCheck {
          time:   "11:00".into(),
          status: StatusChange::Worse,
          note:   Some(String::new()),
        },
      ],
      ..Default::default()
    });
    let text = export_text(&metadata, &NoteMap::new(), now());
    assert!(text.lines().any(|l| l == "~ 10:00 same"));
    assert!(text.lines().any(|l| l == "~ 11:00 worse"));
    assert!(!text.contains('|'));
  }

  #[test]
  fn energy_and_tags_are_rendered_when_present() {
    let mut metadata = MetadataMap::new();
    metadata.insert(day("2024-01-05"), DayMetadata {
      energy: Some(3.0),
      tags: vec!["work".into(), "gym".into()],
      ..Default::default()
    });
    let text = export_text(&metadata, &NoteMap::new(), now());
    assert!(text.lines().any(|l| l == "energy: 3"));
    assert!(text.lines().any(|l| l == "tags: work, gym"));
    assert!(text.lines().any(|l| l == "mood: -"));
  }

  #[test]
  fn multi_line_notes_are_verbatim() {
    let mut notes = NoteMap::new();
    notes.insert(day("2024-01-05"), "line one\nline two ✨".into());
    let text = export_text(&MetadataMap::new(), &notes, now());
    assert!(text.contains("> line one\nline two ✨\n"));
  }

  #[test]
  fn note_only_days_are_rendered_with_placeholders() {
    let mut notes = NoteMap::new();
    notes.insert(day("2024-01-07"), "no mood today".into());
    notes.insert(day("2024-01-08"), String::new());
    let text = export_text(&MetadataMap::new(), &notes, now());

    assert!(text.contains("# 2024-01-07\nmood: -\nenergy: -\ntags: -\n\n> no mood today"));
    assert!(!text.contains("2024-01-08"));
  }
}
