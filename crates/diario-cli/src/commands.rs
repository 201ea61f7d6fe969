//! Command handlers. Each one reads or mutates the journal only through
//! [`DayRecordStore`]'s operations and the export codec.

use std::{
  io::{self, BufRead, Read, Write},
  path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};
use chrono::Utc;
use diario_core::{DayKey, DayRecordStore, Mood, StatusChange, store::KeyValueStore};
use diario_store_sqlite::SqliteStore;
use tracing::debug;

use crate::ExportFormat;

type Journal = DayRecordStore<SqliteStore>;

// ─── Reads ────────────────────────────────────────────────────────────────────

pub fn show(journal: &Journal, day: DayKey) -> anyhow::Result<()> {
  let meta = journal.get(day);
  let mut out = io::stdout().lock();

  writeln!(out, "{day}")?;
  match meta.mood {
    Some(mood) => writeln!(out, "mood: {mood}")?,
    None => writeln!(out, "mood: -")?,
  }

  if !meta.status_checks.is_empty() {
    writeln!(out, "check-ins:")?;
    for check in &meta.status_checks {
      match check.note_text() {
        Some(note) => writeln!(out, "  {} {:<6} {note}", check.time, check.status)?,
        None => writeln!(out, "  {} {}", check.time, check.status)?,
      }
    }
  }

  let note = journal.note(day);
  if !note.is_empty() {
    writeln!(out)?;
    writeln!(out, "{note}")?;
  }
  Ok(())
}

pub fn list(journal: &Journal) -> anyhow::Result<()> {
  let mut out = io::stdout().lock();
  for day in journal.days() {
    let meta = journal.get(day);
    let mood = meta.mood.map_or("-".to_owned(), |m| m.to_string());
    let checks = meta.status_checks.len();
    let words = journal.note(day).split_whitespace().count();
    writeln!(out, "{day}  {mood:<9}  {checks:>2} check-ins  {words:>5} words")?;
  }
  Ok(())
}

// ─── Mutations ────────────────────────────────────────────────────────────────

pub async fn set_mood(
  journal: &mut Journal,
  day: DayKey,
  mood: Option<Mood>,
) -> anyhow::Result<()> {
  warn_if_unsaved(journal.set_mood(day, mood).await)
}

pub async fn check(
  journal: &mut Journal,
  day: DayKey,
  status: StatusChange,
  note: &str,
) -> anyhow::Result<()> {
  let result = journal.append_status_check(day, Some(status), note).await;
  warn_if_unsaved(result.map(|_| ()))
}

pub async fn note(
  journal: &mut Journal,
  day: DayKey,
  text: Option<String>,
) -> anyhow::Result<()> {
  let text = match text {
    Some(text) => text,
    None => {
      let mut buf = String::new();
      io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read note from stdin")?;
      strip_final_newline(buf)
    }
  };
  warn_if_unsaved(journal.set_note(day, text).await)
}

/// Drop the single line ending that terminates piped input.
fn strip_final_newline(mut text: String) -> String {
  if text.ends_with("\r\n") {
    text.truncate(text.len() - 2);
  } else if text.ends_with('\n') {
    text.pop();
  }
  text
}

pub async fn clear<S: KeyValueStore>(
  journal: &mut DayRecordStore<S>,
  yes: bool,
) -> anyhow::Result<()> {
  let days = journal.days().len();
  if !yes {
    let prompt = format!("This will delete all {days} days. Continue? [y/N] ");
    if !confirm(&prompt)? {
      eprintln!("nothing was deleted");
      return Ok(());
    }
  }
  warn_if_unsaved(journal.clear().await)?;
  eprintln!("deleted {days} days");
  Ok(())
}

/// A failed backend write is not fatal: report it and carry on.
fn warn_if_unsaved(result: diario_core::Result<()>) -> anyhow::Result<()> {
  match result {
    Err(diario_core::Error::Storage(e)) => {
      eprintln!("warning: the change could not be saved: {e}");
      Ok(())
    }
    other => Ok(other?),
  }
}

// ─── Export / import ──────────────────────────────────────────────────────────

pub async fn export(
  journal: &Journal,
  format: ExportFormat,
  out: Option<PathBuf>,
) -> anyhow::Result<()> {
  let now = Utc::now();
  let today = DayKey::today();

  let (body, default_name, mime) = match format {
    ExportFormat::Json => (
      diario_export::export_json(journal, now)?,
      diario_export::json_filename(today),
      diario_export::JSON_MIME,
    ),
    ExportFormat::Txt => (
      diario_export::export_text(journal, now),
      diario_export::text_filename(today),
      diario_export::TEXT_MIME,
    ),
  };
  debug!(mime, bytes = body.len(), "export rendered");

  let path = out.unwrap_or_else(|| PathBuf::from(default_name));
  if path.as_os_str() == "-" {
    io::stdout().lock().write_all(body.as_bytes())?;
    return Ok(());
  }

  tokio::fs::write(&path, body)
    .await
    .with_context(|| format!("failed to write {}", path.display()))?;
  eprintln!("exported {} days to {}", journal.days().len(), path.display());
  Ok(())
}

pub async fn import<S: KeyValueStore>(
  journal: &mut DayRecordStore<S>,
  file: &Path,
  yes: bool,
  force: bool,
) -> anyhow::Result<()> {
  if !force && !has_json_extension(file) {
    bail!("{} is not a .json file (use --force to import it anyway)", file.display());
  }

  let raw = tokio::fs::read_to_string(file)
    .await
    .with_context(|| format!("failed to read {}", file.display()))?;

  let pending = match diario_export::prepare_import(&raw) {
    Ok(pending) => pending,
    Err(e @ diario_export::Error::Parse(_)) => {
      bail!("could not read {} as JSON: {e}", file.display())
    }
    Err(e) => bail!("{} is not a diario export: {e}", file.display()),
  };

  if !yes {
    let prompt = format!(
      "This will replace your current data with {} days from {}. Continue? [y/N] ",
      pending.day_count(),
      file.display(),
    );
    if !confirm(&prompt)? {
      eprintln!("import cancelled; nothing was changed");
      return Ok(());
    }
  }

  let days = pending.day_count();
  match pending.commit(journal).await {
    Err(diario_core::Error::Storage(e)) => {
      eprintln!("warning: imported data could not be saved: {e}");
    }
    other => other?,
  }
  eprintln!("imported {days} days");
  Ok(())
}

fn has_json_extension(path: &Path) -> bool {
  path
    .extension()
    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
fn confirm(prompt: &str) -> io::Result<bool> {
  let stdin = io::stdin();
  eprint!("{prompt}");
  io::stderr().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
  use diario_core::memory::MemoryStore;

  use super::*;

  #[test]
  fn json_extension_check() {
    assert!(has_json_extension(Path::new("backup.json")));
    assert!(has_json_extension(Path::new("BACKUP.JSON")));
    assert!(!has_json_extension(Path::new("backup.txt")));
    assert!(!has_json_extension(Path::new("json")));
  }

  #[test]
  fn piped_note_loses_only_its_final_newline() {
    assert_eq!(strip_final_newline("hola\n".into()), "hola");
    assert_eq!(strip_final_newline("hola\r\n".into()), "hola");
    assert_eq!(strip_final_newline("one\ntwo\n\n".into()), "one\ntwo\n");
    assert_eq!(strip_final_newline("no newline".into()), "no newline");
    assert_eq!(strip_final_newline(String::new()), "");
  }

  #[tokio::test]
  async fn confirmed_clear_empties_the_journal() {
    let mut journal = DayRecordStore::open(MemoryStore::new()).await;
    journal.set_mood(DayKey::today(), Some(Mood::Neutral)).await.unwrap();
    clear(&mut journal, true).await.unwrap();
    assert!(journal.days().is_empty());
  }

  #[tokio::test]
  async fn import_refuses_non_json_files_before_reading() {
    let mut journal = DayRecordStore::open(MemoryStore::new()).await;
    let err = import(&mut journal, Path::new("does-not-exist.txt"), true, false)
      .await
      .unwrap_err();
    assert!(err.to_string().contains("--force"));
    assert!(journal.metadata().is_empty());
  }

  #[tokio::test]
  async fn import_reports_missing_file() {
    let mut journal = DayRecordStore::open(MemoryStore::new()).await;
    let err = import(&mut journal, Path::new("does-not-exist.json"), true, false)
      .await
      .unwrap_err();
    assert!(err.to_string().contains("failed to read"));
  }
}
