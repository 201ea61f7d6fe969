//! `diario` — command-line journal.
//!
//! # Usage
//!
//! ```text
//! diario mood good
//! diario check better --note "slept well"
//! diario note --date yesterday "Long walk by the river."
//! diario show --date 2024-01-05
//! diario export json
//! diario import diario-export-2024-06-01.json
//! diario clear
//! ```

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use diario_core::{DayKey, DayRecordStore, Mood, StatusChange};
use diario_store_sqlite::SqliteStore;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "diario", version, about = "A small daily journal")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "diario.toml", env = "DIARIO_CONFIG")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

/// Which day a command targets.
#[derive(Args, Debug, Clone, Copy)]
struct DayArg {
  /// `YYYY-MM-DD`, `today`, `yesterday` or `tomorrow`.
  #[arg(short, long, default_value = "today", value_parser = parse_day)]
  date: DayKey,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Print one day's mood, check-ins and note.
  Show {
    #[command(flatten)]
    day: DayArg,
  },

  /// List every day that has an entry.
  List,

  /// Set or clear the day's mood.
  Mood {
    /// excellent, good, neutral, bad or terrible.
    #[arg(required_unless_present = "clear")]
    mood: Option<Mood>,

    /// Remove the mood instead of setting one.
    #[arg(long, conflicts_with = "mood")]
    clear: bool,

    #[command(flatten)]
    day: DayArg,
  },

  /// Log a check-in: are you feeling better, the same, or worse?
  Check {
    /// better, same or worse.
    status: StatusChange,

    /// Why, in a few words.
    #[arg(short, long, default_value = "")]
    note: String,

    #[command(flatten)]
    day: DayArg,
  },

  /// Replace the day's free text. Reads stdin when TEXT is omitted.
  Note {
    text: Option<String>,

    #[command(flatten)]
    day: DayArg,
  },

  /// Export the whole journal.
  Export {
    #[arg(value_enum)]
    format: ExportFormat,

    /// Output file; `-` for stdout. Defaults to a dated file name.
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
  },

  /// Replace the whole journal with a JSON snapshot.
  Import {
    file: PathBuf,

    /// Do not ask for confirmation.
    #[arg(short, long)]
    yes: bool,

    /// Accept files without a `.json` extension.
    #[arg(long)]
    force: bool,
  },

  /// Delete every day from the journal.
  Clear {
    /// Do not ask for confirmation.
    #[arg(short, long)]
    yes: bool,
  },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
  Json,
  Txt,
}

fn parse_day(s: &str) -> Result<DayKey, diario_core::Error> {
  DayKey::parse_relative(s, DayKey::today())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let backend = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  let mut journal = DayRecordStore::open(backend)
    .await
    .with_time_format(&settings.time_format)
    .context("invalid time_format in settings")?;

  match cli.command {
    Command::Show { day } => commands::show(&journal, day.date),
    Command::List => commands::list(&journal),
    Command::Mood { mood, clear, day } => {
      let mood = if clear { None } else { mood };
      commands::set_mood(&mut journal, day.date, mood).await
    }
    Command::Check { status, note, day } => {
      commands::check(&mut journal, day.date, status, &note).await
    }
    Command::Note { text, day } => commands::note(&mut journal, day.date, text).await,
    Command::Export { format, out } => commands::export(&journal, format, out).await,
    Command::Import { file, yes, force } => {
      commands::import(&mut journal, &file, yes, force).await
    }
    Command::Clear { yes } => commands::clear(&mut journal, yes).await,
  }
}
