//! Runtime configuration: built-in defaults, then an optional TOML file,
//! then `DIARIO_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use diario_core::journal::DEFAULT_TIME_FORMAT;
use serde::Deserialize;

const DEFAULT_STORE_PATH: &str = "~/.local/share/diario/diario.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite file holding the journal. A leading `~/` is expanded.
  pub store_path:  PathBuf,
  /// strftime format for status-check times.
  pub time_format: String,
}

impl Settings {
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .set_default("time_format", DEFAULT_TIME_FORMAT)?
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("DIARIO"))
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let settings = Settings::load(Path::new("definitely/not/here.toml")).unwrap();
    assert_eq!(settings.time_format, DEFAULT_TIME_FORMAT);
    assert!(settings.store_path.ends_with("diario/diario.db"));
  }

  #[test]
  fn tilde_is_expanded_only_at_the_start() {
    let untouched = Path::new("/tmp/~/x.db");
    assert_eq!(expand_tilde(untouched), untouched);

    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/j.db")), PathBuf::from(home).join("j.db"));
    }
  }
}
