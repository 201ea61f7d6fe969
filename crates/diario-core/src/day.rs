//! [`DayKey`] — the canonical identifier of one journal day.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

const ISO_DATE: &str = "%Y-%m-%d";

/// A calendar date, rendered as ISO `YYYY-MM-DD`.
///
/// Ordering is chronological, which for four-digit years is also the
/// lexicographic order of the rendered keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
  pub fn new(date: NaiveDate) -> Self { Self(date) }

  /// The day `dt` falls on in its own timezone; the time of day is dropped.
  pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
    Self(dt.date_naive())
  }

  /// Today in the local timezone.
  pub fn today() -> Self { Self::from_datetime(&Local::now()) }

  pub fn date(self) -> NaiveDate { self.0 }

  /// The following day. Saturates at the end of chrono's date range.
  pub fn next(self) -> Self {
    Self(self.0.checked_add_days(Days::new(1)).unwrap_or(self.0))
  }

  /// The preceding day. Saturates at the start of chrono's date range.
  pub fn prev(self) -> Self {
    Self(self.0.checked_sub_days(Days::new(1)).unwrap_or(self.0))
  }

  /// Parse an ISO date or one of `today`, `yesterday`, `tomorrow` relative
  /// to `today`.
  pub fn parse_relative(s: &str, today: DayKey) -> Result<Self> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
      "today" => Ok(today),
      "yesterday" => Ok(today.prev()),
      "tomorrow" => Ok(today.next()),
      _ => s.parse(),
    }
  }
}

impl From<NaiveDate> for DayKey {
  fn from(date: NaiveDate) -> Self { Self(date) }
}

impl fmt::Display for DayKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format(ISO_DATE))
  }
}

impl FromStr for DayKey {
  type Err = Error;

  /// Only the canonical zero-padded form is accepted, so two distinct
  /// strings never map to the same key.
  fn from_str(s: &str) -> Result<Self> {
    NaiveDate::parse_from_str(s, ISO_DATE)
      .ok()
      .map(Self)
      .filter(|key| key.to_string() == s)
      .ok_or_else(|| Error::InvalidDayKey(s.to_owned()))
  }
}

// Hand-written so the key stays a plain string, both as a value and as a
// JSON object key.

impl Serialize for DayKey {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for DayKey {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}
