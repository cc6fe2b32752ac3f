//! Lenient decoders for the few fields the backend does not send
//! consistently.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
  Number(u64),
  String(String),
}

/// `numero_ficha` is a number on `/fichas` but a string when embedded in
/// assignment rows.
pub(crate) fn ficha_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
  D: Deserializer<'de>,
{
  match NumberOrString::deserialize(deserializer)? {
    NumberOrString::Number(n) => u32::try_from(n).map_err(de::Error::custom),
    NumberOrString::String(s) => s
      .trim()
      .parse()
      .map_err(|_| de::Error::custom(format!("invalid ficha number {s:?}"))),
  }
}

/// Parse a calendar date from either `YYYY-MM-DD` or a full timestamp.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    .or_else(|| {
      NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
    })
}

/// `fecha` is a date column, but some backend versions serialise it as an
/// ISO timestamp.
pub(crate) fn flexible_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(deserializer)?;
  parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date {raw:?}")))
}
