//! Timestamp parsing and formatting helpers.
//!
//! Two clocks meet in this crate: local messages carry offset-aware
//! timestamps, while the backend records naive wall-clock strings in the
//! form `datetime.isoformat()` emits. The helpers here keep the two from
//! being confused with each other.

use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Serde module for the backend's naive wall-clock timestamps.
///
/// Accepts `2026-08-23T14:31:22.123456`, the same without fractional
/// seconds, and (for robustness) RFC 3339 strings whose offset is dropped
/// after parsing. Serializes with six fractional digits to match what the
/// backend itself writes.
pub mod wall_clock {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;
    use time::format_description::well_known::Rfc3339;
    use time::macros::format_description;

    /// Deserialize a naive ISO 8601 string into a PrimitiveDateTime.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<PrimitiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    /// Serialize a PrimitiveDateTime into a naive ISO 8601 string.
    pub fn serialize<S>(datetime: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = datetime
            .format(format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]"
            ))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&s)
    }

    pub(super) fn parse(s: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
        if let Ok(parsed) = PrimitiveDateTime::parse(
            s,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        ) {
            return Ok(parsed);
        }
        if let Ok(parsed) = PrimitiveDateTime::parse(
            s,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        ) {
            return Ok(parsed);
        }
        // Offset-aware fallback: keep the date and time exactly as written.
        let offset = time::OffsetDateTime::parse(s, &Rfc3339)?;
        Ok(PrimitiveDateTime::new(offset.date(), offset.time()))
    }
}

/// Formats an offset-aware timestamp as `HH:MM:SS` in the given offset.
pub fn time_label(timestamp: OffsetDateTime, offset: UtcOffset) -> String {
    timestamp
        .to_offset(offset)
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_else(|_| String::from("--:--:--"))
}

/// Formats a naive wall-clock timestamp as `HH:MM:SS`, verbatim.
pub fn wall_clock_label(timestamp: PrimitiveDateTime) -> String {
    timestamp
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_else(|_| String::from("--:--:--"))
}
