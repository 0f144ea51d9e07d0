//! Lenient date input for meal bodies.
//!
//! Clients send either epoch milliseconds or a date string; both end up as epoch milliseconds.
//! Strings without an offset are read as UTC.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use thiserror::Error;
use time::{
    format_description::well_known::{Rfc2822, Rfc3339},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime,
};

/// Largest magnitude a date may have, 100 000 000 days either side of the epoch.
pub const MAX_EPOCH_MILLIS: i64 = 8_640_000_000_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date: {0:?}")]
    Unparseable(String),

    #[error("date out of range")]
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochMillis(pub i64);

impl EpochMillis {
    pub fn from_millis(millis: i64) -> Result<Self, DateError> {
        if !(-MAX_EPOCH_MILLIS..=MAX_EPOCH_MILLIS).contains(&millis) {
            return Err(DateError::OutOfRange);
        }
        Ok(Self(millis))
    }

    pub fn parse(input: &str) -> Result<Self, DateError> {
        let trimmed = input.trim();
        let unparseable = || DateError::Unparseable(input.to_string());
        if trimmed.is_empty() {
            return Err(unparseable());
        }

        if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Self::from_datetime(dt);
        }
        if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc2822) {
            return Self::from_datetime(dt);
        }
        // Looser ISO forms: minute precision, compact offsets, `Z` with a non-RFC 3339 body.
        let zoned = match trimmed.strip_suffix(['Z', 'z']) {
            Some(rest) => format!("{rest}+00:00"),
            None => trimmed.to_string(),
        };
        let offset_formats = [
            format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
            ),
            format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory][offset_minute]"
            ),
            format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
            ),
            format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
            ),
            format_description!(
                "[year]-[month]-[day]T[hour]:[minute][offset_hour sign:mandatory]:[offset_minute]"
            ),
            format_description!(
                "[year]-[month]-[day]T[hour]:[minute][offset_hour sign:mandatory][offset_minute]"
            ),
        ];
        if let Some(dt) = offset_formats
            .iter()
            .copied()
            .find_map(|format| OffsetDateTime::parse(&zoned, format).ok())
        {
            return Self::from_datetime(dt);
        }

        let date_formats = [
            format_description!("[year]-[month]-[day]"),
            format_description!("[year]/[month]/[day]"),
        ];
        if let Some(date) = date_formats
            .iter()
            .copied()
            .find_map(|format| Date::parse(trimmed, format).ok())
        {
            return Self::from_datetime(date.midnight().assume_utc());
        }

        let naive_formats = [
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
            format_description!("[year]-[month]-[day]T[hour]:[minute]"),
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
            format_description!("[year]-[month]-[day] [hour]:[minute]"),
            format_description!("[year]/[month]/[day] [hour]:[minute]:[second]"),
            format_description!("[year]/[month]/[day] [hour]:[minute]"),
        ];
        naive_formats
            .iter()
            .copied()
            .find_map(|format| PrimitiveDateTime::parse(trimmed, format).ok())
            .ok_or_else(unparseable)
            .and_then(|dt| Self::from_datetime(dt.assume_utc()))
    }

    fn from_datetime(dt: OffsetDateTime) -> Result<Self, DateError> {
        let millis = dt.unix_timestamp_nanos() / 1_000_000;
        let millis = i64::try_from(millis).map_err(|_| DateError::OutOfRange)?;
        Self::from_millis(millis)
    }
}

impl<'de> Deserialize<'de> for EpochMillis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(EpochMillisVisitor)
    }
}

struct EpochMillisVisitor;

impl<'de> Visitor<'de> for EpochMillisVisitor {
    type Value = EpochMillis;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a date string or epoch milliseconds")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        EpochMillis::from_millis(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(DateError::OutOfRange))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() || v.abs() > MAX_EPOCH_MILLIS as f64 {
            return Err(E::custom(DateError::OutOfRange));
        }
        self.visit_i64(v.trunc() as i64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        EpochMillis::parse(v).map_err(E::custom)
    }
}
