//! Conversions from stored column values back into domain types.

use crate::{DbError, Result};

use std::fmt::Display;
use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use error_location::ErrorLocation;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[track_caller]
pub(crate) fn uuid(raw: &str, column: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| DbError::Decode {
        message: format!("Invalid UUID in {}: {}", column, e),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
pub(crate) fn timestamp(secs: i64, column: &str) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| DbError::Decode {
        message: format!("Invalid timestamp in {}", column),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
pub(crate) fn opt_timestamp(secs: Option<i64>, column: &str) -> Result<Option<DateTime<Utc>>> {
    secs.map(|s| timestamp(s, column)).transpose()
}

#[track_caller]
pub(crate) fn opt_date(raw: Option<&str>, column: &str) -> Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| DbError::Decode {
            message: format!("Invalid date in {}: {}", column, e),
            location: ErrorLocation::from(Location::caller()),
        })
    })
    .transpose()
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

/// Parses any status-like column through its `FromStr` impl.
#[track_caller]
pub(crate) fn parse<T>(raw: &str, column: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    T::from_str(raw).map_err(|e| DbError::Decode {
        message: format!("Invalid value in {}: {}", column, e),
        location: ErrorLocation::from(Location::caller()),
    })
}
