use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("missing date parameter")]
    Missing,
    #[error("unparsable date {0:?}")]
    Unparsable(String),
    #[error("{0} is in the future")]
    Future(NaiveDate),
}

/// Validates an externally supplied date string against `today`.
///
/// Accepts ISO 8601 dates and date-times (truncated to the date). Dates
/// strictly after `today` are rejected. `today` is passed in so callers
/// decide what "now" means.
pub fn validate_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let raw = raw.ok_or(DateError::Missing)?;
    let date = parse_iso_date(raw).ok_or_else(|| DateError::Unparsable(raw.to_string()))?;
    if date > today {
        return Err(DateError::Future(date));
    }
    Ok(date)
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}
