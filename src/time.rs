//! Date handling for request parameters and response payloads.
//!
//! The API is loose about date formats. Responses mix RFC 3339 timestamps
//! (`2021-06-24T12:00:00Z`), space-separated timestamps and bare dates,
//! and some request parameters accept either a full date (`2021-06-24`) or
//! a month (`2021-06`) with the granularity echoed back in the request.
//! Everything normalizes to UTC here.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{ApiError, ApiResult};

/// Parse a timestamp in any of the formats the API emits.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, a bare date and a bare month,
/// in that order. Dates resolve to midnight UTC, months to midnight on the
/// first day.
pub fn parse_datetime(value: &str) -> ApiResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(ApiError::Validation(format!(
        "Unable to parse date: {value}"
    )))
}

/// Parse a date parameter, accepting a full date or a bare month.
pub fn parse_date(value: &str) -> ApiResult<NaiveDate> {
    Ok(parse_datetime(value)?.date_naive())
}

/// First day of the month the value falls in, today's month when absent.
pub fn month_start(value: Option<&str>) -> ApiResult<NaiveDate> {
    let date = match value {
        Some(v) => parse_date(v)?,
        None => Utc::now().date_naive(),
    };
    date.with_day(1)
        .ok_or_else(|| ApiError::Validation(format!("Unable to normalize month: {date}")))
}

/// Whether the value contains a full `YYYY-MM-DD` date anywhere in it.
///
/// Request date parameters are echoed at the granularity they came in
/// with, and a substring match is what decides it.
pub fn is_full_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.windows(10).any(|w| {
        w[4] == b'-'
            && w[7] == b'-'
            && w.iter()
                .enumerate()
                .filter(|(i, _)| *i != 4 && *i != 7)
                .all(|(_, b)| b.is_ascii_digit())
    })
}

/// Format a date at the granularity of the original request value.
///
/// Full-date inputs render as `YYYY-MM-DD`, month inputs as `YYYY-MM`.
pub fn format_with_granularity(date: NaiveDate, full: bool) -> String {
    if full {
        date.format("%Y-%m-%d").to_string()
    } else {
        date.format("%Y-%m").to_string()
    }
}
