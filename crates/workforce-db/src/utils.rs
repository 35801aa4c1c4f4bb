//! Shared utility functions

use chrono::{DateTime, NaiveDate, Utc};

/// Storage format for calendar dates (hire dates, summary dates)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a datetime string (RFC3339 format) or return current time
pub fn parse_datetime_or_now(s: &str) -> DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a stored calendar date; garbage is a decode error
pub fn parse_date(s: &str) -> Result<NaiveDate, sqlx::Error> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Format a calendar date for storage
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
