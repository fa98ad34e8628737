//! Datetime literals inside command arguments
//!
//! The model writes `YYYY-MM-DD` when it does not know the date; that
//! placeholder means "today" in local time.

use chrono::{NaiveDate, NaiveDateTime};

use crate::core::error::{CopilotError, Result};

/// Placeholder the model uses for an unknown date
pub const DATE_PLACEHOLDER: &str = "YYYY-MM-DD";

/// Space-separated date and time
const PLAIN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `T`-separated with fractional seconds. chrono treats `%.f` as optional,
/// so `has_fraction` gates it.
const FRACTIONAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Replace every date placeholder with `today`
pub fn fill_date_placeholder(value: &str, today: NaiveDate) -> String {
    value.replace(DATE_PLACEHOLDER, &today.format("%Y-%m-%d").to_string())
}

/// Parse a datetime argument against the accepted formats
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, PLAIN_FORMAT)
        .ok()
        .or_else(|| {
            has_fraction(value)
                .then(|| NaiveDateTime::parse_from_str(value, FRACTIONAL_FORMAT).ok())
                .flatten()
        })
        .ok_or_else(|| CopilotError::InvalidDateTimeError(value.to_string()))
}

/// A `.` followed by one or more digits ends the value
fn has_fraction(value: &str) -> bool {
    value
        .rsplit_once('.')
        .is_some_and(|(_, fraction)| !fraction.is_empty() && fraction.bytes().all(|b| b.is_ascii_digit()))
}

/// Fill the placeholder, then parse
pub fn normalize_datetime(value: &str, today: NaiveDate) -> Result<NaiveDateTime> {
    parse_datetime(&fill_date_placeholder(value, today))
}
