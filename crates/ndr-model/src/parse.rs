//! Field parsing helpers.
//!
//! Each helper returns `None` on failure; the caller decides whether a
//! failed parse is skipped or reported.

use chrono::{Datelike, NaiveDate};

/// Date format used by every NDR date field.
pub const NDR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
///
/// The year must be four digits and the month and day one or two digits.
/// Signs and surrounding whitespace are rejected.
pub fn parse_ndr_date(value: &str) -> Option<NaiveDate> {
    if !has_date_shape(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, NDR_DATE_FORMAT).ok()
}

fn has_date_shape(value: &str) -> bool {
    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.bytes().all(|byte| byte.is_ascii_digit())
    };
    let mut parts = value.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day), None) => {
            digits(year, 4, 4) && digits(month, 1, 2) && digits(day, 1, 2)
        }
        _ => false,
    }
}

/// Parse an integer field, tolerating surrounding whitespace.
pub fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Age in whole years on `as_of`.
///
/// One year is subtracted when `as_of` falls before the birthday in that year.
pub fn age_in_years(birth: NaiveDate, as_of: NaiveDate) -> i64 {
    let mut age = i64::from(as_of.year()) - i64::from(birth.year());
    if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}
