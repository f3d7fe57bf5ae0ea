//! Day-first calendar date parsing.

use chrono::{NaiveDate, NaiveTime};

/// Formats tried in order. Two-digit years come first so that `%Y` never
/// swallows a short year as a literal year in the first century.
const DAY_FIRST_FORMATS: [&str; 8] = [
    "%d-%m-%y", "%d/%m/%y", "%d.%m.%y", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d",
];

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M", "%I:%M %p"];

/// Parse a catalog date using the day-first convention.
///
/// A trailing time of day (`15-01-2024 10:30`, `2024-01-15T00:00:00`) is
/// accepted and ignored; see [`time_of_day`].
pub fn parse_day_first(value: &str) -> Option<NaiveDate> {
    let (date_part, _) = split_date_time(value);
    if date_part.is_empty() {
        return None;
    }
    DAY_FIRST_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// The time of day trailing a catalog date, if one is present and readable.
pub fn time_of_day(value: &str) -> Option<NaiveTime> {
    let (_, time_part) = split_date_time(value);
    let time_part = time_part?;
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time_part, fmt).ok())
}

fn split_date_time(value: &str) -> (&str, Option<&str>) {
    let trimmed = value.trim();
    match trimmed.split_once([' ', 'T']) {
        Some((date, time)) if !time.trim().is_empty() => (date, Some(time.trim())),
        Some((date, _)) => (date, None),
        None => (trimmed, None),
    }
}
