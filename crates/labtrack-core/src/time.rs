//! Parsing helpers for dates and clock times arriving as query or body strings.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use crate::error::DomainError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const UTC_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const CLOCK_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Parse an instant. Accepts a bare date (midnight UTC), `YYYY-MM-DDTHH:MM:SSZ`
/// or any RFC 3339 timestamp.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, DomainError> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(start_of_day(date));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, UTC_DATETIME_FORMAT) {
        return Ok(naive.and_utc());
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::validation(format!("invalid date format: {value}")))
}

/// Parse both ends of an inclusive window; `end` may not precede `start`.
pub fn parse_range(start: &str, end: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), DomainError> {
    let start = parse_datetime(start)?;
    let end = parse_datetime(end)?;
    if end < start {
        return Err(DomainError::validation("end must not be before start"));
    }
    Ok((start, end))
}

/// Parse a calendar day using the same layouts as [`parse_datetime`].
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    parse_datetime(value).map(|dt| dt.date_naive())
}

/// Parse a wall-clock time, `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(value: &str) -> Result<NaiveTime, DomainError> {
    let value = value.trim();
    CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| DomainError::validation(format!("invalid time format: {value}")))
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Half-open `[start, end)` window covering one UTC day.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(date);
    (start, start + TimeDelta::days(1))
}

/// Half-open `[monday, next monday)` window of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()));
    (monday, monday + TimeDelta::days(7))
}

/// Seconds from `start` to `end` on a wall clock. An end before the start
/// is taken to cross midnight.
pub fn run_seconds(start: NaiveTime, end: NaiveTime) -> i64 {
    let secs = (end - start).num_seconds();
    if secs < 0 { secs + 86_400 } else { secs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Weekday};

    #[test]
    fn accepts_all_date_layouts() {
        let bare = parse_datetime("2024-03-05").unwrap();
        assert_eq!(bare.to_rfc3339(), "2024-03-05T00:00:00+00:00");

        let zulu = parse_datetime("2024-03-05T10:30:00Z").unwrap();
        assert_eq!(zulu.hour(), 10);

        let offset = parse_datetime("2024-03-05T10:30:00+02:00").unwrap();
        assert_eq!(offset.hour(), 8);
    }

    #[test]
    fn range_must_be_ordered() {
        let err = parse_range("2024-05-02", "2024-05-01T23:59:59Z").unwrap_err();
        assert_eq!(err.to_string(), "end must not be before start");

        let (start, end) = parse_range("2024-05-01", "2024-05-01").unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn date_takes_the_calendar_day() {
        let d = parse_date("2024-12-31T23:00:00Z").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 12, 31));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(parse_datetime("05/03/2024").is_err());
        assert!(parse_clock("25:99").is_err());
    }

    #[test]
    fn clock_round_trip() {
        let t = parse_clock("09:15").unwrap();
        assert_eq!(format_clock(t), "09:15");

        let with_seconds = parse_clock("09:15:42").unwrap();
        assert_eq!(with_seconds.second(), 42);
    }

    #[test]
    fn day_bounds_span_one_day() {
        let (start, end) = day_bounds(parse_date("2024-02-28").unwrap());
        assert_eq!(end - start, TimeDelta::days(1));
        assert_eq!(end.day(), 29);
    }

    #[test]
    fn week_starts_on_monday() {
        let (start, end) = week_bounds(parse_date("2024-05-02").unwrap());
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(start, parse_date("2024-04-29").unwrap());
        assert_eq!(end, parse_date("2024-05-06").unwrap());
    }
}
