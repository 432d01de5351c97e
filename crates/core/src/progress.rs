#![forbid(unsafe_code)]

use time::format_description::well_known::Rfc3339;
use time::{Date, Month, OffsetDateTime, Time};

/// Percentage of completed tasks, rounded half up. A goal with no tasks
/// has a progress of 0.
pub fn aggregate_progress(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u128;
    let total = total as u128;
    ((200 * completed + total) / (2 * total)) as u8
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeadlineError {
    Empty,
    Unparseable,
}

/// Parses a `timeBound` value. Accepts an RFC 3339 date-time or a bare
/// `YYYY-MM-DD` date, which resolves to midnight UTC.
pub fn parse_deadline(value: &str) -> Result<OffsetDateTime, DeadlineError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DeadlineError::Empty);
    }
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(parsed);
    }
    if let Some(date) = parse_bare_date(value) {
        return Ok(date.with_time(Time::MIDNIGHT).assume_utc());
    }
    Err(DeadlineError::Unparseable)
}

fn parse_bare_date(value: &str) -> Option<Date> {
    let mut parts = value.splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u8>().ok()?;
    let day = parts.next()?.parse::<u8>().ok()?;
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}
