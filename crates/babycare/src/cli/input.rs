//! Parsing of date, time, and duration arguments.
//!
//! These take the current date or time explicitly so the handlers and the
//! tests agree on what "today" means.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;

use crate::error::{Error, Result};

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<hours>\d+)h)?(?:(?P<minutes>\d+)m?)?$")
        .expect("Invalid duration pattern")
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a calendar date: `YYYY-MM-DD`, `today`, or `yesterday`.
///
/// # Errors
///
/// Returns [`Error::InvalidTime`] if the input matches none of these.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let trimmed = input.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => {
            return today.pred_opt().ok_or_else(|| invalid_time(input));
        }
        _ => {}
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid_time(input))
}

/// Resolve an optional `--at` style argument to a wall-clock time.
///
/// `None` means `now`. A bare `HH:MM` is taken on `now`'s date. Seconds and
/// sub-seconds of `now` are dropped so records line up on whole minutes.
///
/// # Errors
///
/// Returns [`Error::InvalidTime`] if the input cannot be parsed.
pub fn resolve_time(input: Option<&str>, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let Some(input) = input else {
        return Ok(now
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now));
    };
    let trimmed = input.trim();

    if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M") {
        return Ok(now.date().and_time(time));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| invalid_time(input))
}

/// Parse a duration: plain minutes (`90`), `90m`, `1h`, or `1h30m`.
///
/// # Errors
///
/// Returns [`Error::InvalidDuration`] if the input is empty or malformed.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let invalid = || Error::InvalidDuration {
        input: input.to_string(),
    };

    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.to_ascii_lowercase();
    if compact.is_empty() {
        return Err(invalid());
    }

    let captures = DURATION_PATTERN.captures(&compact).ok_or_else(invalid)?;

    let number = |name: &str| -> Result<Option<i64>> {
        captures
            .name(name)
            .map(|m| m.as_str().parse::<i64>().map_err(|_| invalid()))
            .transpose()
    };
    let hours = number("hours")?;
    let minutes = number("minutes")?;
    if hours.is_none() && minutes.is_none() {
        return Err(invalid());
    }

    let total = hours
        .unwrap_or(0)
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes.unwrap_or(0)))
        .ok_or_else(invalid)?;
    Duration::try_minutes(total).ok_or_else(invalid)
}

/// Parse a duration and add it to `start`.
///
/// # Errors
///
/// Returns [`Error::InvalidDuration`] if the input is malformed or the end
/// time falls outside the representable range.
pub fn end_after(start: NaiveDateTime, input: &str) -> Result<NaiveDateTime> {
    let duration = parse_duration(input)?;
    start
        .checked_add_signed(duration)
        .ok_or_else(|| Error::InvalidDuration {
            input: input.to_string(),
        })
}

fn invalid_time(input: &str) -> Error {
    Error::InvalidTime {
        input: input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(14, 42, 17)
            .unwrap()
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_date() {
        let today = now().date();
        assert_eq!(
            parse_date("2024-01-31", today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
        assert_eq!(parse_date("today", today).unwrap(), today);
        assert_eq!(
            parse_date("Yesterday", today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
        );
    }

    #[test]
    fn test_parse_date_invalid() {
        let today = now().date();
        for input in ["2024-02-30", "03/15/2024", "", "tomorrow"] {
            let err = parse_date(input, today).unwrap_err();
            assert!(matches!(err, Error::InvalidTime { .. }), "{input}");
        }
    }

    #[test]
    fn test_resolve_time_defaults_to_now_on_the_minute() {
        assert_eq!(resolve_time(None, now()).unwrap(), at(15, 14, 42));
    }

    #[test]
    fn test_resolve_time_formats() {
        assert_eq!(resolve_time(Some("08:30"), now()).unwrap(), at(15, 8, 30));
        assert_eq!(
            resolve_time(Some("2024-03-10T21:05"), now()).unwrap(),
            at(10, 21, 5)
        );
        assert_eq!(
            resolve_time(Some("2024-03-10 21:05"), now()).unwrap(),
            at(10, 21, 5)
        );
        assert_eq!(
            resolve_time(Some(" 2024-03-10T21:05:00 "), now()).unwrap(),
            at(10, 21, 5)
        );
    }

    #[test]
    fn test_resolve_time_invalid() {
        for input in ["25:00", "8.30", "2024-03-10", "noon"] {
            let err = resolve_time(Some(input), now()).unwrap_err();
            assert!(err.is_user_error(), "{input}");
        }
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("90").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("90m").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("1h").unwrap(), Duration::minutes(60));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("1H 30M").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("2h5").unwrap(), Duration::minutes(125));
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        for input in ["99999999999999999m", "9999999999999999h"] {
            let err = parse_duration(input).unwrap_err();
            assert!(matches!(err, Error::InvalidDuration { .. }), "{input}");
        }
    }

    #[test]
    fn test_end_after() {
        assert_eq!(end_after(at(15, 8, 30), "1h45m").unwrap(), at(15, 10, 15));
        assert_eq!(end_after(at(15, 23, 0), "90").unwrap(), at(16, 0, 30));
    }

    #[test]
    fn test_end_after_out_of_range() {
        // Representable as a duration but past the last NaiveDateTime.
        let err = end_after(NaiveDateTime::MAX, "1m").unwrap_err();
        assert!(matches!(err, Error::InvalidDuration { .. }));

        let err = end_after(at(15, 8, 30), "99999999999999999m").unwrap_err();
        assert!(matches!(err, Error::InvalidDuration { .. }));
    }

    #[test]
    fn test_parse_duration_invalid() {
        for input in ["", "h", "m", "abc", "1.5h", "-10", "30m1h"] {
            let err = parse_duration(input).unwrap_err();
            assert!(matches!(err, Error::InvalidDuration { .. }), "{input}");
        }
    }
}
