// Date, time-of-day and time-block parsing
// All values are naive local wall-clock times; no timezone handling.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use crate::error::{TimeEndpoint, ValidationError};
use crate::models::TimeBlock;

/// Shortest accepted time block, in minutes
pub const MIN_BLOCK_MINUTES: i64 = 10;

/// Accepted date/time formats, tried in order.
/// (format, has time of day, has year)
const DATE_TIME_FORMATS: [(&str, bool, bool); 4] = [
    ("%Y-%m-%d %H:%M", true, true),
    ("%Y-%m-%d", false, true),
    ("%m-%d %H:%M", true, false),
    ("%m-%d", false, false),
];

/// Check for a strict 24-hour `HH:MM` value (zero padded, 00:00 to 23:59)
pub fn validate_time_of_day(text: &str) -> bool {
    parse_time_of_day(text).is_some()
}

fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let bytes = text.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 2 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveTime::parse_from_str(text, "%H:%M").ok()
}

/// Validate a time block given as two `HH:MM` strings.
///
/// Checks run in order: start format, end format, ordering, then minimum
/// duration. A block of exactly [`MIN_BLOCK_MINUTES`] is accepted.
pub fn validate_time_block(start_text: &str, end_text: &str) -> Result<(), ValidationError> {
    time_block_bounds(start_text, end_text).map(|_| ())
}

fn time_block_bounds(
    start_text: &str,
    end_text: &str,
) -> Result<(NaiveTime, NaiveTime), ValidationError> {
    let start = parse_time_of_day(start_text).ok_or_else(|| ValidationError::InvalidTimeFormat {
        endpoint: TimeEndpoint::Start,
        value: start_text.to_string(),
    })?;
    let end = parse_time_of_day(end_text).ok_or_else(|| ValidationError::InvalidTimeFormat {
        endpoint: TimeEndpoint::End,
        value: end_text.to_string(),
    })?;

    if start >= end {
        return Err(ValidationError::StartNotBeforeEnd);
    }

    let minutes = (end - start).num_minutes();
    if minutes < MIN_BLOCK_MINUTES {
        return Err(ValidationError::BlockTooShort {
            minutes,
            minimum: MIN_BLOCK_MINUTES,
        });
    }

    Ok((start, end))
}

/// Parse a date/time using the current local year for year-less formats.
///
/// Returns `None` when no format matches; malformed input never panics.
pub fn parse_date_time(text: &str, expect_time_of_day: bool) -> Option<NaiveDateTime> {
    parse_date_time_in_year(text, expect_time_of_day, Local::now().year())
}

/// Parse a date/time, filling in `year` for the `MM-DD` formats.
///
/// With `expect_time_of_day` only the formats carrying `HH:MM` are tried,
/// otherwise only the date-only formats (which resolve to midnight).
pub fn parse_date_time_in_year(
    text: &str,
    expect_time_of_day: bool,
    year: i32,
) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .filter(|(_, has_time, _)| *has_time == expect_time_of_day)
        .find_map(|&(format, has_time, has_year)| {
            let (input, format) = if has_year {
                (text.to_string(), format.to_string())
            } else {
                (format!("{}-{}", year, text), format!("%Y-{}", format))
            };

            if has_time {
                NaiveDateTime::parse_from_str(&input, &format).ok()
            } else {
                NaiveDate::parse_from_str(&input, &format)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            }
        })
}

/// Parse a deadline, which may or may not carry a time of day
pub fn parse_deadline(text: &str) -> Result<NaiveDateTime, ValidationError> {
    let text = text.trim();
    parse_date_time(text, true)
        .or_else(|| parse_date_time(text, false))
        .ok_or_else(|| ValidationError::InvalidDate(text.to_string()))
}

/// Parse a `HH:MM-HH:MM` time block and anchor it on `day`
pub fn parse_time_range(text: &str, day: NaiveDate) -> Result<TimeBlock, ValidationError> {
    let (start_text, end_text) = text
        .split_once('-')
        .ok_or_else(|| ValidationError::MissingSeparator(text.trim().to_string()))?;

    let (start, end) = time_block_bounds(start_text.trim(), end_text.trim())?;
    Ok(TimeBlock::new(day.and_time(start), day.and_time(end)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_validate_time_of_day() {
        assert!(validate_time_of_day("00:00"));
        assert!(validate_time_of_day("09:05"));
        assert!(validate_time_of_day("23:59"));
        assert!(!validate_time_of_day("24:00"));
        assert!(!validate_time_of_day("12:60"));
        assert!(!validate_time_of_day("9:05"));
        assert!(!validate_time_of_day("09:5"));
        assert!(!validate_time_of_day("0905"));
        assert!(!validate_time_of_day("ab:cd"));
        assert!(!validate_time_of_day(" 09:05"));
        assert!(!validate_time_of_day(""));
    }

    #[test]
    fn test_validate_time_block_boundaries() {
        assert_eq!(
            validate_time_block("14:00", "14:05"),
            Err(ValidationError::BlockTooShort { minutes: 5, minimum: 10 })
        );
        assert_eq!(
            validate_time_block("14:05", "14:00"),
            Err(ValidationError::StartNotBeforeEnd)
        );
        assert_eq!(
            validate_time_block("14:00", "14:00"),
            Err(ValidationError::StartNotBeforeEnd)
        );
        assert_eq!(validate_time_block("14:00", "14:10"), Ok(()));
        assert_eq!(validate_time_block("14:00", "15:30"), Ok(()));
    }

    #[test]
    fn test_validate_time_block_reports_bad_side() {
        match validate_time_block("2pm", "15:00") {
            Err(ValidationError::InvalidTimeFormat { endpoint, value }) => {
                assert_eq!(endpoint, TimeEndpoint::Start);
                assert_eq!(value, "2pm");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        match validate_time_block("14:00", "25:00") {
            Err(ValidationError::InvalidTimeFormat { endpoint, .. }) => {
                assert_eq!(endpoint, TimeEndpoint::End);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_date_time_with_time() {
        assert_eq!(
            parse_date_time_in_year("2026-01-10 14:30", true, 2030),
            Some(dt(2026, 1, 10, 14, 30))
        );
        assert_eq!(
            parse_date_time_in_year("01-10 14:30", true, 2030),
            Some(dt(2030, 1, 10, 14, 30))
        );
        // Date-only input is not accepted when a time is expected
        assert_eq!(parse_date_time_in_year("2026-01-10", true, 2030), None);
    }

    #[test]
    fn test_parse_date_time_date_only() {
        assert_eq!(
            parse_date_time_in_year("2026-12-31", false, 2030),
            Some(dt(2026, 12, 31, 0, 0))
        );
        assert_eq!(
            parse_date_time_in_year("12-31", false, 2030),
            Some(dt(2030, 12, 31, 0, 0))
        );
        assert_eq!(parse_date_time_in_year("2026-01-10 14:30", false, 2030), None);
    }

    #[test]
    fn test_parse_date_time_rejects_garbage() {
        for input in ["", "tomorrow", "2026-13-01", "02-30", "2026/01/10", "12-31 25:00"] {
            assert_eq!(parse_date_time_in_year(input, false, 2026), None, "{}", input);
            assert_eq!(parse_date_time_in_year(input, true, 2026), None, "{}", input);
        }
    }

    #[test]
    fn test_parse_date_time_leap_day_depends_on_year() {
        assert!(parse_date_time_in_year("02-29", false, 2028).is_some());
        assert!(parse_date_time_in_year("02-29", false, 2027).is_none());
    }

    #[test]
    fn test_parse_deadline_accepts_both_shapes() {
        assert_eq!(parse_deadline("2026-05-01").unwrap(), dt(2026, 5, 1, 0, 0));
        assert_eq!(parse_deadline(" 2026-05-01 17:00 ").unwrap(), dt(2026, 5, 1, 17, 0));
        assert_eq!(
            parse_deadline("someday"),
            Err(ValidationError::InvalidDate("someday".to_string()))
        );
    }

    #[test]
    fn test_parse_time_range() {
        let day = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        let block = parse_time_range("14:00 - 15:30", day).unwrap();
        assert_eq!(block.start, dt(2026, 4, 2, 14, 0));
        assert_eq!(block.end, dt(2026, 4, 2, 15, 30));

        assert_eq!(
            parse_time_range("14:00", day),
            Err(ValidationError::MissingSeparator("14:00".to_string()))
        );
        assert_eq!(
            parse_time_range("14:00-14:09", day),
            Err(ValidationError::BlockTooShort { minutes: 9, minimum: 10 })
        );
    }
}
