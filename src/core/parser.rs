// DayzWatch - core/parser.rs
//
// Time-of-day extraction for ADM log lines.
// Core layer: never reads the system clock; the calendar date is always
// supplied by the caller so results are reproducible.
//
// A line is timestamped iff its first 8 characters are `HH:MM:SS`. Anything
// else (continuation lines, banners, blank lines) has no timestamp, which is
// an expected outcome rather than an error.

use crate::core::model::TimestampPrefix;
use chrono::{DateTime, LocalResult, NaiveDate, TimeZone};
use regex::Regex;
use std::sync::OnceLock;

fn time_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // ASCII digits only; `\d` would also accept other Unicode digit classes.
    RE.get_or_init(|| {
        Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2})")
            .expect("time prefix regex is a valid literal")
    })
}

/// Read the `HH:MM:SS` prefix of `line`.
///
/// Returns `None` when the line does not start with the pattern or when the
/// digits are not a valid time of day (e.g. `12:61:00`).
pub fn parse_prefix(line: &str) -> Option<TimestampPrefix> {
    let caps = time_prefix_regex().captures(line)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u8>().ok());
    TimestampPrefix::new(field(1)?, field(2)?, field(3)?)
}

/// Every instant the timestamp of `line` can denote on `reference_date` in
/// `tz`: none for untimestamped lines and local times skipped by a DST
/// transition, two for local times repeated by one.
pub fn line_instants<Tz: TimeZone>(
    line: &str,
    reference_date: NaiveDate,
    tz: &Tz,
) -> LocalResult<DateTime<Tz>> {
    let Some(prefix) = parse_prefix(line) else {
        return LocalResult::None;
    };
    let local = reference_date.and_time(prefix.to_naive_time());
    tz.from_local_datetime(&local)
}

/// Resolve the timestamp of `line` against `reference_date` in `tz`.
///
/// The result has a zero sub-second component. Local times skipped by a DST
/// transition yield `None`; repeated local times resolve to the earlier
/// instant.
pub fn parse_line_time<Tz: TimeZone>(
    line: &str,
    reference_date: NaiveDate,
    tz: &Tz,
) -> Option<DateTime<Tz>> {
    line_instants(line, reference_date, tz).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_prefix_valid() {
        let p = parse_prefix("10:15:30 | Player \"Survivor\" is connected").unwrap();
        assert_eq!((p.hour(), p.minute(), p.second()), (10, 15, 30));
    }

    #[test]
    fn test_parse_prefix_requires_line_start() {
        assert!(parse_prefix(" 10:15:30 indented").is_none());
        assert!(parse_prefix("AdminLog started on 2024-01-01 at 10:15:30").is_none());
        assert!(parse_prefix("=== Server shutdown ===").is_none());
        assert!(parse_prefix("").is_none());
    }

    #[test]
    fn test_parse_prefix_requires_two_digit_fields() {
        assert!(parse_prefix("1:15:30 short hour").is_none());
        assert!(parse_prefix("10:15:3").is_none());
        assert!(parse_prefix("10-15-30 dashes").is_none());
    }

    #[test]
    fn test_parse_prefix_invalid_ranges_are_skipped() {
        assert!(parse_prefix("24:00:00 x").is_none());
        assert!(parse_prefix("10:61:00 x").is_none());
        assert!(parse_prefix("10:00:60 x").is_none());
    }

    #[test]
    fn test_parse_prefix_rejects_non_ascii_digits() {
        // Arabic-Indic digits are Unicode `\d` but not a valid ADM timestamp.
        assert!(parse_prefix("١٠:١٥:٣٠ x").is_none());
    }

    #[test]
    fn test_line_time_uses_reference_date_and_ignores_rest() {
        let d = date(2024, 1, 1);
        let a = parse_line_time("10:15:30 Player connected", d, &Utc).unwrap();
        let b = parse_line_time("10:15:30", d, &Utc).unwrap();
        let c = parse_line_time("10:15:30.999 trailing noise 23:59:59", d, &Utc).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!((a.year(), a.month(), a.day()), (2024, 1, 1));
        assert_eq!((a.hour(), a.minute(), a.second()), (10, 15, 30));
        assert_eq!(a.nanosecond(), 0);
    }

    #[test]
    fn test_line_time_is_in_given_zone() {
        let tz = chrono_tz::Europe::Berlin;
        let ts = parse_line_time("12:00:00 x", date(2024, 7, 1), &tz).unwrap();
        // CEST is UTC+2.
        assert_eq!(ts.with_timezone(&Utc).hour(), 10);
        assert_eq!(ts.date_naive(), date(2024, 7, 1));
    }

    #[test]
    fn test_line_time_in_dst_gap_is_none() {
        let tz = chrono_tz::Europe::Berlin;
        // 2024-03-31 02:00-03:00 does not exist in Berlin.
        assert!(parse_line_time("02:30:00 x", date(2024, 3, 31), &tz).is_none());
    }

    #[test]
    fn test_line_time_in_dst_fold_takes_earlier_instant() {
        let tz = chrono_tz::Europe::Berlin;
        // 2024-10-27 02:30 happens twice; the first one is still CEST (+02:00).
        let ts = parse_line_time("02:30:00 x", date(2024, 10, 27), &tz).unwrap();
        assert_eq!(ts.with_timezone(&Utc).hour(), 0);
        assert_eq!(ts.with_timezone(&Utc).minute(), 30);
    }

    #[test]
    fn test_line_instants_in_dst_fold_yield_both_offsets() {
        let tz = chrono_tz::Europe::Berlin;
        match line_instants("02:30:00 x", date(2024, 10, 27), &tz) {
            LocalResult::Ambiguous(first, second) => {
                assert_eq!(first.with_timezone(&Utc).hour(), 0);
                assert_eq!(second.with_timezone(&Utc).hour(), 1);
                assert_eq!(first.naive_local(), second.naive_local());
            }
            other => panic!("expected two instants, got {other:?}"),
        }
    }

    #[test]
    fn test_line_instants_without_prefix_is_none() {
        assert_eq!(
            line_instants("no timestamp", date(2024, 1, 1), &Utc),
            LocalResult::None
        );
    }
}
