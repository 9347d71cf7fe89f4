// DayzWatch - core/window.rs
//
// Previous-minute extraction.
//
// A tick firing anywhere inside minute M collects the lines stamped in
// minute M-1, since minute M may still be receiving writes. Every line of a
// single call is dated with the *window start's* calendar date, so a tick at
// 00:00:30 attributes 23:59:xx lines to the day before.

use crate::core::filter::IgnoreRuleSet;
use crate::core::model::LogWindow;
use crate::core::parser;
use crate::util::constants::WINDOW_MINUTES;
use crate::util::logging;
use chrono::{DateTime, LocalResult, TimeDelta, TimeZone, Timelike};

/// Compute `[since, until)` for a tick observed at `now`.
///
/// `since` is `now` truncated to the minute, minus one minute.
pub fn window_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
    let width = TimeDelta::minutes(WINDOW_MINUTES);
    let into_minute = TimeDelta::seconds(i64::from(now.second()))
        + TimeDelta::nanoseconds(i64::from(now.nanosecond()));
    let since = now.clone() - into_minute - width;
    let until = since.clone() + width;
    (since, until)
}

/// Collect the lines of `lines` that fall in the window preceding `now`.
///
/// Ignored lines and lines without a timestamp are skipped. The original
/// text of each kept line is returned in input order. Returns `None` when
/// nothing matched.
pub fn extract<Tz, I, S>(
    rules: &IgnoreRuleSet,
    lines: I,
    now: &DateTime<Tz>,
) -> Option<LogWindow<Tz>>
where
    Tz: TimeZone,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (since, until) = window_bounds(now);
    let reference_date = since.date_naive();
    let tz = since.timezone();

    tracing::debug!(
        since = %since.naive_local(),
        until = %until.naive_local(),
        "Collecting log lines"
    );

    let collected: Vec<String> = lines
        .into_iter()
        .filter_map(|line| {
            let line = line.as_ref();
            if rules.is_ignored(line) {
                return None;
            }
            let in_window = |ts: &DateTime<Tz>| since <= *ts && *ts < until;
            // A local time repeated by a DST fold belongs to the window if
            // either of its instants does.
            let hit = match parser::line_instants(line, reference_date, &tz) {
                LocalResult::Single(ts) => in_window(&ts),
                LocalResult::Ambiguous(first, second) => in_window(&first) || in_window(&second),
                LocalResult::None => false,
            };
            if !hit {
                return None;
            }
            tracing::trace!(line = logging::preview(line), "Line in window");
            Some(line.to_string())
        })
        .collect();

    if collected.is_empty() {
        tracing::info!("No log lines found for target minute");
        return None;
    }

    tracing::info!(lines = collected.len(), "Collected log lines for analysis");
    Some(LogWindow {
        since,
        until,
        lines: collected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn sample_lines() -> Vec<&'static str> {
        vec![
            "10:15:30 Player connected",
            "10:15:45 [BAD] kicked",
            "10:16:02 Player disconnected",
        ]
    }

    #[test]
    fn test_window_bounds_previous_full_minute() {
        let (since, until) = window_bounds(&at(2024, 1, 1, 10, 16, 10));
        assert_eq!(since, at(2024, 1, 1, 10, 15, 0));
        assert_eq!(until, at(2024, 1, 1, 10, 16, 0));
    }

    #[test]
    fn test_window_bounds_on_exact_minute() {
        let (since, until) = window_bounds(&at(2024, 1, 1, 10, 16, 0));
        assert_eq!(since, at(2024, 1, 1, 10, 15, 0));
        assert_eq!(until, at(2024, 1, 1, 10, 16, 0));
    }

    #[test]
    fn test_window_bounds_drop_sub_second() {
        let now = at(2024, 1, 1, 10, 16, 59) + TimeDelta::milliseconds(999);
        let (since, _) = window_bounds(&now);
        assert_eq!(since, at(2024, 1, 1, 10, 15, 0));
        assert_eq!(since.nanosecond(), 0);
    }

    #[test]
    fn test_window_is_always_one_whole_minute() {
        let start = at(2024, 2, 28, 22, 58, 0);
        for step in 0..400 {
            let now = start + TimeDelta::seconds(step * 17) + TimeDelta::milliseconds(step * 3);
            let (since, until) = window_bounds(&now);
            assert_eq!(until.clone() - since.clone(), TimeDelta::minutes(1));
            assert_eq!(since.second(), 0);
            assert_eq!(since.nanosecond(), 0);
            assert!(until <= now);
        }
    }

    #[test]
    fn test_extract_keeps_previous_minute_only() {
        let window = extract(
            &IgnoreRuleSet::default(),
            sample_lines(),
            &at(2024, 1, 1, 10, 16, 10),
        )
        .expect("window");
        assert_eq!(window.since, at(2024, 1, 1, 10, 15, 0));
        assert_eq!(window.until, at(2024, 1, 1, 10, 16, 0));
        assert_eq!(
            window.lines,
            vec!["10:15:30 Player connected", "10:15:45 [BAD] kicked"]
        );
    }

    #[test]
    fn test_extract_applies_ignore_rules() {
        let window = extract(
            &IgnoreRuleSet::new(["BAD"]),
            sample_lines(),
            &at(2024, 1, 1, 10, 16, 10),
        )
        .expect("window");
        assert_eq!(window.lines, vec!["10:15:30 Player connected"]);
    }

    #[test]
    fn test_ignored_lines_never_extracted_whatever_their_time() {
        let rules = IgnoreRuleSet::new(["Chat"]);
        let lines = ["10:15:00 Chat(\"a\")", "10:15:59 Chat(\"b\")", "Chat"];
        assert!(extract(&rules, lines, &at(2024, 1, 1, 10, 16, 0)).is_none());
    }

    #[test]
    fn test_untimestamped_lines_are_excluded() {
        let lines = [
            "=== Server shutdown ===",
            "",
            "   continuation of a previous entry",
            "10:15:10 Player connected",
        ];
        let window = extract(&IgnoreRuleSet::default(), lines, &at(2024, 1, 1, 10, 16, 0))
            .expect("window");
        assert_eq!(window.lines, vec!["10:15:10 Player connected"]);
    }

    #[test]
    fn test_extract_none_when_nothing_matches() {
        let lines = ["10:14:59 too early", "10:16:00 too late"];
        assert!(extract(&IgnoreRuleSet::default(), lines, &at(2024, 1, 1, 10, 16, 30)).is_none());
        let empty: Vec<String> = Vec::new();
        assert!(extract(&IgnoreRuleSet::default(), empty, &at(2024, 1, 1, 10, 16, 30)).is_none());
    }

    #[test]
    fn test_extract_boundaries_are_half_open() {
        let lines = ["10:15:00 first second", "10:15:59 last second", "10:16:00 next minute"];
        let window = extract(&IgnoreRuleSet::default(), lines, &at(2024, 1, 1, 10, 16, 5))
            .expect("window");
        assert_eq!(window.lines, vec!["10:15:00 first second", "10:15:59 last second"]);
    }

    #[test]
    fn test_extract_midnight_rollover_uses_window_date() {
        let lines = ["23:59:10 late evening", "00:00:05 just after midnight"];
        let now = at(2024, 1, 2, 0, 0, 30);
        let window = extract(&IgnoreRuleSet::default(), lines, &now).expect("window");
        assert_eq!(window.since, at(2024, 1, 1, 23, 59, 0));
        assert_eq!(window.until, at(2024, 1, 2, 0, 0, 0));
        assert_eq!(window.lines, vec!["23:59:10 late evening"]);
        assert_eq!(
            window.since.date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_extract_is_idempotent() {
        let rules = IgnoreRuleSet::new(["BAD"]);
        let lines: Vec<String> = sample_lines().into_iter().map(String::from).collect();
        let now = at(2024, 1, 1, 10, 16, 10);
        let first = extract(&rules, &lines, &now);
        let second = extract(&rules, &lines, &now);
        assert_eq!(first, second);
        // Another instant inside the same minute selects the same window.
        let later = extract(&rules, &lines, &at(2024, 1, 1, 10, 16, 55));
        assert_eq!(first, later);
    }

    #[test]
    fn test_extract_in_named_zone() {
        let tz = chrono_tz::America::New_York;
        let now = tz.with_ymd_and_hms(2024, 6, 1, 10, 16, 10).unwrap();
        let window = extract(&IgnoreRuleSet::default(), sample_lines(), &now).expect("window");
        assert_eq!(window.since, tz.with_ymd_and_hms(2024, 6, 1, 10, 15, 0).unwrap());
        assert_eq!(window.lines.len(), 2);
    }

    #[test]
    fn test_extract_keeps_lines_in_both_passes_of_dst_fold() {
        // Berlin repeats 02:00-03:00 on 2024-10-27 (CEST, then CET).
        let tz = chrono_tz::Europe::Berlin;
        let lines = ["02:30:15 Player connected", "02:30:40 Player disconnected"];

        let first_pass = Utc.with_ymd_and_hms(2024, 10, 27, 0, 31, 10).unwrap();
        let window = extract(&IgnoreRuleSet::default(), lines, &first_pass.with_timezone(&tz))
            .expect("window in CEST pass");
        assert_eq!(window.lines.len(), 2);

        let second_pass = Utc.with_ymd_and_hms(2024, 10, 27, 1, 31, 10).unwrap();
        let window = extract(&IgnoreRuleSet::default(), lines, &second_pass.with_timezone(&tz))
            .expect("window in CET pass");
        assert_eq!(window.since.naive_local().to_string(), "2024-10-27 02:30:00");
        assert_eq!(window.lines, lines.to_vec());
    }

    #[test]
    fn test_extract_window_straddling_dst_fold() {
        // Window 02:59 CEST .. 02:00 CET: the last minute before clocks go back.
        let tz = chrono_tz::Europe::Berlin;
        let now = Utc.with_ymd_and_hms(2024, 10, 27, 1, 0, 10).unwrap().with_timezone(&tz);
        let lines = ["02:59:30 last CEST minute", "02:00:05 first CET minute"];
        let window = extract(&IgnoreRuleSet::default(), lines, &now).expect("window");
        assert_eq!(window.lines, vec!["02:59:30 last CEST minute"]);
    }
}
