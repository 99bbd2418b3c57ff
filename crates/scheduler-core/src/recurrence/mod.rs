//! Recurrence-date engine.
//!
//! Given a reference date ("now"), a task's anchor date and its repeat rule,
//! computes the date the task moves to once it is done. The engine is pure:
//! no I/O, no shared state and no logging, so it can be called from any
//! number of request handlers at once.
//!
//! Rule families (see [`RepeatRule`]):
//!
//! - `d N`: every N days after the anchor (1 <= N <= 400)
//! - `y`: every year on the anchor's month and day
//! - `w 1,4`: on the listed ISO weekdays, counted from the reference date
//! - `m 5,-1`: on the listed days of every month (`-1` last, `-2` penultimate)
//! - `m 5,-1 1,7`: on the listed days of the listed months

pub mod calendar;
mod monthly;
pub mod rule;

use chrono::{Datelike, Days, NaiveDate};

use crate::error::RecurrenceError;

pub use calendar::MonthEnd;
pub use rule::{MonthDay, RepeatRule};

/// Wire format of task dates.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Upper bound on interval additions of a daily rule.
pub const MAX_DAILY_ITERATIONS: u32 = 1000;

/// Parses a fixed-width `YYYYMMDD` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, RecurrenceError> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RecurrenceError::DateSyntax(text.to_string()));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| RecurrenceError::DateSyntax(text.to_string()))
}

/// Renders a date as `YYYYMMDD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Computes the next occurrence of a task as `YYYYMMDD` text.
///
/// `date` is the task's stored anchor date and `repeat` its rule text. The
/// anchor is validated before the rule. The result is always strictly after
/// `now`.
///
/// # Errors
///
/// - [`RecurrenceError::DateSyntax`] if `date` is not a valid `YYYYMMDD` date
/// - [`RecurrenceError::RuleSyntax`] if `repeat` is empty or malformed
/// - [`RecurrenceError::IterationLimitExceeded`] if a daily rule cannot catch
///   up with `now` within [`MAX_DAILY_ITERATIONS`] steps
pub fn next_date(now: NaiveDate, date: &str, repeat: &str) -> Result<String, RecurrenceError> {
    let start = parse_date(date)?;
    let rule: RepeatRule = repeat.parse()?;
    next_occurrence(now, start, &rule).map(format_date)
}

/// Typed form of [`next_date`].
pub fn next_occurrence(
    now: NaiveDate,
    start: NaiveDate,
    rule: &RepeatRule,
) -> Result<NaiveDate, RecurrenceError> {
    match rule {
        RepeatRule::Daily { interval } => next_daily(now, start, *interval),
        RepeatRule::Annual => next_annual(now, start),
        RepeatRule::Weekly { days } => next_weekly(now, days),
        RepeatRule::Monthly {
            days,
            months: Some(months),
        } => monthly::next_in_months(now, start, days, months),
        RepeatRule::Monthly { days, months: None } => monthly::next_in_any_month(now, start, days),
    }
}

fn next_daily(now: NaiveDate, start: NaiveDate, interval: u32) -> Result<NaiveDate, RecurrenceError> {
    let step = Days::new(u64::from(interval));
    let mut date = start;
    for _ in 0..MAX_DAILY_ITERATIONS {
        date = date
            .checked_add_days(step)
            .ok_or(RecurrenceError::DateOutOfRange)?;
        if date > now {
            return Ok(date);
        }
    }
    Err(RecurrenceError::IterationLimitExceeded(MAX_DAILY_ITERATIONS))
}

/// The anchor's anniversary in `year`. Feb 29 falls on Mar 1 in common years.
fn anniversary(start: NaiveDate, year: i32) -> Result<NaiveDate, RecurrenceError> {
    match start.with_year(year) {
        Some(date) => Ok(date),
        None => calendar::ymd(year, 3, 1),
    }
}

fn next_annual(now: NaiveDate, start: NaiveDate) -> Result<NaiveDate, RecurrenceError> {
    // Anniversaries before now's year can never qualify, so skip straight there.
    let mut year = (start.year() + 1).max(now.year());
    loop {
        let date = anniversary(start, year)?;
        if date > now {
            return Ok(date);
        }
        year += 1;
    }
}

/// Weekly rules advance from `now`, not from the anchor.
fn next_weekly(
    now: NaiveDate,
    days: &std::collections::BTreeSet<u32>,
) -> Result<NaiveDate, RecurrenceError> {
    let today = now.weekday().number_from_monday();
    let target = days
        .range(today + 1..)
        .next()
        .or_else(|| days.first())
        .copied()
        .ok_or_else(|| RecurrenceError::RuleSyntax("empty day of week list".to_string()))?;

    let offset = if target > today {
        target - today
    } else {
        target + 7 - today
    };
    now.checked_add_days(Days::new(u64::from(offset)))
        .ok_or(RecurrenceError::DateOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference() -> NaiveDate {
        date(2024, 3, 1)
    }

    mod parse_date_tests {
        use super::*;

        #[test]
        fn test_parse_and_format() {
            let parsed = parse_date("20240229").unwrap();
            assert_eq!(parsed, date(2024, 2, 29));
            assert_eq!(format_date(parsed), "20240229");
        }

        #[rstest]
        #[case("2024-01-01")]
        #[case("20240230")]
        #[case("2024011")]
        #[case("202401011")]
        #[case("+2024011")]
        #[case("")]
        #[case("abcdefgh")]
        #[case("20241301")]
        fn test_rejects_malformed_dates(#[case] text: &str) {
            assert_eq!(
                parse_date(text),
                Err(RecurrenceError::DateSyntax(text.to_string()))
            );
        }
    }

    mod next_date_tests {
        use super::*;

        #[rstest]
        #[case("20240131", "d 7", "20240306")]
        #[case("20240301", "d 1", "20240302")]
        #[case("20240229", "d 1", "20240302")]
        #[case("20230301", "y", "20250301")]
        #[case("20240115", "m -1", "20240331")]
        #[case("20240101", "w 1,3", "20240304")]
        fn test_reference_scenarios(#[case] anchor: &str, #[case] rule: &str, #[case] expected: &str) {
            assert_eq!(next_date(reference(), anchor, rule).unwrap(), expected);
        }

        #[test]
        fn test_empty_rule_is_rule_syntax_error() {
            assert!(matches!(
                next_date(reference(), "20240101", ""),
                Err(RecurrenceError::RuleSyntax(_))
            ));
        }

        #[test]
        fn test_malformed_day_token_is_rule_syntax_error() {
            assert!(matches!(
                next_date(reference(), "20240101", "m abc"),
                Err(RecurrenceError::RuleSyntax(_))
            ));
        }

        #[test]
        fn test_malformed_anchor_is_date_syntax_error() {
            assert_eq!(
                next_date(reference(), "2024-01-01", "d 1"),
                Err(RecurrenceError::DateSyntax("2024-01-01".to_string()))
            );
        }

        #[test]
        fn test_anchor_is_checked_before_rule() {
            assert!(matches!(
                next_date(reference(), "bad", "bogus"),
                Err(RecurrenceError::DateSyntax(_))
            ));
        }
    }

    mod daily_tests {
        use super::*;

        #[test]
        fn test_future_anchor_still_advances_once() {
            let next = next_daily(reference(), date(2024, 5, 1), 3).unwrap();
            assert_eq!(next, date(2024, 5, 4));
        }

        #[test]
        fn test_landing_on_reference_is_not_enough() {
            // 20240223 + 7 = 20240301, which is not strictly after the reference
            let next = next_daily(reference(), date(2024, 2, 23), 7).unwrap();
            assert_eq!(next, date(2024, 3, 8));
        }

        #[test]
        fn test_iteration_limit() {
            let result = next_daily(reference(), date(2000, 1, 1), 1);
            assert_eq!(
                result,
                Err(RecurrenceError::IterationLimitExceeded(MAX_DAILY_ITERATIONS))
            );
        }

        #[test]
        fn test_iteration_limit_is_not_hit_with_large_interval() {
            let next = next_daily(reference(), date(2000, 1, 1), 400).unwrap();
            assert!(next > reference());
        }
    }

    mod annual_tests {
        use super::*;

        #[rstest]
        #[case(date(2024, 3, 2), date(2023, 3, 1), date(2025, 3, 1))]
        #[case(date(2024, 2, 29), date(2023, 3, 1), date(2024, 3, 1))]
        #[case(date(2024, 3, 1), date(2024, 3, 1), date(2025, 3, 1))]
        #[case(date(2024, 3, 1), date(2026, 7, 4), date(2027, 7, 4))]
        #[case(date(2024, 3, 1), date(1990, 12, 31), date(2024, 12, 31))]
        fn test_next_annual(#[case] now: NaiveDate, #[case] start: NaiveDate, #[case] expected: NaiveDate) {
            assert_eq!(next_annual(now, start).unwrap(), expected);
        }

        #[test]
        fn test_leap_day_rolls_to_march_first_in_common_years() {
            assert_eq!(
                next_annual(date(2024, 3, 1), date(2024, 2, 29)).unwrap(),
                date(2025, 3, 1)
            );
        }

        #[test]
        fn test_leap_day_returns_in_leap_years() {
            assert_eq!(
                next_annual(date(2027, 3, 5), date(2024, 2, 29)).unwrap(),
                date(2028, 2, 29)
            );
        }
    }

    mod weekly_tests {
        use super::*;

        fn days(list: &[u32]) -> std::collections::BTreeSet<u32> {
            list.iter().copied().collect()
        }

        #[test]
        fn test_wraps_to_next_week() {
            // 2024-03-07 is a Thursday
            let next = next_weekly(date(2024, 3, 7), &days(&[1, 3])).unwrap();
            assert_eq!(next, date(2024, 3, 11));
        }

        #[test]
        fn test_picks_nearest_later_day_this_week() {
            // 2024-03-05 is a Tuesday
            let next = next_weekly(date(2024, 3, 5), &days(&[1, 4, 6])).unwrap();
            assert_eq!(next, date(2024, 3, 7));
        }

        #[test]
        fn test_same_weekday_only_moves_a_full_week() {
            // 2024-03-06 is a Wednesday
            let next = next_weekly(date(2024, 3, 6), &days(&[3])).unwrap();
            assert_eq!(next, date(2024, 3, 13));
        }

        #[test]
        fn test_sunday_reference() {
            // 2024-03-10 is a Sunday
            let next = next_weekly(date(2024, 3, 10), &days(&[7])).unwrap();
            assert_eq!(next, date(2024, 3, 17));
        }

        #[test]
        fn test_ignores_anchor_date() {
            let rule: RepeatRule = "w 2".parse().unwrap();
            let early = next_occurrence(reference(), date(2020, 1, 1), &rule).unwrap();
            let late = next_occurrence(reference(), date(2030, 6, 15), &rule).unwrap();
            assert_eq!(early, late);
            assert_eq!(early, date(2024, 3, 5));
        }
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (1990i32..2060, 1u32..=12, 1u32..=31)
            .prop_filter_map("real calendar day", |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
    }

    fn arb_rule() -> impl Strategy<Value = String> {
        prop_oneof![
            (1u32..=400).prop_map(|n| format!("d {}", n)),
            Just("y".to_string()),
            proptest::collection::vec(1u32..=7, 1..5)
                .prop_map(|d| format!("w {}", d.iter().map(u32::to_string).collect::<Vec<_>>().join(","))),
            proptest::collection::vec(prop_oneof![Just(-2i32), Just(-1), 1i32..=31], 1..4)
                .prop_map(|d| format!("m {}", d.iter().map(i32::to_string).collect::<Vec<_>>().join(","))),
            // end tokens next to days that some months lack
            proptest::collection::vec(prop_oneof![Just(-2i32), Just(-1), 28i32..=31], 1..4)
                .prop_map(|d| format!("m {}", d.iter().map(i32::to_string).collect::<Vec<_>>().join(","))),
            (
                proptest::collection::vec(prop_oneof![Just(-2i32), Just(-1), 1i32..=31], 1..4),
                proptest::collection::vec(1u32..=12, 1..4)
            )
                .prop_map(|(d, m)| format!(
                    "m {} {}",
                    d.iter().map(i32::to_string).collect::<Vec<_>>().join(","),
                    m.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
                )),
        ]
    }

    proptest! {
        #[test]
        fn prop_result_is_after_reference(now in arb_date(), start in arb_date(), rule in arb_rule()) {
            match next_date(now, &format_date(start), &rule) {
                Ok(next) => prop_assert!(parse_date(&next).unwrap() > now),
                Err(e) => prop_assert_eq!(e, RecurrenceError::IterationLimitExceeded(MAX_DAILY_ITERATIONS)),
            }
        }

        #[test]
        fn prop_daily_is_smallest_multiple_after_reference(
            now in arb_date(),
            start in arb_date(),
            interval in 1u32..=400,
        ) {
            if let Ok(next) = next_daily(now, start, interval) {
                let elapsed = (next - start).num_days();
                prop_assert!(elapsed > 0);
                prop_assert_eq!(elapsed % i64::from(interval), 0);
                prop_assert!(next - chrono::Duration::days(i64::from(interval)) <= now
                    || elapsed == i64::from(interval));
            }
        }

        #[test]
        fn prop_weekly_ignores_anchor(
            now in arb_date(),
            a in arb_date(),
            b in arb_date(),
            days in proptest::collection::btree_set(1u32..=7, 1..7),
        ) {
            let rule = RepeatRule::Weekly { days };
            prop_assert_eq!(
                next_occurrence(now, a, &rule).unwrap(),
                next_occurrence(now, b, &rule).unwrap()
            );
        }

        #[test]
        fn prop_parsing_is_idempotent(now in arb_date(), start in arb_date(), text in arb_rule()) {
            let first: RepeatRule = text.parse().unwrap();
            let second: RepeatRule = text.parse().unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(
                next_occurrence(now, start, &first),
                next_occurrence(now, start, &second)
            );
        }

        #[test]
        fn prop_annual_keeps_month_and_day(now in arb_date(), start in arb_date()) {
            let next = next_annual(now, start).unwrap();
            prop_assert!(next > now);
            prop_assert!(next.year() > start.year());
            if (start.month(), start.day()) == (2, 29) && NaiveDate::from_ymd_opt(next.year(), 2, 29).is_none() {
                prop_assert_eq!((next.month(), next.day()), (3, 1));
            } else {
                prop_assert_eq!((next.month(), next.day()), (start.month(), start.day()));
            }
            prop_assert!(anniversary(start, next.year() - 1).unwrap() <= now || next.year() - 1 == start.year());
        }
    }
}
