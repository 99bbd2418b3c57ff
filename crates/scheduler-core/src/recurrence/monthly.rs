//! Evaluation of `m` rules.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use super::calendar::{following_month, last_or_penultimate_day, month_length, ymd};
use super::rule::MonthDay;
use crate::error::RecurrenceError;

fn empty_day_list() -> RecurrenceError {
    RecurrenceError::RuleSyntax("empty day of month list".to_string())
}

/// Resolves `day` in the given month. A positive day past the end of the
/// month spills into the same day of the following month.
fn resolve_with_spill(year: i32, month: u32, day: MonthDay) -> Result<NaiveDate, RecurrenceError> {
    match day {
        MonthDay::End(which) => last_or_penultimate_day(year, month, which),
        MonthDay::Day(day) => {
            let (year, month) = if day > month_length(year, month)? {
                following_month(year, month)
            } else {
                (year, month)
            };
            ymd(year, month, day)
        }
    }
}

/// Resolves `day` in the given month, or `None` if the month is too short.
fn resolve_within(year: i32, month: u32, day: MonthDay) -> Result<Option<NaiveDate>, RecurrenceError> {
    match day {
        MonthDay::End(which) => last_or_penultimate_day(year, month, which).map(Some),
        MonthDay::Day(day) => Ok(NaiveDate::from_ymd_opt(year, month, day)),
    }
}

/// Earliest rule day in `after`'s month that is strictly later than `after`.
fn first_after_in_month(after: NaiveDate, days: &[MonthDay]) -> Result<Option<NaiveDate>, RecurrenceError> {
    let mut earliest: Option<NaiveDate> = None;
    for &day in days {
        let Some(date) = resolve_within(after.year(), after.month(), day)? else {
            continue;
        };
        if date > after && earliest.map_or(true, |current| date < current) {
            earliest = Some(date);
        }
    }
    Ok(earliest)
}

/// The day a days-only rule lands on when it enters a new month: the smallest
/// day number that exists in the month, else the earliest of `-1`/`-2`.
fn month_floor(year: i32, month: u32, days: &[MonthDay]) -> Result<Option<NaiveDate>, RecurrenceError> {
    let length = month_length(year, month)?;
    let smallest_day = days
        .iter()
        .filter_map(|day| match day {
            MonthDay::Day(day) if *day <= length => Some(*day),
            _ => None,
        })
        .min();
    if let Some(day) = smallest_day {
        return ymd(year, month, day).map(Some);
    }

    let mut earliest: Option<NaiveDate> = None;
    for &day in days {
        if let MonthDay::End(which) = day {
            let date = last_or_penultimate_day(year, month, which)?;
            if earliest.map_or(true, |current| date < current) {
                earliest = Some(date);
            }
        }
    }
    Ok(earliest)
}

/// Floor of the first month after `date`'s month that has one.
fn floor_after_month_of(date: NaiveDate, days: &[MonthDay]) -> Result<NaiveDate, RecurrenceError> {
    let (mut year, mut month) = following_month(date.year(), date.month());
    // Of two consecutive months one has 31 days, and every rule day fits there.
    for _ in 0..2 {
        if let Some(found) = month_floor(year, month, days)? {
            return Ok(found);
        }
        (year, month) = following_month(year, month);
    }
    Err(empty_day_list())
}

/// `m <days> <months>`: earliest listed (month, day) of the reference year
/// after both `now` and `start`, else the earliest of the following year.
pub(super) fn next_in_months(
    now: NaiveDate,
    start: NaiveDate,
    days: &[MonthDay],
    months: &BTreeSet<u32>,
) -> Result<NaiveDate, RecurrenceError> {
    let mut candidates = Vec::with_capacity(days.len() * months.len());
    for &month in months {
        for &day in days {
            let date = resolve_with_spill(now.year(), month, day)?;
            if date > now && date > start {
                candidates.push(date);
            }
        }
    }

    if candidates.is_empty() {
        let year = now.year() + 1;
        for &month in months {
            for &day in days {
                candidates.push(resolve_with_spill(year, month, day)?);
            }
        }
    }

    candidates.sort();
    candidates.first().copied().ok_or_else(empty_day_list)
}

/// `m <days>`: the rule day closest after the anchor; if that is not after
/// `now`, the closest rule day after `now` instead. Moving into a new month
/// lands on that month's floor.
pub(super) fn next_in_any_month(
    now: NaiveDate,
    start: NaiveDate,
    days: &[MonthDay],
) -> Result<NaiveDate, RecurrenceError> {
    let closest_to_start = match first_after_in_month(start, days)? {
        Some(date) => date,
        None => floor_after_month_of(start, days)?,
    };
    if closest_to_start > now {
        return Ok(closest_to_start);
    }

    match first_after_in_month(now, days)? {
        Some(date) => Ok(date),
        None => floor_after_month_of(now, days),
    }
}
