//! Month arithmetic shared by the rule evaluators.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::RecurrenceError;

/// Which end-of-month day a negative rule token refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MonthEnd {
    /// `-1`
    Last,
    /// `-2`
    Penultimate,
}

/// Builds a date, mapping chrono's `None` to [`RecurrenceError::DateOutOfRange`].
pub(crate) fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, RecurrenceError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(RecurrenceError::DateOutOfRange)
}

/// `(year, month)` of the calendar month after the given one.
pub(crate) fn following_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn first_of_following_month(year: i32, month: u32) -> Result<NaiveDate, RecurrenceError> {
    let (year, month) = following_month(year, month);
    ymd(year, month, 1)
}

/// Number of days in `date`'s month: the day before the first of the next month.
pub fn days_in_month(date: NaiveDate) -> Result<u32, RecurrenceError> {
    month_length(date.year(), date.month())
}

/// Number of days in the given month.
pub fn month_length(year: i32, month: u32) -> Result<u32, RecurrenceError> {
    Ok(last_or_penultimate_day(year, month, MonthEnd::Last)?.day())
}

/// Last or second-to-last calendar day of a month.
pub fn last_or_penultimate_day(
    year: i32,
    month: u32,
    which: MonthEnd,
) -> Result<NaiveDate, RecurrenceError> {
    let back = match which {
        MonthEnd::Last => 1,
        MonthEnd::Penultimate => 2,
    };
    first_of_following_month(year, month)?
        .checked_sub_days(Days::new(back))
        .ok_or(RecurrenceError::DateOutOfRange)
}
