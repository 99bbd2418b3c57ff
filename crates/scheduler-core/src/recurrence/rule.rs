use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::RecurrenceError;
use crate::recurrence::calendar::MonthEnd;

/// Longest accepted interval of a daily rule.
pub const MAX_DAILY_INTERVAL: u32 = 400;

/// A day token of a monthly rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthDay {
    /// A fixed day number, 1..=31.
    Day(u32),
    /// `-1` or `-2`.
    End(MonthEnd),
}

impl MonthDay {
    fn parse(token: &str) -> Result<Self, RecurrenceError> {
        match token.parse::<i32>() {
            Ok(-1) => Ok(MonthDay::End(MonthEnd::Last)),
            Ok(-2) => Ok(MonthDay::End(MonthEnd::Penultimate)),
            Ok(day @ 1..=31) => Ok(MonthDay::Day(day.unsigned_abs())),
            _ => Err(RecurrenceError::RuleSyntax(format!(
                "invalid day of month '{}'",
                token
            ))),
        }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthDay::Day(day) => write!(f, "{}", day),
            MonthDay::End(MonthEnd::Last) => write!(f, "-1"),
            MonthDay::End(MonthEnd::Penultimate) => write!(f, "-2"),
        }
    }
}

/// Parsed form of a task's `repeat` text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatRule {
    /// `d <interval>`
    Daily { interval: u32 },
    /// `y`
    Annual,
    /// `w <days>`, ISO weekday numbers (1 = Monday).
    Weekly { days: BTreeSet<u32> },
    /// `m <days> [<months>]`; `months == None` means every month.
    Monthly {
        days: Vec<MonthDay>,
        months: Option<BTreeSet<u32>>,
    },
}

fn rule_error(message: impl Into<String>) -> RecurrenceError {
    RecurrenceError::RuleSyntax(message.into())
}

/// Parses a comma-joined list of integers within `range`.
fn parse_number_list(
    field: &str,
    range: std::ops::RangeInclusive<u32>,
    what: &str,
) -> Result<BTreeSet<u32>, RecurrenceError> {
    field
        .split(',')
        .map(|token| match token.parse::<u32>() {
            Ok(n) if range.contains(&n) => Ok(n),
            _ => Err(rule_error(format!("invalid {} '{}'", what, token))),
        })
        .collect()
}

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl FromStr for RepeatRule {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let Some((&family, args)) = fields.split_first() else {
            return Err(rule_error("empty repeat rule"));
        };

        match (family, args) {
            ("d", [interval]) => match interval.parse::<u32>() {
                Ok(interval @ 1..=MAX_DAILY_INTERVAL) => Ok(RepeatRule::Daily { interval }),
                _ => Err(rule_error(format!(
                    "daily interval must be within 1..={}, got '{}'",
                    MAX_DAILY_INTERVAL, interval
                ))),
            },
            ("d", _) => Err(rule_error("daily rule takes exactly one interval")),
            ("y", []) => Ok(RepeatRule::Annual),
            ("y", _) => Err(rule_error("annual rule takes no arguments")),
            ("w", [days]) => Ok(RepeatRule::Weekly {
                days: parse_number_list(days, 1..=7, "day of week")?,
            }),
            ("w", _) => Err(rule_error("weekly rule takes exactly one day list")),
            ("m", [days, rest @ ..]) if rest.len() <= 1 => {
                let days = days
                    .split(',')
                    .map(MonthDay::parse)
                    .collect::<Result<Vec<_>, _>>()?;
                let months = rest
                    .first()
                    .map(|months| parse_number_list(months, 1..=12, "month"))
                    .transpose()?;
                Ok(RepeatRule::Monthly { days, months })
            }
            ("m", _) => Err(rule_error(
                "monthly rule takes a day list and an optional month list",
            )),
            (other, _) => Err(rule_error(format!("unsupported rule family '{}'", other))),
        }
    }
}

impl fmt::Display for RepeatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatRule::Daily { interval } => write!(f, "d {}", interval),
            RepeatRule::Annual => write!(f, "y"),
            RepeatRule::Weekly { days } => write!(f, "w {}", join(days)),
            RepeatRule::Monthly { days, months } => {
                write!(f, "m {}", join(days))?;
                if let Some(months) = months {
                    write!(f, " {}", join(months))?;
                }
                Ok(())
            }
        }
    }
}
