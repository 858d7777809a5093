//! Calendar helpers for the reporting windows.
//!
//! Weeks start on Monday. All functions work on calendar dates only; time of day
//! never enters a range comparison.

use crate::errors::{Error, Result};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

/// Monday of the week containing `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sunday of the week containing `date`.
#[must_use]
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week(date) + Duration::days(6)
}

/// First day of the month containing `date`.
#[must_use]
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Last day of the month containing `date`.
#[must_use]
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// First day of the month before the one containing `date`.
#[must_use]
pub fn previous_month_start(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_sub_months(Months::new(1))
        .unwrap_or(NaiveDate::MIN)
}

/// Inclusive `[first, last]` day range of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::validation(format!("Invalid month: {year}-{month:02}")))?;
    Ok((first, end_of_month(first)))
}

/// Number of days in the inclusive range, `0` when `from > to`.
#[must_use]
pub fn days_inclusive(from: NaiveDate, to: NaiveDate) -> usize {
    usize::try_from((to - from).num_days() + 1).unwrap_or(0)
}

/// Display label such as `"October 2026"`.
#[must_use]
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// A month the user can pick in a period selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    /// Calendar year
    pub year: i32,
    /// Month number, 1-12
    pub month: u32,
    /// Machine value, `"YYYY-MM"`
    pub value: String,
    /// Display label, `"October 2026"`
    pub label: String,
}

/// The `count` most recent months, starting with the month of `today`.
#[must_use]
pub fn recent_months(today: NaiveDate, count: usize) -> Vec<MonthOption> {
    let mut options = Vec::with_capacity(count);
    let mut cursor = start_of_month(today);
    for _ in 0..count {
        options.push(MonthOption {
            year: cursor.year(),
            month: cursor.month(),
            value: cursor.format("%Y-%m").to_string(),
            label: month_label(cursor),
        });
        cursor = previous_month_start(cursor);
    }
    options
}
