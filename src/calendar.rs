//! Calendar helpers shared by schedule generation, duration display, and late fee
//! assessment.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How month addition treats a day-of-month missing from the target month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MonthEndPolicy {
    /// Jan 31 + 1 month = Feb 28 (or 29).
    #[default]
    Clamp,
    /// Jan 31 + 1 month = Mar 3 (or 2); the overflow spills into the next month.
    RollOver,
}

/// Adds `months` calendar months to `date`. Returns `None` when the result leaves
/// the representable date range.
pub fn add_months(date: NaiveDate, months: i32, policy: MonthEndPolicy) -> Option<NaiveDate> {
    match policy {
        MonthEndPolicy::Clamp => {
            let step = Months::new(months.unsigned_abs());
            if months >= 0 {
                date.checked_add_months(step)
            } else {
                date.checked_sub_months(step)
            }
        }
        MonthEndPolicy::RollOver => {
            let first = first_of_month(date);
            let shifted = if months >= 0 {
                first.checked_add_months(Months::new(months.unsigned_abs()))?
            } else {
                first.checked_sub_months(Months::new(months.unsigned_abs()))?
            };
            shifted.checked_add_signed(Duration::days(i64::from(date.day()) - 1))
        }
    }
}

/// Whole calendar months from `start` to `end`. Partial months are truncated toward
/// zero, so Jan 15 → Feb 14 is 0 and Jan 15 → Feb 15 is 1.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    if end < start {
        return -months_between(end, start);
    }
    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if months > 0 && end.day() < start.day() {
        months -= 1;
    }
    months
}

/// Signed day difference `end - start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

/// "March 2023" style label for the month containing `date`.
pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", month_name(date.month()), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn clamp_keeps_last_day_of_shorter_month() {
        assert_eq!(
            add_months(ymd(2024, 1, 31), 1, MonthEndPolicy::Clamp),
            Some(ymd(2024, 2, 29))
        );
        assert_eq!(
            add_months(ymd(2023, 1, 31), 1, MonthEndPolicy::Clamp),
            Some(ymd(2023, 2, 28))
        );
        assert_eq!(
            add_months(ymd(2023, 1, 31), 3, MonthEndPolicy::Clamp),
            Some(ymd(2023, 4, 30))
        );
    }

    #[test]
    fn roll_over_spills_into_following_month() {
        assert_eq!(
            add_months(ymd(2023, 1, 31), 1, MonthEndPolicy::RollOver),
            Some(ymd(2023, 3, 3))
        );
        assert_eq!(
            add_months(ymd(2024, 1, 30), 1, MonthEndPolicy::RollOver),
            Some(ymd(2024, 3, 1))
        );
        assert_eq!(
            add_months(ymd(2023, 5, 15), 1, MonthEndPolicy::RollOver),
            Some(ymd(2023, 6, 15))
        );
    }

    #[test]
    fn negative_month_offsets_move_backwards() {
        assert_eq!(
            add_months(ymd(2023, 3, 31), -1, MonthEndPolicy::Clamp),
            Some(ymd(2023, 2, 28))
        );
        assert_eq!(
            add_months(ymd(2023, 1, 10), -2, MonthEndPolicy::RollOver),
            Some(ymd(2022, 11, 10))
        );
    }

    #[test]
    fn months_between_truncates_partial_months() {
        assert_eq!(months_between(ymd(2023, 1, 15), ymd(2023, 2, 14)), 0);
        assert_eq!(months_between(ymd(2023, 1, 15), ymd(2023, 2, 15)), 1);
        assert_eq!(months_between(ymd(2023, 1, 1), ymd(2024, 1, 1)), 12);
        assert_eq!(months_between(ymd(2023, 4, 1), ymd(2023, 1, 1)), -3);
    }

    #[test]
    fn month_lengths_include_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 12), 31);
    }

    #[test]
    fn month_label_uses_full_name() {
        assert_eq!(month_label(ymd(2023, 3, 10)), "March 2023");
        assert_eq!(first_of_month(ymd(2023, 3, 10)), ymd(2023, 3, 1));
    }
}
