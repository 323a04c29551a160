use chrono::NaiveDate;

use crate::calendar::{days_between, months_between};

const NOT_AVAILABLE: &str = "N/A";
const REMAINDER_PERIOD_DAYS: i64 = 30;

/// Human-readable agreement duration for display.
///
/// The day remainder is the total day difference modulo 30 rather than the days
/// left over after the whole months, so it drifts for long or irregular spans.
/// Agreements have always been displayed this way; never bill from it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DurationFormatter;

impl DurationFormatter {
    pub fn format(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
        let (Some(start), Some(end)) = (start, end) else {
            return NOT_AVAILABLE.to_string();
        };

        let months = months_between(start, end);
        let total_days = days_between(start, end);
        if months <= 0 {
            return format!("{} days", total_days);
        }

        let days = total_days % REMAINDER_PERIOD_DAYS;
        if days == 0 {
            return format!("{} {}", months, plural(months as i64, "month"));
        }
        format!(
            "{} {}, {} {}",
            months,
            plural(months as i64, "month"),
            days,
            plural(days, "day")
        )
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}
