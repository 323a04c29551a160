use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    calendar::days_between,
    currency::{round_to_minor, Money, DEFAULT_MINOR_UNITS},
    errors::{RentalError, Result},
};

/// How late fees are charged: a flat amount per day late, optionally capped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LateFeePolicy {
    pub daily_rate: Money,
    /// Payments this many days after the due date still count as on time.
    #[serde(default)]
    pub grace_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee: Option<Money>,
}

impl Default for LateFeePolicy {
    fn default() -> Self {
        Self {
            daily_rate: 10.0,
            grace_days: 0,
            max_fee: None,
        }
    }
}

impl LateFeePolicy {
    pub fn validate(&self) -> Result<()> {
        if !self.daily_rate.is_finite() || self.daily_rate < 0.0 {
            return Err(RentalError::Config(format!(
                "late fee daily rate must be a non-negative amount, got {}",
                self.daily_rate
            )));
        }
        if let Some(max) = self.max_fee {
            if !max.is_finite() || max < 0.0 {
                return Err(RentalError::Config(format!(
                    "late fee cap must be a non-negative amount, got {}",
                    max
                )));
            }
        }
        Ok(())
    }

    /// Days between `due` and `paid`, or `None` when the payment falls within the
    /// grace period. Lateness is always counted from the due date itself.
    pub fn days_late(&self, due: NaiveDate, paid: NaiveDate) -> Option<u32> {
        let late = days_between(due, paid);
        if late <= i64::from(self.grace_days) {
            return None;
        }
        u32::try_from(late).ok()
    }

    pub fn fee_for(&self, days_late: u32) -> Money {
        let fee = self.daily_rate * f64::from(days_late);
        let capped = match self.max_fee {
            Some(max) => fee.min(max),
            None => fee,
        };
        round_to_minor(capped, DEFAULT_MINOR_UNITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn on_time_and_early_payments_are_not_late() {
        let policy = LateFeePolicy::default();
        assert_eq!(policy.days_late(ymd(2023, 3, 1), ymd(2023, 3, 1)), None);
        assert_eq!(policy.days_late(ymd(2023, 3, 1), ymd(2023, 2, 27)), None);
        assert_eq!(policy.days_late(ymd(2023, 3, 1), ymd(2023, 3, 6)), Some(5));
    }

    #[test]
    fn grace_period_suppresses_but_does_not_discount() {
        let policy = LateFeePolicy {
            grace_days: 3,
            ..LateFeePolicy::default()
        };
        assert_eq!(policy.days_late(ymd(2023, 3, 1), ymd(2023, 3, 4)), None);
        assert_eq!(policy.days_late(ymd(2023, 3, 1), ymd(2023, 3, 5)), Some(4));
    }

    #[test]
    fn fee_is_proportional_and_capped() {
        let policy = LateFeePolicy {
            daily_rate: 12.5,
            grace_days: 0,
            max_fee: Some(100.0),
        };
        assert_eq!(policy.fee_for(2), 25.0);
        assert_eq!(policy.fee_for(30), 100.0);
    }

    #[test]
    fn rejects_negative_rates() {
        let policy = LateFeePolicy {
            daily_rate: -1.0,
            ..LateFeePolicy::default()
        };
        assert!(matches!(policy.validate(), Err(RentalError::Config(_))));
        assert!(LateFeePolicy::default().validate().is_ok());
    }
}
