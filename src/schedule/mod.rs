//! Monthly installment schedules for leases.

pub mod status;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    calendar::{add_months, days_between, MonthEndPolicy},
    currency::{
        floor_to_minor_units, from_minor_units, to_minor_units, Money, DEFAULT_MINOR_UNITS,
    },
    errors::{RentalError, Result},
};

pub use status::{track, InstallmentState, InstallmentStatus, ScheduleReport, ScheduleTotals};

/// Days per billing period when converting a lease term into a period count.
pub const DAYS_PER_PERIOD: i64 = 30;
/// Hard ceiling on installments per lease (a century of monthly rent).
pub const MAX_INSTALLMENTS: usize = 1200;

/// One scheduled rent payment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Installment {
    due_date: NaiveDate,
    amount: Money,
}

impl Installment {
    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn amount(&self) -> Money {
        self.amount
    }
}

/// Produces monthly installments from lease terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleGenerator {
    month_end: MonthEndPolicy,
    precision: u8,
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        Self::new(MonthEndPolicy::default())
    }
}

impl ScheduleGenerator {
    pub fn new(month_end: MonthEndPolicy) -> Self {
        Self {
            month_end,
            precision: DEFAULT_MINOR_UNITS,
        }
    }

    /// Overrides the number of decimal places amounts are rounded to.
    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn month_end(&self) -> MonthEndPolicy {
        self.month_end
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Generates the installment schedule for a lease.
    ///
    /// The schedule holds at most `ceil(total / rent)` installments and, when an end
    /// date is given, at most `ceil(days(start..end) / 30)`. Each installment charges
    /// the rent or whatever balance remains, whichever is smaller, and installment
    /// `i` falls due `i` calendar months after `start`. Generation stops once the
    /// balance is exhausted or a due date would land after `end`.
    ///
    /// Amounts are allocated in whole minor units. The rent is rounded to the
    /// nearest unit and the total is rounded down, so the installments never sum
    /// past `total`.
    pub fn generate(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
        rent_amount: Money,
        total_amount: Money,
    ) -> Result<Vec<Installment>> {
        if !rent_amount.is_finite() || rent_amount <= 0.0 {
            return Err(RentalError::InvalidInput(format!(
                "rent amount must be greater than zero, got {}",
                rent_amount
            )));
        }
        if !total_amount.is_finite() || total_amount < 0.0 {
            return Err(RentalError::InvalidInput(format!(
                "total amount must not be negative, got {}",
                total_amount
            )));
        }
        let rent_minor = to_minor_units(rent_amount, self.precision);
        if rent_minor <= 0 {
            return Err(RentalError::InvalidInput(format!(
                "rent amount {} rounds to zero at {} decimal places",
                rent_amount, self.precision
            )));
        }

        let mut remaining = floor_to_minor_units(total_amount, self.precision);
        let amount_bound = (remaining.saturating_add(rent_minor - 1) / rent_minor) as usize;
        let count = match end {
            Some(end) => amount_bound.min(period_count(start, end)),
            None => amount_bound,
        };
        if count > MAX_INSTALLMENTS {
            tracing::warn!(
                requested = count,
                limit = MAX_INSTALLMENTS,
                "installment count truncated"
            );
        }
        let count = count.min(MAX_INSTALLMENTS);

        let mut installments = Vec::with_capacity(count);
        for index in 0..count {
            if remaining <= 0 {
                break;
            }
            let Some(due_date) = add_months(start, index as i32, self.month_end) else {
                break;
            };
            if end.is_some_and(|end| due_date > end) {
                break;
            }
            let amount = rent_minor.min(remaining);
            installments.push(Installment {
                due_date,
                amount: from_minor_units(amount, self.precision),
            });
            remaining -= amount;
        }

        tracing::debug!(
            %start,
            end = ?end,
            installments = installments.len(),
            unallocated = from_minor_units(remaining, self.precision),
            "generated payment schedule"
        );
        Ok(installments)
    }
}

/// Number of 30-day periods needed to cover `start..end`, rounded up.
fn period_count(start: NaiveDate, end: NaiveDate) -> usize {
    let days = days_between(start, end);
    if days <= 0 {
        return 0;
    }
    ((days + DAYS_PER_PERIOD - 1) / DAYS_PER_PERIOD) as usize
}
