use chrono::{Duration, NaiveDate};

use super::Installment;
use crate::{
    calendar::days_between,
    currency::{round_to_minor, Money, DEFAULT_MINOR_UNITS},
    lease::PaymentRecord,
    storage::PaymentKind,
};

/// Installments due within this many days of the reference date count as due soon.
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;
const SETTLED_EPSILON: Money = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallmentStatus {
    Paid,
    PartiallyPaid,
    Overdue,
    DueSoon,
    Upcoming,
}

impl InstallmentStatus {
    fn classify(
        due_date: NaiveDate,
        paid: Money,
        outstanding: Money,
        reference: NaiveDate,
    ) -> InstallmentStatus {
        if outstanding <= SETTLED_EPSILON {
            return InstallmentStatus::Paid;
        }
        if due_date < reference {
            return InstallmentStatus::Overdue;
        }
        if paid > SETTLED_EPSILON {
            return InstallmentStatus::PartiallyPaid;
        }
        let cutoff = reference
            .checked_add_signed(Duration::days(DUE_SOON_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);
        if due_date <= cutoff {
            InstallmentStatus::DueSoon
        } else {
            InstallmentStatus::Upcoming
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentState {
    pub installment: Installment,
    pub paid: Money,
    pub outstanding: Money,
    pub status: InstallmentStatus,
    /// Date of the payment that brought the installment to zero outstanding.
    pub settled_on: Option<NaiveDate>,
    /// Days between the due date and `settled_on`, when settled late.
    pub days_late: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleTotals {
    pub scheduled: Money,
    pub paid: Money,
    pub outstanding: Money,
    pub overdue_amount: Money,
    pub overdue_count: usize,
}

impl ScheduleTotals {
    fn from_states(states: &[InstallmentState]) -> Self {
        let mut totals = ScheduleTotals::default();
        for state in states {
            totals.scheduled += state.installment.amount();
            totals.paid += state.paid;
            totals.outstanding += state.outstanding;
            if state.status == InstallmentStatus::Overdue {
                totals.overdue_amount += state.outstanding;
                totals.overdue_count += 1;
            }
        }
        totals.scheduled = round_to_minor(totals.scheduled, DEFAULT_MINOR_UNITS);
        totals.paid = round_to_minor(totals.paid, DEFAULT_MINOR_UNITS);
        totals.outstanding = round_to_minor(totals.outstanding, DEFAULT_MINOR_UNITS);
        totals.overdue_amount = round_to_minor(totals.overdue_amount, DEFAULT_MINOR_UNITS);
        totals
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleReport {
    pub reference_date: NaiveDate,
    pub installments: Vec<InstallmentState>,
    pub totals: ScheduleTotals,
    /// Earliest unsettled installment due on or after the reference date.
    pub next_due: Option<NaiveDate>,
}

impl ScheduleReport {
    pub fn overdue(&self) -> impl Iterator<Item = &InstallmentState> {
        self.installments
            .iter()
            .filter(|state| state.status == InstallmentStatus::Overdue)
    }
}

/// Matches rent payments against a schedule as of `reference`.
///
/// Payments are applied oldest first to the earliest installment that still has
/// an outstanding balance. Late fee and other non-rent rows never settle rent,
/// and payments dated after `reference` are not counted.
pub fn track(
    schedule: &[Installment],
    payments: &[PaymentRecord],
    reference: NaiveDate,
) -> ScheduleReport {
    let mut rent_payments: Vec<&PaymentRecord> = payments
        .iter()
        .filter(|payment| {
            payment.kind == PaymentKind::Rent
                && payment.amount > 0.0
                && payment.payment_date <= reference
        })
        .collect();
    rent_payments.sort_by_key(|payment| payment.payment_date);

    let mut paid = vec![0.0; schedule.len()];
    let mut settled_on: Vec<Option<NaiveDate>> = vec![None; schedule.len()];
    let mut cursor = 0usize;

    for payment in rent_payments {
        let mut available = payment.amount;
        while available > SETTLED_EPSILON && cursor < schedule.len() {
            let due = schedule[cursor].amount() - paid[cursor];
            let applied = due.min(available);
            paid[cursor] = round_to_minor(paid[cursor] + applied, DEFAULT_MINOR_UNITS);
            available -= applied;
            if schedule[cursor].amount() - paid[cursor] <= SETTLED_EPSILON {
                settled_on[cursor] = Some(payment.payment_date);
                cursor += 1;
            }
        }
        if available > SETTLED_EPSILON {
            tracing::debug!(
                surplus = available,
                date = %payment.payment_date,
                "payment exceeds remaining schedule"
            );
        }
    }

    let installments: Vec<InstallmentState> = schedule
        .iter()
        .enumerate()
        .map(|(idx, installment)| {
            let outstanding =
                round_to_minor(installment.amount() - paid[idx], DEFAULT_MINOR_UNITS).max(0.0);
            let status =
                InstallmentStatus::classify(installment.due_date(), paid[idx], outstanding, reference);
            let days_late = settled_on[idx].and_then(|settled| {
                let late = days_between(installment.due_date(), settled);
                (late > 0).then_some(late as u32)
            });
            InstallmentState {
                installment: *installment,
                paid: paid[idx],
                outstanding,
                status,
                settled_on: settled_on[idx],
                days_late,
            }
        })
        .collect();

    let next_due = installments
        .iter()
        .find(|state| {
            state.status != InstallmentStatus::Paid && state.installment.due_date() >= reference
        })
        .map(|state| state.installment.due_date());
    let totals = ScheduleTotals::from_states(&installments);

    ScheduleReport {
        reference_date: reference,
        installments,
        totals,
        next_due,
    }
}
