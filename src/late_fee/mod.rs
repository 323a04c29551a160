//! Late payment fees: building the fee record and writing it to the payment store.

pub mod policy;

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    calendar::{first_of_month, month_label},
    currency::Money,
    errors::{RentalError, Result},
    storage::{PaymentKind, PaymentRow, PaymentStatus, PaymentStore},
};

pub use policy::LateFeePolicy;

/// A late fee charged at the moment a late payment is taken. Never updated;
/// corrections are recorded as new rows.
#[derive(Debug, Clone, PartialEq)]
pub struct LateFeeRecord {
    pub lease_id: Uuid,
    pub amount: Money,
    pub days_late: u32,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub description: String,
    pub status: PaymentStatus,
    /// First day of the month the late payment covers.
    pub original_due_date: NaiveDate,
}

impl LateFeeRecord {
    pub fn new(
        lease_id: Uuid,
        amount: Money,
        days_late: u32,
        payment_date: NaiveDate,
        payment_method: impl Into<String>,
        reference_number: Option<String>,
    ) -> Result<Self> {
        if days_late == 0 {
            return Err(RentalError::Validation(
                "a late fee needs at least one day late".into(),
            ));
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(RentalError::Validation(format!(
                "late fee amount must not be negative, got {}",
                amount
            )));
        }
        let payment_method = payment_method.into();
        if payment_method.trim().is_empty() {
            return Err(RentalError::Validation("payment method is required".into()));
        }

        Ok(Self {
            lease_id,
            amount,
            days_late,
            payment_date,
            payment_method,
            reference_number: reference_number.filter(|reference| !reference.trim().is_empty()),
            description: describe(payment_date, days_late),
            status: PaymentStatus::Completed,
            original_due_date: first_of_month(payment_date),
        })
    }

    /// The payments table row for this fee. The fee is settled in full when recorded.
    pub fn to_row(&self) -> PaymentRow {
        PaymentRow {
            id: Uuid::new_v4(),
            lease_id: self.lease_id,
            amount: self.amount,
            amount_paid: self.amount,
            balance: 0.0,
            payment_date: self.payment_date,
            payment_method: self.payment_method.clone(),
            reference_number: self.reference_number.clone(),
            description: self.description.clone(),
            status: self.status,
            kind: PaymentKind::LatePaymentFee,
            late_fine_amount: self.amount,
            days_overdue: self.days_late,
            original_due_date: Some(self.original_due_date),
        }
    }
}

fn describe(payment_date: NaiveDate, days_late: u32) -> String {
    let unit = if days_late == 1 { "day" } else { "days" };
    format!(
        "Late payment fee for {} ({} {} late)",
        month_label(payment_date),
        days_late,
        unit
    )
}

/// Result of checking a payment against its due date.
#[derive(Debug, Clone, PartialEq)]
pub enum LateFeeOutcome {
    /// Paid on time or within the grace period; nothing recorded.
    OnTime,
    Recorded(LateFeeRecord),
    /// The payment was late but the fee could not be recorded.
    Failed,
}

/// Records late fees against the payment store.
///
/// Recording never returns an error: every failure is logged and reported as
/// `false` so callers only have to decide whether to tell the user or retry.
pub struct LateFeeAssessor {
    store: Arc<dyn PaymentStore>,
    policy: LateFeePolicy,
}

impl LateFeeAssessor {
    pub fn new(store: Arc<dyn PaymentStore>) -> Self {
        Self {
            store,
            policy: LateFeePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: LateFeePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &LateFeePolicy {
        &self.policy
    }

    /// Records a late fee of `amount` for a payment `days_late` days overdue.
    /// Lateness is the caller's call; this only builds and stores the record.
    pub fn assess(
        &self,
        lease_id: Uuid,
        amount: Money,
        days_late: u32,
        payment_date: NaiveDate,
        payment_method: &str,
        reference_number: Option<&str>,
    ) -> bool {
        match LateFeeRecord::new(
            lease_id,
            amount,
            days_late,
            payment_date,
            payment_method,
            reference_number.map(str::to_string),
        ) {
            Ok(record) => self.record(&record),
            Err(err) => {
                tracing::warn!(lease = %lease_id, error = %err, "late fee rejected");
                false
            }
        }
    }

    /// Writes an already built record to the store.
    pub fn record(&self, record: &LateFeeRecord) -> bool {
        match self.store.insert(&record.to_row()) {
            Ok(()) => {
                tracing::info!(
                    lease = %record.lease_id,
                    amount = record.amount,
                    days_late = record.days_late,
                    "late fee recorded"
                );
                true
            }
            Err(err) => {
                tracing::error!(lease = %record.lease_id, error = %err, "failed to record late fee");
                false
            }
        }
    }

    /// Compares a payment against its due date under the configured policy and
    /// records the resulting fee, if any.
    pub fn assess_payment(
        &self,
        lease_id: Uuid,
        due_date: NaiveDate,
        payment_date: NaiveDate,
        payment_method: &str,
        reference_number: Option<&str>,
    ) -> LateFeeOutcome {
        let Some(days_late) = self.policy.days_late(due_date, payment_date) else {
            return LateFeeOutcome::OnTime;
        };
        let amount = self.policy.fee_for(days_late);
        let record = match LateFeeRecord::new(
            lease_id,
            amount,
            days_late,
            payment_date,
            payment_method,
            reference_number.map(str::to_string),
        ) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(lease = %lease_id, error = %err, "late fee rejected");
                return LateFeeOutcome::Failed;
            }
        };
        if self.record(&record) {
            LateFeeOutcome::Recorded(record)
        } else {
            LateFeeOutcome::Failed
        }
    }
}
