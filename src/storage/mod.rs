//! Payment rows as the data store sees them, and the stores that hold them.

pub mod json_backend;
pub mod memory;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{currency::Money, errors::Result};

pub use json_backend::JsonPaymentStore;
pub use memory::MemoryPaymentStore;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Rent,
    LatePaymentFee,
    Deposit,
    Other,
}

/// A row of the lease payments table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRow {
    pub id: Uuid,
    pub lease_id: Uuid,
    pub amount: Money,
    pub amount_paid: Money,
    pub balance: Money,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub description: String,
    pub status: PaymentStatus,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    #[serde(default)]
    pub late_fine_amount: Money,
    #[serde(default)]
    pub days_overdue: u32,
    #[serde(default)]
    pub original_due_date: Option<NaiveDate>,
}

impl PaymentRow {
    /// A completed rent payment with no late fine attached.
    pub fn rent(
        lease_id: Uuid,
        amount: Money,
        payment_date: NaiveDate,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            lease_id,
            amount,
            amount_paid: amount,
            balance: 0.0,
            payment_date,
            payment_method: payment_method.into(),
            reference_number: None,
            description: String::new(),
            status: PaymentStatus::Completed,
            kind: PaymentKind::Rent,
            late_fine_amount: 0.0,
            days_overdue: 0,
            original_due_date: None,
        }
    }
}

/// Abstraction over the table store that payment rows are written to.
pub trait PaymentStore: Send + Sync {
    /// Inserts a single row. Implementations must not partially apply a failed insert.
    fn insert(&self, row: &PaymentRow) -> Result<()>;

    /// Returns every row recorded for `lease_id`, in insertion order.
    fn rows_for_lease(&self, lease_id: Uuid) -> Result<Vec<PaymentRow>>;
}
