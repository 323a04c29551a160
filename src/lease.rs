//! Validated lease and payment values.
//!
//! Backend rows arrive loosely typed: dates may be plain dates or timestamps and
//! numeric columns may be serialized as strings. Everything is checked and
//! converted here before it reaches schedule or late fee logic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    currency::Money,
    duration::DurationFormatter,
    errors::{RentalError, Result},
    schedule::{self, Installment, ScheduleGenerator, ScheduleReport},
    storage::{PaymentKind, PaymentRow, PaymentStatus},
};

/// Numeric column as returned by the backend: JSON number or decimal string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    fn parse(&self, field: &str) -> Result<Money> {
        let value = match self {
            RawAmount::Number(value) => *value,
            RawAmount::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                RentalError::Validation(format!("{field} is not a number: `{text}`"))
            })?,
        };
        if !value.is_finite() {
            return Err(RentalError::Validation(format!("{field} is not finite")));
        }
        Ok(value)
    }
}

/// Lease row exactly as the agreements table hands it over.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LeaseRow {
    pub id: Option<String>,
    #[serde(default)]
    pub agreement_number: Option<String>,
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    pub rent_amount: Option<RawAmount>,
    pub total_amount: Option<RawAmount>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lease {
    pub id: Uuid,
    pub agreement_number: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub rent_amount: Money,
    pub total_amount: Money,
}

impl Lease {
    pub fn new(
        id: Uuid,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        rent_amount: Money,
        total_amount: Money,
    ) -> Result<Self> {
        if !rent_amount.is_finite() || rent_amount <= 0.0 {
            return Err(RentalError::Validation(format!(
                "lease {id}: rent amount must be greater than zero"
            )));
        }
        if !total_amount.is_finite() || total_amount < 0.0 {
            return Err(RentalError::Validation(format!(
                "lease {id}: total amount must not be negative"
            )));
        }
        if let Some(end) = end_date {
            if end < start_date {
                return Err(RentalError::Validation(format!(
                    "lease {id}: end date {end} precedes start date {start_date}"
                )));
            }
        }
        Ok(Self {
            id,
            agreement_number: None,
            start_date,
            end_date,
            rent_amount,
            total_amount,
        })
    }

    pub fn with_agreement_number(mut self, number: impl Into<String>) -> Self {
        self.agreement_number = Some(number.into());
        self
    }

    pub fn schedule(&self, generator: &ScheduleGenerator) -> Result<Vec<Installment>> {
        generator.generate(
            self.start_date,
            self.end_date,
            self.rent_amount,
            self.total_amount,
        )
    }

    pub fn duration_label(&self) -> String {
        DurationFormatter::format(Some(self.start_date), self.end_date)
    }

    /// Tracks completed rent rows for this lease against its schedule. Rows that
    /// belong to other leases or fail validation are skipped with a warning.
    pub fn report(
        &self,
        generator: &ScheduleGenerator,
        rows: &[PaymentRow],
        reference: NaiveDate,
    ) -> Result<ScheduleReport> {
        let installments = self.schedule(generator)?;
        let payments: Vec<PaymentRecord> = rows
            .iter()
            .filter(|row| row.lease_id == self.id && row.status == PaymentStatus::Completed)
            .filter_map(|row| match PaymentRecord::try_from(row) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(row = %row.id, error = %err, "skipping payment row");
                    None
                }
            })
            .collect();
        Ok(schedule::track(&installments, &payments, reference))
    }
}

impl TryFrom<LeaseRow> for Lease {
    type Error = RentalError;

    fn try_from(row: LeaseRow) -> Result<Self> {
        let raw_id = row
            .id
            .ok_or_else(|| RentalError::Validation("lease row has no id".into()))?;
        let id = Uuid::parse_str(raw_id.trim())
            .map_err(|_| RentalError::Validation(format!("lease id `{raw_id}` is not a UUID")))?;
        let start_date = row
            .start_date
            .as_deref()
            .map(|raw| parse_date("start_date", raw))
            .transpose()?
            .ok_or_else(|| RentalError::Validation(format!("lease {id}: missing start_date")))?;
        let end_date = match row.end_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date("end_date", raw)?),
        };
        let rent_amount = row
            .rent_amount
            .as_ref()
            .ok_or_else(|| RentalError::Validation(format!("lease {id}: missing rent_amount")))?
            .parse("rent_amount")?;
        let total_amount = match row.total_amount.as_ref() {
            Some(raw) => raw.parse("total_amount")?,
            None => 0.0,
        };

        let mut lease = Lease::new(id, start_date, end_date, rent_amount, total_amount)?;
        lease.agreement_number = row.agreement_number.filter(|n| !n.trim().is_empty());
        Ok(lease)
    }
}

/// A payment reduced to what schedule tracking needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub payment_date: NaiveDate,
    pub amount: Money,
    pub kind: PaymentKind,
}

impl PaymentRecord {
    pub fn rent(payment_date: NaiveDate, amount: Money) -> Self {
        Self {
            payment_date,
            amount,
            kind: PaymentKind::Rent,
        }
    }
}

impl TryFrom<&PaymentRow> for PaymentRecord {
    type Error = RentalError;

    fn try_from(row: &PaymentRow) -> Result<Self> {
        if !row.amount_paid.is_finite() || row.amount_paid < 0.0 {
            return Err(RentalError::Validation(format!(
                "payment {}: invalid amount paid {}",
                row.id, row.amount_paid
            )));
        }
        Ok(Self {
            payment_date: row.payment_date,
            amount: row.amount_paid,
            kind: row.kind,
        })
    }
}

/// Accepts `YYYY-MM-DD` and timestamps that start with one.
fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = match trimmed.char_indices().nth(10) {
        Some((idx, 'T')) | Some((idx, ' ')) => &trimmed[..idx],
        _ => trimmed,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| RentalError::Validation(format!("{field} `{raw}` is not a date")))
}
