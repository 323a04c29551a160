use std::sync::Mutex;

use uuid::Uuid;

use super::{PaymentRow, PaymentStore};
use crate::errors::{RentalError, Result};

/// Process-local store, handy for tests and for callers that batch rows before
/// forwarding them elsewhere.
#[derive(Debug, Default)]
pub struct MemoryPaymentStore {
    rows: Mutex<Vec<PaymentRow>>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<PaymentRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Snapshot of every stored row.
    pub fn rows(&self) -> Result<Vec<PaymentRow>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<PaymentRow>>> {
        self.rows
            .lock()
            .map_err(|_| RentalError::Storage("payment store lock poisoned".into()))
    }
}

impl PaymentStore for MemoryPaymentStore {
    fn insert(&self, row: &PaymentRow) -> Result<()> {
        let mut rows = self.lock()?;
        if rows.iter().any(|existing| existing.id == row.id) {
            return Err(RentalError::Storage(format!(
                "payment row {} already exists",
                row.id
            )));
        }
        rows.push(row.clone());
        Ok(())
    }

    fn rows_for_lease(&self, lease_id: Uuid) -> Result<Vec<PaymentRow>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|row| row.lease_id == lease_id)
            .cloned()
            .collect())
    }
}
