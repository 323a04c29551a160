#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rental_core::{
    errors::{RentalError, Result},
    storage::{JsonPaymentStore, PaymentRow, PaymentStore},
};
use tempfile::TempDir;
use uuid::Uuid;

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// Creates a JSON payment store in a fresh temporary directory. Keep the guard
/// alive for as long as the store is used.
pub fn temp_json_store() -> (JsonPaymentStore, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let store =
        JsonPaymentStore::new(Some(temp.path().to_path_buf())).expect("create json payment store");
    (store, temp)
}

/// Store whose inserts always fail, standing in for an unreachable backend.
#[derive(Default)]
pub struct FailingStore {
    pub attempts: Mutex<usize>,
}

impl PaymentStore for FailingStore {
    fn insert(&self, _row: &PaymentRow) -> Result<()> {
        *self.attempts.lock().expect("lock attempts") += 1;
        Err(RentalError::Storage("connection refused".into()))
    }

    fn rows_for_lease(&self, _lease_id: Uuid) -> Result<Vec<PaymentRow>> {
        Err(RentalError::Storage("connection refused".into()))
    }
}

pub fn failing_store() -> Arc<FailingStore> {
    Arc::new(FailingStore::default())
}
