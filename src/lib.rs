#![doc(test(attr(deny(warnings))))]

//! Rental Core computes lease payment schedules, agreement durations, and late
//! payment fees for the fleet rental back office, and records assessed fees
//! through a pluggable payment store.

pub mod cache;
pub mod calendar;
pub mod config;
pub mod currency;
pub mod duration;
pub mod errors;
pub mod late_fee;
pub mod lease;
pub mod schedule;
pub mod storage;
pub mod time;
pub mod utils;

pub use duration::DurationFormatter;
pub use errors::{RentalError, Result};
pub use late_fee::{LateFeeAssessor, LateFeeOutcome, LateFeePolicy, LateFeeRecord};
pub use lease::{Lease, LeaseRow, PaymentRecord};
pub use schedule::{Installment, ScheduleGenerator};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Rental Core tracing initialized.");
    });
}
