#![doc(test(attr(deny(warnings))))]

//! Bills Core provides the installment and recurrence scheduling engine that
//! powers payable/receivable workflows: plan generation, reconciliation of
//! partially paid plans, confirmation staging, and audit history capture.

pub mod errors;
pub mod schedule;
pub mod service;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bills Core tracing initialized.");
    });
}
