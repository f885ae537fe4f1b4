//! Installment scheduling domain: date stepping, plan generation and
//! reconciliation, confirmation staging, audit snapshots, and invoice
//! period resolution.

pub mod date_cursor;
pub mod generator;
pub mod history;
pub mod installment;
pub mod intent;
pub mod invoice;
pub mod money;
pub mod reconciler;
pub mod staging;

pub use date_cursor::{advance, days_in_month, DateCursor, Frequency};
pub use generator::generate;
pub use history::{sort_newest_first, ChangeKind, HistorySnapshot};
pub use installment::{Installment, PlanGroup, PlanShape};
pub use intent::{BillIntent, DateWindow, Direction, PaymentMode};
pub use invoice::{resolve_invoice_period, InvoicePeriod};
pub use money::{format_cents, split_even, Cents};
pub use reconciler::reconcile;
pub use staging::{DraftSummary, PlanDraft};
