use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Rejections raised while checking a bill intent, before any installment is
/// generated. Each variant carries enough detail for the caller to re-prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must be positive, got {cents} cents")]
    NonPositiveAmount { cents: i64 },
    #[error("an installment plan needs at least 2 installments, got {count}")]
    CountTooSmall { count: u32 },
    #[error("start index {start_index} is beyond the installment count {count}")]
    StartIndexBeyondCount { start_index: u32, count: u32 },
    #[error("recurrence window starts {start} after it ends {end}")]
    WindowInverted { start: NaiveDate, end: NaiveDate },
    #[error("payment mode {mode} requires an installment count")]
    MissingCount { mode: &'static str },
    #[error("recurring mode requires a frequency")]
    MissingFrequency,
    #[error("recurring mode requires a date window")]
    MissingWindow,
}

/// Reshaping an existing plan clashed with installments that are already
/// paid. Distinct from [`ValidationError`]: the intent itself may be well
/// formed, the conflict depends on stored state. No partial plan is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationConflict {
    #[error("cannot shrink plan to {requested} installments, {paid} are already paid")]
    ShrinkBelowPaid { requested: u32, paid: u32 },
    #[error("declared total {declared_cents} cents does not exceed the {paid_cents} cents already paid")]
    TotalExhaustedByPaid { declared_cents: i64, paid_cents: i64 },
}

/// Error type that captures scheduling and persistence failures.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Conflict(#[from] ReconciliationConflict),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("unknown plan group {0}")]
    UnknownGroup(Uuid),
    #[error("group {group} has no installment {sequence}")]
    UnknownInstallment { group: Uuid, sequence: u32 },
}
