use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date_cursor::{DateCursor, Frequency};
use super::money::Cents;
use crate::errors::ValidationError;

/// Whether the bill is money going out or coming in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    Payable,
    Receivable,
}

/// How the declared amount maps onto installments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMode {
    /// One installment, no plan.
    Single,
    /// The amount is the grand total, divided evenly across the count.
    FixedTotal,
    /// The amount repeats per installment; the plan may resume mid-way
    /// through a numbering that started elsewhere.
    FixedInstallment,
    /// The amount repeats unchanged at a fixed cadence over a date window.
    Recurring,
}

impl PaymentMode {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::Single => "single",
            PaymentMode::FixedTotal => "fixed_total",
            PaymentMode::FixedInstallment => "fixed_installment",
            PaymentMode::Recurring => "recurring",
        }
    }
}

/// Inclusive date range a recurring plan occupies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// User-declared specification of a payable or receivable, as collected by
/// the caller. Transient: validated and turned into a plan group, never
/// persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillIntent {
    pub direction: Direction,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
    /// Grand total for `FixedTotal`, per-installment amount otherwise.
    pub amount_cents: Cents,
    pub first_due_date: NaiveDate,
    pub mode: PaymentMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default = "BillIntent::default_start_index")]
    pub start_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<DateWindow>,
}

impl BillIntent {
    pub fn new(
        direction: Direction,
        description: impl Into<String>,
        amount_cents: Cents,
        first_due_date: NaiveDate,
        mode: PaymentMode,
    ) -> Self {
        Self {
            direction,
            description: description.into(),
            counterparty_id: None,
            cost_center: None,
            amount_cents,
            first_due_date,
            mode,
            card_id: None,
            count: None,
            start_index: 1,
            frequency: None,
            window: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn with_window(mut self, window: DateWindow, frequency: Frequency) -> Self {
        self.window = Some(window);
        self.frequency = Some(frequency);
        self
    }

    pub fn with_counterparty(mut self, counterparty_id: Uuid) -> Self {
        self.counterparty_id = Some(counterparty_id);
        self
    }

    pub fn with_cost_center(mut self, cost_center: impl Into<String>) -> Self {
        self.cost_center = Some(cost_center.into());
        self
    }

    pub fn with_card(mut self, card_id: Uuid) -> Self {
        self.card_id = Some(card_id);
        self
    }

    /// Checks the intent shape before any installment is generated. On
    /// failure nothing has been emitted and the caller can re-prompt.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount_cents <= 0 {
            return Err(ValidationError::NonPositiveAmount {
                cents: self.amount_cents,
            });
        }
        match self.mode {
            PaymentMode::Single => Ok(()),
            PaymentMode::FixedTotal | PaymentMode::FixedInstallment => {
                let count = self.count.ok_or(ValidationError::MissingCount {
                    mode: self.mode.label(),
                })?;
                if count < 2 {
                    return Err(ValidationError::CountTooSmall { count });
                }
                if self.start_index > count {
                    return Err(ValidationError::StartIndexBeyondCount {
                        start_index: self.start_index,
                        count,
                    });
                }
                Ok(())
            }
            PaymentMode::Recurring => {
                if self.frequency.is_none() {
                    return Err(ValidationError::MissingFrequency);
                }
                let window = self.window.ok_or(ValidationError::MissingWindow)?;
                if window.start > window.end {
                    return Err(ValidationError::WindowInverted {
                        start: window.start,
                        end: window.end,
                    });
                }
                Ok(())
            }
        }
    }

    /// Number of installments this intent describes, once validated.
    /// For `FixedInstallment` the plan covers sequences
    /// `start_index..=count`, so a resumed plan emits fewer entries than
    /// its nominal count.
    pub fn planned_count(&self) -> u32 {
        match self.mode {
            PaymentMode::Single => 1,
            PaymentMode::FixedTotal => self.count.unwrap_or(0),
            PaymentMode::FixedInstallment => {
                let count = self.count.unwrap_or(0);
                count.saturating_sub(self.start_index.saturating_sub(1))
            }
            PaymentMode::Recurring => match (self.window, self.frequency) {
                (Some(window), Some(frequency)) => {
                    occurrences_in_window(window, frequency, self.first_due_date)
                }
                _ => 0,
            },
        }
    }

    fn default_start_index() -> u32 {
        1
    }
}

/// Counts cadence occurrences inside `window`, anchored on the day-of-month
/// of `first_due_date`.
fn occurrences_in_window(window: DateWindow, frequency: Frequency, first_due: NaiveDate) -> u32 {
    use chrono::Datelike;

    let mut cursor = DateCursor::anchored(window.start, frequency, first_due.day());
    let mut count = 0u32;
    let mut date = window.start;
    while window.contains(date) {
        count += 1;
        date = cursor.step();
    }
    count
}
