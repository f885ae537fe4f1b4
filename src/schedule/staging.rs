use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::installment::Installment;
use super::money::Cents;

/// A generated or reconciled plan held for user review before commit. The
/// caller may flip individual installments between paid and pending; amounts
/// and due dates are never altered here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDraft {
    installments: Vec<Installment>,
}

/// Running totals over a draft's paid/pending partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DraftSummary {
    pub paid_count: u32,
    pub paid_cents: Cents,
    pub pending_count: u32,
    pub pending_cents: Cents,
}

impl DraftSummary {
    pub fn total_cents(&self) -> Cents {
        self.paid_cents + self.pending_cents
    }
}

impl PlanDraft {
    pub fn new(installments: Vec<Installment>) -> Self {
        Self { installments }
    }

    pub fn installments(&self) -> &[Installment] {
        &self.installments
    }

    pub fn into_installments(self) -> Vec<Installment> {
        self.installments
    }

    pub fn len(&self) -> usize {
        self.installments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installments.is_empty()
    }

    /// Flips one installment between paid and pending. Toggling to paid
    /// stamps `paid_on` (today when the caller supplies no date). Returns
    /// false when the sequence is unknown.
    pub fn toggle(&mut self, sequence: u32, paid_on: Option<NaiveDate>) -> bool {
        let Some(installment) = self
            .installments
            .iter_mut()
            .find(|i| i.sequence == sequence)
        else {
            return false;
        };
        if installment.paid {
            installment.mark_pending();
        } else {
            installment.mark_paid(paid_on.unwrap_or_else(today));
        }
        true
    }

    /// Marks every installment paid, stamping the shared payment date.
    pub fn set_all_paid(&mut self, paid_on: Option<NaiveDate>) {
        let stamp = paid_on.unwrap_or_else(today);
        for installment in &mut self.installments {
            installment.mark_paid(stamp);
        }
    }

    /// Reverts every installment to pending.
    pub fn set_all_pending(&mut self) {
        for installment in &mut self.installments {
            installment.mark_pending();
        }
    }

    pub fn summary(&self) -> DraftSummary {
        let mut summary = DraftSummary::default();
        for installment in &self.installments {
            if installment.paid {
                summary.paid_count += 1;
                summary.paid_cents += installment.amount_cents;
            } else {
                summary.pending_count += 1;
                summary.pending_cents += installment.amount_cents;
            }
        }
        summary
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
