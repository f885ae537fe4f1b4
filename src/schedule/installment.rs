use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date_cursor::Frequency;
use super::intent::{BillIntent, DateWindow, Direction, PaymentMode};
use super::money::Cents;

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// One dated, amount-bearing unit within a plan group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Installment {
    /// 1-based position within the plan (or within the resumed numbering
    /// for plans that start mid-way).
    pub sequence: u32,
    pub amount_cents: Cents,
    pub due_date: NaiveDate,
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
    /// Display label derived from the parent description and sequence.
    pub label: String,
}

impl Installment {
    pub fn pending(sequence: u32, amount_cents: Cents, due_date: NaiveDate, label: String) -> Self {
        Self {
            sequence,
            amount_cents,
            due_date,
            paid: false,
            paid_on: None,
            label,
        }
    }

    pub fn mark_paid(&mut self, paid_on: NaiveDate) {
        self.paid = true;
        self.paid_on = Some(paid_on);
    }

    pub fn mark_pending(&mut self) {
        self.paid = false;
        self.paid_on = None;
    }
}

/// The declared shape a plan was generated from. Persisted with the group so
/// that later reshaping reads the mode and its parameters directly instead
/// of inferring them from installment labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanShape {
    pub mode: PaymentMode,
    pub amount_cents: Cents,
    pub first_due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default = "PlanShape::default_start_index")]
    pub start_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<DateWindow>,
}

impl PlanShape {
    pub fn from_intent(intent: &BillIntent) -> Self {
        Self {
            mode: intent.mode,
            amount_cents: intent.amount_cents,
            first_due_date: intent.first_due_date,
            count: intent.count,
            start_index: intent.start_index,
            frequency: intent.frequency,
            window: intent.window,
        }
    }

    fn default_start_index() -> u32 {
        1
    }
}

/// The full set of installments generated from one bill intent, plus the
/// group-level descriptive fields the audit history captures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanGroup {
    pub id: Uuid,
    pub direction: Direction,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<Uuid>,
    pub shape: PlanShape,
    #[serde(default)]
    pub installments: Vec<Installment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "PlanGroup::schema_version_default")]
    pub schema_version: u8,
}

impl PlanGroup {
    pub fn new(intent: &BillIntent, installments: Vec<Installment>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            direction: intent.direction,
            description: intent.description.clone(),
            counterparty_id: intent.counterparty_id,
            cost_center: intent.cost_center.clone(),
            card_id: intent.card_id,
            shape: PlanShape::from_intent(intent),
            installments,
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Sum of all installment amounts; reconstructs the declared total for
    /// `FixedTotal` plans.
    pub fn total_cents(&self) -> Cents {
        self.installments.iter().map(|i| i.amount_cents).sum()
    }

    pub fn paid(&self) -> impl Iterator<Item = &Installment> {
        self.installments.iter().filter(|i| i.paid)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Installment> {
        self.installments.iter().filter(|i| !i.paid)
    }

    pub fn paid_count(&self) -> u32 {
        self.paid().count() as u32
    }

    pub fn paid_cents(&self) -> Cents {
        self.paid().map(|i| i.amount_cents).sum()
    }

    pub fn installment(&self, sequence: u32) -> Option<&Installment> {
        self.installments.iter().find(|i| i.sequence == sequence)
    }

    pub fn installment_mut(&mut self, sequence: u32) -> Option<&mut Installment> {
        self.installments.iter_mut().find(|i| i.sequence == sequence)
    }

    /// Replaces the installment list with a reconciled one and records the
    /// shape it now answers to.
    pub fn apply_revision(&mut self, intent: &BillIntent, installments: Vec<Installment>) {
        self.description = intent.description.clone();
        self.counterparty_id = intent.counterparty_id;
        self.cost_center = intent.cost_center.clone();
        self.card_id = intent.card_id;
        self.shape = PlanShape::from_intent(intent);
        self.installments = installments;
        self.touch();
    }

    /// Verifies the group invariant: contiguous sequences from the declared
    /// start index and strictly increasing due dates.
    pub fn sequences_are_contiguous(&self) -> bool {
        let mut expected = self.shape.start_index;
        let mut last_due: Option<NaiveDate> = None;
        for installment in &self.installments {
            if installment.sequence != expected {
                return false;
            }
            if let Some(prev) = last_due {
                if installment.due_date <= prev {
                    return false;
                }
            }
            last_due = Some(installment.due_date);
            expected += 1;
        }
        true
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
