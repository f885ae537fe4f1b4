use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::installment::{Installment, PlanGroup, PlanShape};

pub const HISTORY_SCHEMA_VERSION: u32 = 1;

/// What kind of committed change a snapshot precedes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChangeKind {
    CountChange,
    ValueChange,
    IndividualEdit,
}

impl ChangeKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::CountChange => "count_change",
            ChangeKind::ValueChange => "value_change",
            ChangeKind::IndividualEdit => "individual_edit",
        }
    }
}

/// Immutable capture of a plan group's full state taken before a committed
/// mutation. Append-only; the engine never rewrites or replays one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub id: Uuid,
    pub group_id: Uuid,
    pub kind: ChangeKind,
    pub recorded_at: DateTime<Utc>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_center: Option<String>,
    pub shape: PlanShape,
    pub installments: Vec<Installment>,
    #[serde(default = "HistorySnapshot::schema_version_default")]
    pub schema_version: u32,
}

impl HistorySnapshot {
    /// Pure capture of `group` as it stands; the caller persists it before
    /// applying any reconciled output.
    pub fn capture(group: &PlanGroup, kind: ChangeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id: group.id,
            kind,
            recorded_at: Utc::now(),
            description: group.description.clone(),
            counterparty_id: group.counterparty_id,
            cost_center: group.cost_center.clone(),
            shape: group.shape.clone(),
            installments: group.installments.clone(),
            schema_version: HISTORY_SCHEMA_VERSION,
        }
    }

    pub fn schema_version_default() -> u32 {
        HISTORY_SCHEMA_VERSION
    }
}

/// Orders snapshots newest-first for audit display.
pub fn sort_newest_first(snapshots: &mut [HistorySnapshot]) {
    snapshots.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::generator::generate;
    use crate::schedule::intent::{BillIntent, Direction, PaymentMode};
    use chrono::NaiveDate;

    #[test]
    fn capture_copies_full_installment_state() {
        let intent = BillIntent::new(
            Direction::Payable,
            "Audit",
            90_000,
            NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
            PaymentMode::FixedTotal,
        )
        .with_count(3);
        let group = PlanGroup::new(&intent, generate(&intent).unwrap());

        let snapshot = HistorySnapshot::capture(&group, ChangeKind::ValueChange);
        assert_eq!(snapshot.group_id, group.id);
        assert_eq!(snapshot.installments, group.installments);
        assert_eq!(snapshot.shape, group.shape);
        assert_eq!(snapshot.kind.label(), "value_change");
    }
}
