//! Orchestration helpers wiring generation, staging, history capture, and
//! the persistence collaborator into the flows the caller drives.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::ScheduleError;
use crate::schedule::{
    generate, reconcile, BillIntent, ChangeKind, HistorySnapshot, Installment, PlanDraft,
    PlanGroup,
};
use crate::storage::GroupStore;

pub type ServiceResult<T> = Result<T, ScheduleError>;

/// Validated entry points for creating, reshaping, and auditing plan groups.
pub struct PlanService;

impl PlanService {
    /// Generates a plan from `intent` and wraps it for user review. Nothing
    /// is persisted yet; the caller may pre-mark installments as paid before
    /// committing.
    pub fn stage_new(intent: &BillIntent) -> ServiceResult<PlanDraft> {
        let installments = generate(intent)?;
        Ok(PlanDraft::new(installments))
    }

    /// Persists a reviewed draft as a fresh plan group. The first commit has
    /// no prior state, so no history snapshot is written.
    pub fn commit_new(
        store: &dyn GroupStore,
        intent: &BillIntent,
        draft: PlanDraft,
    ) -> ServiceResult<PlanGroup> {
        let group = PlanGroup::new(intent, draft.into_installments());
        store.commit(&group, None)?;
        tracing::info!(
            group = %group.id,
            mode = intent.mode.label(),
            installments = group.installments.len(),
            "committed new plan group"
        );
        Ok(group)
    }

    /// Reshapes an existing group to `intent`: snapshots the pre-change
    /// state, reconciles paid installments against the new shape, and
    /// commits both as one unit. On any failure the stored group is left
    /// untouched.
    pub fn revise(
        store: &dyn GroupStore,
        group_id: Uuid,
        intent: &BillIntent,
    ) -> ServiceResult<PlanGroup> {
        let mut group = store.load(group_id)?;
        let kind = change_kind(&group, intent);
        let merged = reconcile(&group, intent)?;
        let snapshot = HistorySnapshot::capture(&group, kind);
        group.apply_revision(intent, merged);
        store.commit(&group, Some(&snapshot))?;
        tracing::info!(
            group = %group.id,
            kind = kind.label(),
            installments = group.installments.len(),
            "committed plan revision"
        );
        Ok(group)
    }

    /// Applies a single-installment edit behind a snapshot: the pre-change
    /// state is captured and committed together with the mutated group.
    pub fn edit_installment<F>(
        store: &dyn GroupStore,
        group_id: Uuid,
        sequence: u32,
        mutator: F,
    ) -> ServiceResult<PlanGroup>
    where
        F: FnOnce(&mut Installment),
    {
        let mut group = store.load(group_id)?;
        let snapshot = HistorySnapshot::capture(&group, ChangeKind::IndividualEdit);
        let installment = group
            .installment_mut(sequence)
            .ok_or(ScheduleError::UnknownInstallment {
                group: group_id,
                sequence,
            })?;
        mutator(installment);
        group.touch();
        store.commit(&group, Some(&snapshot))?;
        tracing::debug!(group = %group.id, sequence, "committed individual edit");
        Ok(group)
    }

    /// Marks one installment paid as of `paid_on`, behind a snapshot.
    pub fn post_payment(
        store: &dyn GroupStore,
        group_id: Uuid,
        sequence: u32,
        paid_on: NaiveDate,
    ) -> ServiceResult<PlanGroup> {
        Self::edit_installment(store, group_id, sequence, |installment| {
            installment.mark_paid(paid_on);
        })
    }

    /// Snapshots for the group, newest first.
    pub fn history(store: &dyn GroupStore, group_id: Uuid) -> ServiceResult<Vec<HistorySnapshot>> {
        store.history(group_id)
    }
}

/// Tags the snapshot with the structural difference the intent introduces:
/// a count change wins over a value change; anything else is an individual
/// edit commit.
fn change_kind(group: &PlanGroup, intent: &BillIntent) -> ChangeKind {
    if group.shape.count != intent.count || group.shape.start_index != intent.start_index {
        ChangeKind::CountChange
    } else if group.shape.amount_cents != intent.amount_cents {
        ChangeKind::ValueChange
    } else {
        ChangeKind::IndividualEdit
    }
}
