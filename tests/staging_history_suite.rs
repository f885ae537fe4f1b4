use bills_core::schedule::{BillIntent, ChangeKind, Direction, PaymentMode};
use bills_core::service::PlanService;
use bills_core::storage::{GroupStore, JsonStorage};
use chrono::NaiveDate;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store() -> (JsonStorage, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
    (storage, temp)
}

fn intent() -> BillIntent {
    BillIntent::new(
        Direction::Payable,
        "Warehouse",
        300_000,
        date(2025, 1, 15),
        PaymentMode::FixedTotal,
    )
    .with_count(5)
}

#[test]
fn pre_marked_installments_survive_the_first_commit() {
    let (storage, _guard) = store();
    let intent = intent();
    let mut draft = PlanService::stage_new(&intent).unwrap();

    // The user reviews the draft and marks the first two as already settled.
    draft.toggle(1, Some(date(2025, 1, 15)));
    draft.toggle(2, Some(date(2025, 2, 15)));
    let summary = draft.summary();
    assert_eq!(summary.paid_count, 2);
    assert_eq!(summary.pending_count, 3);
    assert_eq!(summary.total_cents(), 300_000);

    let group = PlanService::commit_new(&storage, &intent, draft).unwrap();
    let loaded = storage.load(group.id).unwrap();
    assert_eq!(loaded.paid_count(), 2);
    assert_eq!(loaded.paid_cents(), 120_000);
}

#[test]
fn staging_never_alters_amounts_or_due_dates() {
    let intent = intent();
    let mut draft = PlanService::stage_new(&intent).unwrap();
    let before: Vec<(i64, NaiveDate)> = draft
        .installments()
        .iter()
        .map(|i| (i.amount_cents, i.due_date))
        .collect();

    draft.set_all_paid(Some(date(2025, 3, 1)));
    draft.toggle(3, None);
    draft.set_all_pending();
    draft.toggle(1, Some(date(2025, 1, 20)));

    let after: Vec<(i64, NaiveDate)> = draft
        .installments()
        .iter()
        .map(|i| (i.amount_cents, i.due_date))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn each_revision_appends_one_snapshot_newest_first() {
    let (storage, _guard) = store();
    let intent = intent();
    let draft = PlanService::stage_new(&intent).unwrap();
    let group = PlanService::commit_new(&storage, &intent, draft).unwrap();

    let mut count_change = intent.clone();
    count_change.count = Some(8);
    PlanService::revise(&storage, group.id, &count_change).unwrap();

    let mut value_change = count_change.clone();
    value_change.amount_cents = 360_000;
    PlanService::revise(&storage, group.id, &value_change).unwrap();

    let history = PlanService::history(&storage, group.id).unwrap();
    assert_eq!(history.len(), 2);
    // Newest first: the value change came last.
    assert_eq!(history[0].kind, ChangeKind::ValueChange);
    assert_eq!(history[1].kind, ChangeKind::CountChange);
    assert!(history[0].recorded_at >= history[1].recorded_at);

    // Each snapshot captured the state *before* its change.
    assert_eq!(history[1].installments.len(), 5);
    assert_eq!(history[0].installments.len(), 8);
    assert_eq!(history[0].shape.amount_cents, 300_000);
}

#[test]
fn snapshots_render_prior_state_distinct_from_current() {
    let (storage, _guard) = store();
    let intent = intent();
    let draft = PlanService::stage_new(&intent).unwrap();
    let group = PlanService::commit_new(&storage, &intent, draft).unwrap();

    let mut revised = intent.clone();
    revised.amount_cents = 450_000;
    let current = PlanService::revise(&storage, group.id, &revised).unwrap();

    let history = PlanService::history(&storage, group.id).unwrap();
    let snapshot = &history[0];
    assert_eq!(snapshot.installments[0].amount_cents, 60_000);
    assert_eq!(current.installments[0].amount_cents, 90_000);
    assert_ne!(
        serde_json::to_string(&snapshot.installments).unwrap(),
        serde_json::to_string(&current.installments).unwrap()
    );
}

#[test]
fn individual_edit_snapshots_with_its_own_kind() {
    let (storage, _guard) = store();
    let intent = intent();
    let draft = PlanService::stage_new(&intent).unwrap();
    let group = PlanService::commit_new(&storage, &intent, draft).unwrap();

    PlanService::edit_installment(&storage, group.id, 4, |installment| {
        installment.due_date = date(2025, 4, 20);
    })
    .unwrap();

    let history = PlanService::history(&storage, group.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, ChangeKind::IndividualEdit);
    assert_eq!(history[0].installments[3].due_date, date(2025, 4, 15));

    let loaded = storage.load(group.id).unwrap();
    assert_eq!(loaded.installment(4).unwrap().due_date, date(2025, 4, 20));
}
